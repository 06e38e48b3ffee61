//! 配置校验模块
//!
//! 校验规则：
//! - 两个输入路径非空
//! - 分隔符 / 注释符为 ASCII 且互不相同
//! - 记录标签为纯字母，时间标签与速度标签不同
//! - resample_interval 为有限正数，manual_offset 为有限数
//! - min_samples >= 2
//! - 合并列前缀非空且互不相同
//! - sink 名称非空且唯一，file sink 必须提供 path

use std::collections::HashSet;

use contracts::{ContractError, JobConfig, SinkType};

/// 校验 JobConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(job: &JobConfig) -> Result<(), ContractError> {
    validate_inputs(job)?;
    validate_tabular_format(job)?;
    validate_record_tags(job)?;
    validate_alignment(job)?;
    validate_merge(job)?;
    validate_sinks(job)?;
    Ok(())
}

/// 校验输入路径
fn validate_inputs(job: &JobConfig) -> Result<(), ContractError> {
    if job.inputs.tabular.path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "inputs.tabular.path",
            "input path cannot be empty",
        ));
    }
    if job.inputs.tagged.path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "inputs.tagged.path",
            "input path cannot be empty",
        ));
    }
    Ok(())
}

/// 校验 CSV 格式参数
fn validate_tabular_format(job: &JobConfig) -> Result<(), ContractError> {
    let tabular = &job.inputs.tabular;

    for (field, c) in [
        ("inputs.tabular.delimiter", tabular.delimiter),
        ("inputs.tabular.comment", tabular.comment),
    ] {
        if !c.is_ascii() || c == '"' || c == '\n' || c == '\r' {
            return Err(ContractError::config_validation(
                field,
                format!("must be a single ASCII character other than quote or newline, got {c:?}"),
            ));
        }
    }

    if tabular.delimiter == tabular.comment {
        return Err(ContractError::config_validation(
            "inputs.tabular.comment",
            "comment character cannot equal the delimiter",
        ));
    }
    Ok(())
}

/// 校验记录标签
fn validate_record_tags(job: &JobConfig) -> Result<(), ContractError> {
    let tags = &job.inputs.tagged.tags;

    for (field, tag) in [
        ("inputs.tagged.tags.record", &tags.record),
        ("inputs.tagged.tags.time", &tags.time),
        ("inputs.tagged.tags.speed", &tags.speed),
    ] {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ContractError::config_validation(
                field,
                format!("tag must be non-empty ASCII letters, got '{tag}'"),
            ));
        }
    }

    if tags.time == tags.speed {
        return Err(ContractError::config_validation(
            "inputs.tagged.tags",
            format!("time and speed tags must differ, both are '{}'", tags.time),
        ));
    }
    if tags.record == tags.time || tags.record == tags.speed {
        return Err(ContractError::config_validation(
            "inputs.tagged.tags.record",
            "record tag cannot double as a field tag",
        ));
    }
    Ok(())
}

/// 校验对齐参数
fn validate_alignment(job: &JobConfig) -> Result<(), ContractError> {
    let alignment = &job.alignment;

    if !(alignment.resample_interval.is_finite() && alignment.resample_interval > 0.0) {
        return Err(ContractError::config_validation(
            "alignment.resample_interval",
            format!(
                "resample_interval must be finite and > 0, got {}",
                alignment.resample_interval
            ),
        ));
    }

    if let Some(offset) = alignment.manual_offset {
        if !offset.is_finite() {
            return Err(ContractError::config_validation(
                "alignment.manual_offset",
                format!("manual_offset must be finite, got {offset}"),
            ));
        }
    }

    if alignment.min_samples < 2 {
        return Err(ContractError::config_validation(
            "alignment.min_samples",
            format!("min_samples must be >= 2, got {}", alignment.min_samples),
        ));
    }
    Ok(())
}

/// 校验合并表列名
fn validate_merge(job: &JobConfig) -> Result<(), ContractError> {
    let merge = &job.merge;

    if merge.time_column.is_empty() {
        return Err(ContractError::config_validation(
            "merge.time_column",
            "time column name cannot be empty",
        ));
    }
    if merge.first_prefix.is_empty() || merge.second_prefix.is_empty() {
        return Err(ContractError::config_validation(
            "merge.first_prefix / merge.second_prefix",
            "column prefixes cannot be empty",
        ));
    }
    if merge.first_prefix == merge.second_prefix {
        return Err(ContractError::config_validation(
            "merge.second_prefix",
            format!("prefixes must differ, both are '{}'", merge.first_prefix),
        ));
    }
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(job: &JobConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();

    for (idx, sink) in job.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.queue_capacity == 0 {
            return Err(ContractError::config_validation(
                format!("sinks[{}].queue_capacity", sink.name),
                "queue_capacity must be > 0",
            ));
        }
        let has_path = sink.params.get("path").is_some_and(|p| !p.is_empty());
        if sink.sink_type == SinkType::File && !has_path {
            return Err(ContractError::config_validation(
                format!("sinks[{}].params.path", sink.name),
                "file sink requires a 'path' parameter",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SinkConfig;

    fn minimal_job() -> JobConfig {
        JobConfig::from_inputs("drive.csv", "engine.xml")
    }

    #[test]
    fn test_valid_job() {
        assert!(validate(&minimal_job()).is_ok());
    }

    #[test]
    fn test_empty_input_path() {
        let mut job = minimal_job();
        job.inputs.tagged.path = "".into();
        let err = validate(&job).unwrap_err();
        assert!(err.to_string().contains("inputs.tagged.path"));
    }

    #[test]
    fn test_interval_must_be_positive_and_finite() {
        for interval in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let mut job = minimal_job();
            job.alignment.resample_interval = interval;
            let err = validate(&job).unwrap_err();
            assert!(err.to_string().contains("resample_interval"), "{interval}");
        }
    }

    #[test]
    fn test_manual_offset_must_be_finite() {
        let mut job = minimal_job();
        job.alignment.manual_offset = Some(f64::NAN);
        assert!(validate(&job).is_err());

        job.alignment.manual_offset = Some(-12.5);
        assert!(validate(&job).is_ok());
    }

    #[test]
    fn test_min_samples_floor() {
        let mut job = minimal_job();
        job.alignment.min_samples = 1;
        assert!(validate(&job).is_err());
    }

    #[test]
    fn test_prefixes_must_differ() {
        let mut job = minimal_job();
        job.merge.second_prefix = job.merge.first_prefix.clone();
        let err = validate(&job).unwrap_err();
        assert!(err.to_string().contains("prefixes must differ"));
    }

    #[test]
    fn test_delimiter_rules() {
        let mut job = minimal_job();
        job.inputs.tabular.delimiter = '#';
        assert!(validate(&job).is_err());

        let mut job = minimal_job();
        job.inputs.tabular.delimiter = '→';
        assert!(validate(&job).is_err());
    }

    #[test]
    fn test_tag_rules() {
        let mut job = minimal_job();
        job.inputs.tagged.tags.speed = "Vehicle_Speed".into();
        assert!(validate(&job).is_err());

        let mut job = minimal_job();
        job.inputs.tagged.tags.speed = "LogTime".into();
        assert!(validate(&job).is_err());
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut job = minimal_job();
        job.sinks.push(SinkConfig::new("log", SinkType::Stdout));
        let err = validate(&job).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_file_sink_requires_path() {
        let mut job = minimal_job();
        job.sinks = vec![SinkConfig::new("out", SinkType::File)];
        assert!(validate(&job).is_err());

        job.sinks = vec![SinkConfig::new("out", SinkType::File).with_param("path", "m.csv")];
        assert!(validate(&job).is_ok());
    }

    #[test]
    fn test_zero_queue_capacity() {
        let mut job = minimal_job();
        job.sinks[0].queue_capacity = 0;
        assert!(validate(&job).is_err());
    }
}
