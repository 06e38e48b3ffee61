//! 对齐流水线指标收集模块
//!
//! 基于 AlignmentReport 收集和统计运行指标。

use contracts::{AlignmentReport, OffsetSource};
use metrics::{counter, gauge, histogram};

/// 从 AlignmentReport 记录指标
///
/// 每次流水线成功产出合并表后调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_alignment_metrics;
///
/// let report = engine.run(&first, &second, &NoProgress)?;
/// record_alignment_metrics(&report);
/// ```
pub fn record_alignment_metrics(report: &AlignmentReport) {
    let source = match report.offset_source {
        OffsetSource::Estimated { .. } => "estimated",
        OffsetSource::Manual => "manual",
    };

    // 偏移量 (秒)
    gauge!("speedsync_offset_seconds", "source" => source).set(report.offset);
    histogram!("speedsync_offset_abs_seconds").record(report.offset.abs());

    // 互相关得分
    if let OffsetSource::Estimated { lag, score } = report.offset_source {
        gauge!("speedsync_offset_lag_samples").set(lag as f64);
        if score.is_finite() {
            gauge!("speedsync_correlation_score").set(score);
        }
    }

    // 网格长度
    gauge!("speedsync_grid_points", "series" => "first").set(report.first.len() as f64);
    gauge!("speedsync_grid_points", "series" => "second").set(report.second.len() as f64);

    // 合并表
    counter!("speedsync_rows_merged_total").increment(report.table.len() as u64);
    gauge!("speedsync_overlap_ratio").set(report.overlap_ratio());
}

/// 记录一次运行的结果
pub fn record_run_outcome(success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!("speedsync_runs_total", "status" => status).increment(1);
}

/// 记录阶段耗时 (秒)
pub fn record_stage_duration(stage: &str, seconds: f64) {
    histogram!(
        "speedsync_stage_duration_seconds",
        "stage" => stage.to_string()
    )
    .record(seconds);
}

/// 记录输入解析结果
pub fn record_input_parsed(input: &str, rows: usize) {
    counter!(
        "speedsync_input_rows_total",
        "input" => input.to_string()
    )
    .increment(rows as u64);
}

/// 记录合并表分发
pub fn record_table_dispatched(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "speedsync_tables_dispatched_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
