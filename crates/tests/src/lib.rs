//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 解析 -> 对齐 -> 分发 e2e 测试

#[cfg(test)]
mod contract_tests {
    use contracts::{JobConfig, OffsetSource};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_offset_source_serialization() {
        let json = serde_json::to_value(OffsetSource::Estimated { lag: 4, score: 2.5 }).unwrap();
        assert_eq!(json["kind"], "estimated");
        assert_eq!(json["lag"], 4);

        let json = serde_json::to_value(OffsetSource::Manual).unwrap();
        assert_eq!(json["kind"], "manual");
    }

    #[test]
    fn test_job_config_roundtrip_through_loader() {
        let job = JobConfig::from_inputs("drive.csv", "engine.xml");
        let toml = config_loader::ConfigLoader::to_toml(&job).unwrap();
        let back = config_loader::ConfigLoader::load_from_str(
            &toml,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(back.inputs.tagged.tags, job.inputs.tagged.tags);
        assert_eq!(back.merge, job.merge);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fmt::Write as _;
    use std::path::Path;

    use contracts::{NoProgress, OffsetSource, SinkConfig, SinkType, SpeedUnit, MPH_TO_KPH};
    use dispatcher::create_dispatcher;
    use sync_engine::SyncEngine;

    const STEP: f64 = 0.5;
    const SAMPLES: usize = 60;

    /// Single acceleration/braking event starting at `start` seconds
    fn event(t: f64, start: f64) -> f64 {
        let x = t - start;
        if (0.0..5.0).contains(&x) {
            x * 12.0
        } else if (5.0..10.0).contains(&x) {
            60.0 - (x - 5.0) * 12.0
        } else {
            0.0
        }
    }

    fn clock(t: f64) -> String {
        let whole = t.trunc() as u64;
        let (h, m, s) = (whole / 3600, whole / 60 % 60, whole % 60);
        if t.fract() > 0.0 {
            format!("{h:02}:{m:02}:{s:02}.5")
        } else {
            format!("{h:02}:{m:02}:{s:02}")
        }
    }

    /// CSV log with the event at 10 s, XML log (mph) with the same event at 7 s
    fn write_logs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let mut csv = String::from("# exported\nTime (s),Speed (km/h)\n");
        let mut xml = String::from("<?xml version=\"1.0\"?>\n<EngineData>\n");

        for i in 0..SAMPLES {
            let t = i as f64 * STEP;
            writeln!(csv, "{t},{}", event(t, 10.0)).unwrap();
            writeln!(
                xml,
                "  <EngineDataLog>\n    <LogTime>{}</LogTime>\n    <VehicleSpeed>{}</VehicleSpeed>\n    <EngineRPM>1500</EngineRPM>\n  </EngineDataLog>",
                clock(t),
                event(t, 7.0)
            )
            .unwrap();
        }
        xml.push_str("</EngineData>\n");

        let csv_path = dir.join("speed.csv");
        let xml_path = dir.join("engine.xml");
        std::fs::write(&csv_path, csv).unwrap();
        std::fs::write(&xml_path, xml).unwrap();
        (csv_path, xml_path)
    }

    fn write_job(dir: &Path, csv: &Path, xml: &Path, out: &Path) -> std::path::PathBuf {
        let job = format!(
            r#"
[inputs.tabular]
path = "{}"

[inputs.tagged]
path = "{}"
speed_unit = "mph"

[alignment]
resample_interval = {STEP}

[[sinks]]
name = "log"
sink_type = "log"

[[sinks]]
name = "out"
sink_type = "file"
params = {{ path = "{}", write_resampled = "true", write_meta = "true" }}
"#,
            csv.display(),
            xml.display(),
            out.display()
        );
        let path = dir.join("speedsync.toml");
        std::fs::write(&path, job).unwrap();
        path
    }

    /// End-to-end test: job file -> ingestion -> SyncEngine -> Dispatcher
    ///
    /// 验证完整的数据流：
    /// 1. 加载作业配置并解析两个输入
    /// 2. SyncEngine 重采样、估计偏移并合并
    /// 3. Dispatcher 将合并表写入文件
    #[tokio::test]
    async fn test_e2e_file_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let (csv, xml) = write_logs(dir.path());
        let out = dir.path().join("out").join("merged.csv");
        let job_path = write_job(dir.path(), &csv, &xml, &out);

        let job = config_loader::ConfigLoader::load_from_path(&job_path).unwrap();
        assert_eq!(job.inputs.tagged.speed_unit, SpeedUnit::Mph);

        let first = ingestion::load_tabular(&job.inputs.tabular).unwrap();
        let second = ingestion::load_tagged(&job.inputs.tagged).unwrap();
        assert_eq!(first.len(), SAMPLES);
        assert_eq!(second.len(), SAMPLES);

        let report = SyncEngine::new(job.to_engine_config())
            .run(&first, &second, &NoProgress)
            .unwrap();

        // event at 10 s on the CSV clock, 7 s on the XML clock
        assert_eq!(report.offset, 3.0);
        assert!(matches!(
            report.offset_source,
            OffsetSource::Estimated { lag: 6, .. }
        ));
        assert_eq!(report.table.len(), SAMPLES);
        assert_eq!(report.matched_rows, SAMPLES - 6);

        let summary = create_dispatcher(job.sinks.clone())
            .unwrap()
            .dispatch(report)
            .await
            .unwrap();
        assert_eq!(summary.sinks.len(), 2);

        let merged = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = merged.lines().collect();
        assert_eq!(
            lines[0],
            "Time,csv_Speed (km/h),xml_VehicleSpeed,xml_EngineRPM"
        );
        assert_eq!(lines.len(), SAMPLES + 1);

        // first rows have no XML counterpart
        assert_eq!(lines[1], "0.000,0,,");

        // CSV peak at 15 s lines up with the XML peak (60 mph)
        let peak = lines
            .iter()
            .find(|l| l.starts_with("15.000,"))
            .unwrap();
        let fields: Vec<&str> = peak.split(',').collect();
        assert_eq!(fields[1], "60");
        let xml_speed: f64 = fields[2].parse().unwrap();
        assert!((xml_speed - 60.0 * MPH_TO_KPH).abs() < 1e-9);
        assert_eq!(fields[3], "1500");

        assert!(out.with_file_name("merged.first.csv").exists());
        assert!(out.with_file_name("merged.second.csv").exists());

        let meta: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(out.with_file_name("merged.meta.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(meta["offset"], 3.0);
        assert_eq!(meta["matched_rows"], SAMPLES - 6);
    }

    #[tokio::test]
    async fn test_e2e_manual_offset_to_stdout_and_log() {
        let dir = tempfile::tempdir().unwrap();
        let (csv, xml) = write_logs(dir.path());

        let mut job = contracts::JobConfig::from_inputs(csv, xml);
        job.alignment.resample_interval = STEP;
        job.alignment.manual_offset = Some(0.0);
        job.sinks = vec![
            SinkConfig::new("log", SinkType::Log),
            SinkConfig::new("stdout", SinkType::Stdout),
        ];
        config_loader::ConfigLoader::validate(&job).unwrap();

        let first = ingestion::load_tabular(&job.inputs.tabular).unwrap();
        let second = ingestion::load_tagged(&job.inputs.tagged).unwrap();
        let report = SyncEngine::new(job.to_engine_config())
            .run(&first, &second, &NoProgress)
            .unwrap();

        assert_eq!(report.offset_source, OffsetSource::Manual);
        assert_eq!(report.matched_rows, SAMPLES);

        let summary = create_dispatcher(job.sinks).unwrap().dispatch(report).await.unwrap();
        assert!(summary.failed().is_empty());
    }

    #[test]
    fn test_e2e_too_short_input_fails_before_merge() {
        let dir = tempfile::tempdir().unwrap();
        let (_, xml) = write_logs(dir.path());
        let csv = dir.path().join("short.csv");
        std::fs::write(&csv, "Time,Speed\n0,1\n0.5,2\n").unwrap();

        let job = contracts::JobConfig::from_inputs(csv, xml);
        let first = ingestion::load_tabular(&job.inputs.tabular).unwrap();
        let second = ingestion::load_tagged(&job.inputs.tagged).unwrap();

        let err = SyncEngine::new(job.to_engine_config())
            .run(&first, &second, &NoProgress)
            .unwrap_err();
        assert!(matches!(err, contracts::ContractError::InsufficientData { .. }));
    }

    #[test]
    fn test_e2e_structural_errors_surface_as_contract_errors() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("bad.csv");
        let xml = dir.path().join("bad.xml");
        std::fs::write(&csv, "a,b\n1,2\n").unwrap();
        std::fs::write(&xml, "<Log></Log>").unwrap();

        let job = contracts::JobConfig::from_inputs(csv, xml);
        let err = ingestion::load_tabular(&job.inputs.tabular).unwrap_err();
        assert!(err.to_string().contains("Could not auto-find Time/Speed columns"));

        let err = ingestion::load_tagged(&job.inputs.tagged).unwrap_err();
        assert!(err.to_string().contains("No <EngineDataLog> entries found."));
    }
}
