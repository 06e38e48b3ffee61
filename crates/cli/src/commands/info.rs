//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{JobConfig, RawSeries};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::InfoArgs;

/// Job info for JSON output
#[derive(Serialize)]
struct JobInfo {
    version: String,
    inputs: Vec<InputInfo>,
    alignment: AlignmentInfo,
    merge: MergeInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct InputInfo {
    label: &'static str,
    path: String,
    speed_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    inspection: Option<InputInspection>,
}

/// What the parser found in an input file
#[derive(Serialize)]
struct InputInspection {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    time_channel: String,
    speed_channel: String,
    channels: Vec<String>,
    samples: usize,
    valid_times: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_range: Option<(f64, f64)>,
}

#[derive(Serialize)]
struct AlignmentInfo {
    resample_interval: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    manual_offset: Option<f64>,
    min_samples: usize,
    duplicate_policy: String,
}

#[derive(Serialize)]
struct MergeInfo {
    time_column: String,
    first_prefix: String,
    second_prefix: String,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    queue_capacity: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading job info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let job = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_job_info(&job, args);
    if args.json {
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize job info")?;
        println!("{}", json);
    } else {
        print_job_info(&info);
    }

    Ok(())
}

fn build_job_info(job: &JobConfig, args: &InfoArgs) -> JobInfo {
    let (csv_inspection, xml_inspection) = if args.inputs {
        (
            Some(inspect(ingestion::load_tabular(&job.inputs.tabular))),
            Some(inspect(ingestion::load_tagged(&job.inputs.tagged))),
        )
    } else {
        (None, None)
    };

    let inputs = vec![
        InputInfo {
            label: "CSV",
            path: job.inputs.tabular.path.display().to_string(),
            speed_unit: job.inputs.tabular.speed_unit.to_string(),
            inspection: csv_inspection,
        },
        InputInfo {
            label: "XML",
            path: job.inputs.tagged.path.display().to_string(),
            speed_unit: job.inputs.tagged.speed_unit.to_string(),
            inspection: xml_inspection,
        },
    ];

    let sinks = if args.sinks {
        job.sinks
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                sink_type: format!("{:?}", s.sink_type),
                queue_capacity: s.queue_capacity,
            })
            .collect()
    } else {
        Vec::new()
    };

    JobInfo {
        version: format!("{:?}", job.version),
        inputs,
        alignment: AlignmentInfo {
            resample_interval: job.alignment.resample_interval,
            manual_offset: job.alignment.manual_offset,
            min_samples: job.alignment.min_samples,
            duplicate_policy: format!("{:?}", job.alignment.duplicate_policy),
        },
        merge: MergeInfo {
            time_column: job.merge.time_column.clone(),
            first_prefix: job.merge.first_prefix.clone(),
            second_prefix: job.merge.second_prefix.clone(),
        },
        sinks,
    }
}

fn inspect(loaded: Result<RawSeries, contracts::ContractError>) -> InputInspection {
    match loaded {
        Ok(series) => {
            let valid: Vec<f64> = series
                .time_values()
                .iter()
                .flatten()
                .copied()
                .filter(|t| t.is_finite())
                .collect();
            let time_range = valid
                .iter()
                .copied()
                .fold(None, |range: Option<(f64, f64)>, t| match range {
                    Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
                    None => Some((t, t)),
                });

            InputInspection {
                error: None,
                time_channel: series.time_channel().to_string(),
                speed_channel: series.speed_channel().to_string(),
                channels: series.channels().iter().map(|c| c.name.clone()).collect(),
                samples: series.len(),
                valid_times: valid.len(),
                time_range,
            }
        }
        Err(e) => {
            warn!(error = %e, "Input inspection failed");
            InputInspection {
                error: Some(e.to_string()),
                time_channel: String::new(),
                speed_channel: String::new(),
                channels: Vec::new(),
                samples: 0,
                valid_times: 0,
                time_range: None,
            }
        }
    }
}

fn print_job_info(info: &JobInfo) {
    println!("=== speedsync job ({}) ===\n", info.version);

    println!("Inputs");
    for (i, input) in info.inputs.iter().enumerate() {
        let is_last = i + 1 == info.inputs.len();
        let prefix = if is_last { "└─" } else { "├─" };
        let child = if is_last { "   " } else { "│  " };
        println!(
            "   {} {}: {} ({})",
            prefix, input.label, input.path, input.speed_unit
        );

        if let Some(ref inspection) = input.inspection {
            if let Some(ref error) = inspection.error {
                println!("   {}  └─ Error: {}", child, error);
                continue;
            }
            println!(
                "   {}  ├─ Time: {}  Speed: {}",
                child, inspection.time_channel, inspection.speed_channel
            );
            println!("   {}  ├─ Channels: {}", child, inspection.channels.join(", "));
            println!(
                "   {}  ├─ Samples: {} ({} with valid time)",
                child, inspection.samples, inspection.valid_times
            );
            match inspection.time_range {
                Some((lo, hi)) => println!("   {}  └─ Time range: {:.3}s .. {:.3}s", child, lo, hi),
                None => println!("   {}  └─ Time range: none", child),
            }
        }
    }

    let a = &info.alignment;
    println!("\nAlignment");
    println!("   ├─ Interval: {}s", a.resample_interval);
    match a.manual_offset {
        Some(offset) => println!("   ├─ Offset: {}s (manual)", offset),
        None => println!("   ├─ Offset: estimated"),
    }
    println!("   ├─ Minimum samples: {}", a.min_samples);
    println!("   └─ Duplicates: {}", a.duplicate_policy);

    let m = &info.merge;
    println!("\nMerged table");
    println!(
        "   └─ {}, {}*, {}*",
        m.time_column, m.first_prefix, m.second_prefix
    );

    if !info.sinks.is_empty() {
        println!("\nSinks ({})", info.sinks.len());
        for (i, sink) in info.sinks.iter().enumerate() {
            let prefix = if i + 1 == info.sinks.len() { "└─" } else { "├─" };
            println!(
                "   {} {} ({}, queue {})",
                prefix, sink.name, sink.sink_type, sink.queue_capacity
            );
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("a.csv");
        std::fs::write(&csv, "Time,Speed,Rpm\n2,10,800\n,11,900\n0.5,12,1000\n").unwrap();

        let job = JobConfig::from_inputs(csv, dir.path().join("absent.xml"));
        let args = InfoArgs {
            config: "unused.toml".into(),
            json: true,
            inputs: true,
            sinks: true,
        };

        let info = build_job_info(&job, &args);
        let csv_inspection = info.inputs[0].inspection.as_ref().unwrap();
        assert!(csv_inspection.error.is_none());
        assert_eq!(csv_inspection.channels, vec!["Time", "Speed", "Rpm"]);
        assert_eq!(csv_inspection.samples, 3);
        assert_eq!(csv_inspection.valid_times, 2);
        assert_eq!(csv_inspection.time_range, Some((0.5, 2.0)));

        let xml_inspection = info.inputs[1].inspection.as_ref().unwrap();
        assert!(xml_inspection.error.is_some());
        assert_eq!(info.sinks.len(), 1);
    }

    #[test]
    fn test_info_without_inspection() {
        let job = JobConfig::from_inputs("a.csv", "b.xml");
        let args = InfoArgs {
            config: "unused.toml".into(),
            json: false,
            inputs: false,
            sinks: false,
        };
        let info = build_job_info(&job, &args);
        assert!(info.inputs.iter().all(|i| i.inspection.is_none()));
        assert!(info.sinks.is_empty());
        assert_eq!(info.merge.first_prefix, "csv_");
    }
}
