//! Job assembly: job file plus command-line overrides.

use config_loader::ConfigLoader;
use contracts::{JobConfig, SinkConfig, SinkType};
use tracing::info;

use crate::cli::RunArgs;
use crate::error::{CliError, Result};

/// Name given to the file sink created by `--output`
pub const OUTPUT_SINK: &str = "output";

/// Build the job for `run` and validate it after overrides.
pub fn resolve_job(args: &RunArgs) -> Result<JobConfig> {
    let mut job = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path));
            }
            info!(config = %path.display(), "Loading job file");
            ConfigLoader::load_from_path(path)?
        }
        None => {
            let csv = args.csv.clone().ok_or(CliError::MissingInput {
                input: "CSV",
                flag: "--csv",
            })?;
            let xml = args.xml.clone().ok_or(CliError::MissingInput {
                input: "XML",
                flag: "--xml",
            })?;
            JobConfig::from_inputs(csv, xml)
        }
    };

    apply_overrides(&mut job, args);
    ConfigLoader::validate(&job)?;
    Ok(job)
}

fn apply_overrides(job: &mut JobConfig, args: &RunArgs) {
    if let Some(ref csv) = args.csv {
        info!(path = %csv.display(), "Overriding CSV input from CLI");
        job.inputs.tabular.path = csv.clone();
    }
    if let Some(ref xml) = args.xml {
        info!(path = %xml.display(), "Overriding XML input from CLI");
        job.inputs.tagged.path = xml.clone();
    }
    if let Some(unit) = args.csv_units {
        job.inputs.tabular.speed_unit = unit.into();
    }
    if let Some(unit) = args.xml_units {
        job.inputs.tagged.speed_unit = unit.into();
    }
    if let Some(interval) = args.interval {
        info!(interval, "Overriding resample interval from CLI");
        job.alignment.resample_interval = interval;
    }
    if let Some(offset) = args.offset {
        info!(offset, "Using manual offset from CLI");
        job.alignment.manual_offset = Some(offset);
    }
    if let Some(ref output) = args.output {
        job.sinks.retain(|s| s.sink_type != SinkType::File);
        let mut sink = SinkConfig::new(OUTPUT_SINK, SinkType::File)
            .with_param("path", output.display().to_string());
        if args.write_resampled {
            sink = sink
                .with_param("write_resampled", "true")
                .with_param("write_meta", "true");
        }
        job.sinks.push(sink);
    }
}
