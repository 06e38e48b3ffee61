//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::JobConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<JobSummary>,
}

#[derive(Serialize)]
struct JobSummary {
    version: String,
    csv: String,
    xml: String,
    resample_interval: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    manual_offset: Option<f64>,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating job file");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Job validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(job) => {
            let warnings = collect_warnings(&job);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(JobSummary {
                    version: format!("{:?}", job.version),
                    csv: job.inputs.tabular.path.display().to_string(),
                    xml: job.inputs.tagged.path.display().to_string(),
                    resample_interval: job.alignment.resample_interval,
                    manual_offset: job.alignment.manual_offset,
                    sink_count: job.sinks.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect non-fatal issues
fn collect_warnings(job: &JobConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if job.sinks.is_empty() {
        warnings.push("No sinks configured - merged table will be discarded".to_string());
    }

    for (label, path) in [
        ("CSV", &job.inputs.tabular.path),
        ("XML", &job.inputs.tagged.path),
    ] {
        if !path.exists() {
            warnings.push(format!("{label} input not found: {}", path.display()));
        }
    }

    if job.alignment.manual_offset.is_some() {
        warnings.push("alignment.manual_offset is set - offset search will be skipped".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Job is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  CSV: {}", summary.csv);
            println!("  XML: {}", summary.xml);
            println!("  Interval: {}s", summary.resample_interval);
            if let Some(offset) = summary.manual_offset {
                println!("  Manual offset: {offset}s");
            }
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Job is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
