//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::{JobConfig, SinkType};
use tracing::info;

use crate::cli::RunArgs;
use crate::job::resolve_job;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let job = resolve_job(args).context("Failed to assemble job")?;

    info!(
        csv = %job.inputs.tabular.path.display(),
        xml = %job.inputs.tagged.path.display(),
        interval = job.alignment.resample_interval,
        manual_offset = ?job.alignment.manual_offset,
        sinks = job.sinks.len(),
        "Job assembled"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - job is valid, exiting");
        print_job_summary(&job);
        return Ok(());
    }

    // Keep stdout clean when the table itself goes there
    let table_on_stdout = job.sinks.iter().any(|s| s.sink_type == SinkType::Stdout);

    info!("Starting pipeline...");
    let stats = Pipeline::new(PipelineConfig { job })
        .run()
        .await
        .context("Pipeline execution failed")?;

    info!(
        offset = stats.offset,
        rows = stats.merged_rows,
        matched_rows = stats.matched_rows,
        duration_secs = stats.duration.as_secs_f64(),
        "Pipeline completed successfully"
    );

    if !table_on_stdout {
        stats.print_summary();
    }

    Ok(())
}

/// Print job summary for dry-run mode
fn print_job_summary(job: &JobConfig) {
    println!("\n=== Job Summary ===\n");
    println!("Inputs:");
    println!(
        "  CSV: {} ({})",
        job.inputs.tabular.path.display(),
        job.inputs.tabular.speed_unit
    );
    println!(
        "  XML: {} ({}, <{}>)",
        job.inputs.tagged.path.display(),
        job.inputs.tagged.speed_unit,
        job.inputs.tagged.tags.record
    );

    println!("\nAlignment:");
    println!("  Interval: {}s", job.alignment.resample_interval);
    match job.alignment.manual_offset {
        Some(offset) => println!("  Offset: {offset}s (manual)"),
        None => println!("  Offset: estimated"),
    }
    println!("  Minimum samples: {}", job.alignment.min_samples);

    if !job.sinks.is_empty() {
        println!("\nSinks ({}):", job.sinks.len());
        for sink in &job.sinks {
            println!("  - {} ({:?})", sink.name, sink.sink_type);
        }
    }

    println!();
}
