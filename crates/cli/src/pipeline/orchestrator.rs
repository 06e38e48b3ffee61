//! Pipeline orchestrator - coordinates all components.
//!
//! Parsing and alignment are CPU-bound and run on the blocking pool; status
//! messages are forwarded to an async task that logs them.

use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{AlignmentReport, ContractError, JobConfig, ProgressSink};
use sync_engine::SyncEngine;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::PipelineStats;

pub(crate) const MSG_CSV_PARSED: &str = "CSV parsed.";
pub(crate) const MSG_XML_PARSED: &str = "XML parsed.";

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated job
    pub job: JobConfig,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    ///
    /// Fail-fast: the first error from parsing, alignment or any sink ends
    /// the run.
    pub async fn run(self) -> Result<PipelineStats> {
        let result = self.run_inner().await;
        observability::record_run_outcome(result.is_ok());
        result
    }

    async fn run_inner(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let job = self.config.job;

        // Progress forwarding
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<String>();
        let progress_task = tokio::spawn(async move {
            while let Some(message) = progress_rx.recv().await {
                info!(status = %message, "Progress");
            }
        });

        // Parse and align on the blocking pool
        let inputs = job.inputs.clone();
        let engine_config = job.to_engine_config();
        let alignment = tokio::task::spawn_blocking(move || {
            let progress = move |message: &str| {
                // receiver only goes away once this task has finished
                let _ = progress_tx.send(message.to_string());
            };
            align(&inputs, engine_config, &progress)
        })
        .await
        .context("Alignment task panicked")?;

        // The sender lives in the closure above, so the forwarder ends here
        let _ = progress_task.await;

        let (report, input_rows) = alignment.context("Alignment failed")?;

        let mut stats = PipelineStats {
            first_rows: input_rows.0,
            second_rows: input_rows.1,
            ..Default::default()
        };
        stats.record(&report);

        // Dispatch
        if job.sinks.is_empty() {
            warn!("No sinks configured - merged table will be discarded");
        }
        let dispatcher =
            dispatcher::create_dispatcher(job.sinks.clone()).context("Failed to create sinks")?;
        info!(sinks = ?dispatcher.sink_names(), "Dispatching merged table");

        let summary = dispatcher
            .dispatch(report)
            .await
            .context("Failed to write merged table")?;
        stats.sinks = summary.sinks;

        stats.duration = start_time.elapsed();
        info!(
            duration_secs = stats.duration.as_secs_f64(),
            rows = stats.merged_rows,
            "Pipeline complete"
        );

        Ok(stats)
    }
}

/// Load both inputs and run the engine, reporting status along the way.
fn align(
    inputs: &contracts::InputsConfig,
    engine_config: contracts::EngineConfig,
    progress: &dyn ProgressSink,
) -> Result<(AlignmentReport, (usize, usize)), ContractError> {
    let first = ingestion::load_tabular(&inputs.tabular)?;
    progress.report(MSG_CSV_PARSED);

    let second = ingestion::load_tagged(&inputs.tagged)?;
    progress.report(MSG_XML_PARSED);

    let report = SyncEngine::new(engine_config).run(&first, &second, progress)?;
    Ok((report, (first.len(), second.len())))
}
