//! Main sync engine implementation.

use std::time::Instant;

use contracts::{
    AlignmentReport, ContractError, EngineConfig, OffsetSource, ProgressSink, RawSeries,
    UniformSeries,
};
use tracing::{info, instrument, warn};

use crate::merge::Merger;
use crate::offset::OffsetFinder;
use crate::resample::Resampler;

/// Status messages emitted between stages
pub(crate) const MSG_RESAMPLING: &str = "Resampling data...";
pub(crate) const MSG_OFFSET: &str = "Calculating optimal time offset...";
pub(crate) const MSG_MERGING: &str = "Merging data...";

/// Resample, offset and merge pipeline over two raw series
///
/// Stateless between runs; one engine can serve any number of independent
/// invocations, including concurrent ones.
#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    config: EngineConfig,
}

impl SyncEngine {
    /// Create a new sync engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Align `second` onto `first` and merge them.
    ///
    /// Fail-fast: the first stage error aborts the run.
    ///
    /// # Errors
    /// - [`ContractError::Resample`] when a series has no valid time sample
    ///   or the interval is unusable
    /// - [`ContractError::InsufficientData`] when either grid is shorter than
    ///   `min_samples`
    /// - [`ContractError::ConfigValidation`] for a non-finite manual offset
    #[instrument(
        name = "sync_engine_run",
        skip(self, first, second, progress),
        fields(
            first_samples = first.len(),
            second_samples = second.len(),
            interval = self.config.resample_interval
        )
    )]
    pub fn run(
        &self,
        first: &RawSeries,
        second: &RawSeries,
        progress: &dyn ProgressSink,
    ) -> Result<AlignmentReport, ContractError> {
        if let Some(offset) = self.config.manual_offset {
            if !offset.is_finite() {
                return Err(ContractError::config_validation(
                    "alignment.manual_offset",
                    format!("must be finite, got {offset}"),
                ));
            }
        }

        progress.report(MSG_RESAMPLING);
        let started = Instant::now();
        let resampler = Resampler::new(self.config.resample_interval)
            .with_duplicate_policy(self.config.duplicate_policy);
        let a = resampler.resample(first)?;
        let b = resampler.resample(second)?;
        observability::record_stage_duration("resample", started.elapsed().as_secs_f64());

        self.check_floor(&a, &b)?;

        let (offset, offset_source) = match self.config.manual_offset {
            Some(offset) => {
                info!(offset, "Using manual offset, skipping offset search");
                (offset, OffsetSource::Manual)
            }
            None => {
                progress.report(MSG_OFFSET);
                let started = Instant::now();
                let estimate = OffsetFinder::new().estimate(&a, &b);
                observability::record_stage_duration("offset", started.elapsed().as_secs_f64());
                (
                    estimate.offset,
                    OffsetSource::Estimated {
                        lag: estimate.lag,
                        score: estimate.score,
                    },
                )
            }
        };

        progress.report(MSG_MERGING);
        let started = Instant::now();
        let merger = Merger::new(self.config.merge.clone());
        let table = merger.merge(&a, &b, offset);
        let matched_rows = merger.matched_rows(&a, &b, offset);
        observability::record_stage_duration("merge", started.elapsed().as_secs_f64());

        if matched_rows == 0 {
            warn!(offset, "No first-series sample overlaps the second series");
        }

        let report = AlignmentReport {
            first: a,
            second: b,
            offset,
            offset_source,
            matched_rows,
            table,
        };

        info!(
            offset = report.offset,
            rows = report.table.len(),
            matched_rows = report.matched_rows,
            overlap_ratio = report.overlap_ratio(),
            "Alignment complete"
        );
        observability::record_alignment_metrics(&report);

        Ok(report)
    }

    fn check_floor(&self, a: &UniformSeries, b: &UniformSeries) -> Result<(), ContractError> {
        let minimum = self.config.min_samples;
        if a.len() < minimum || b.len() < minimum {
            warn!(
                first = a.len(),
                second = b.len(),
                minimum,
                "Resampled series below sample floor"
            );
            return Err(ContractError::InsufficientData {
                first: a.len(),
                second: b.len(),
                minimum,
            });
        }
        Ok(())
    }
}
