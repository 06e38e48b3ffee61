//! LogSink - logs report summary via tracing

use contracts::{AlignmentReport, ContractError, OffsetSource, TableSink};
use tracing::{info, instrument};

/// Sink that logs alignment summaries
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_report_summary(&self, report: &AlignmentReport) {
        let (source, lag) = match report.offset_source {
            OffsetSource::Estimated { lag, .. } => ("estimated", Some(lag)),
            OffsetSource::Manual => ("manual", None),
        };

        info!(
            sink = %self.name,
            offset = report.offset,
            offset_source = source,
            lag = ?lag,
            first_points = report.first.len(),
            second_points = report.second.len(),
            rows = report.table.len(),
            columns = report.table.columns().len(),
            matched_rows = report.matched_rows,
            "AlignmentReport received"
        );
    }
}

impl TableSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, report),
        fields(sink = %self.name, rows = report.table.len())
    )]
    async fn write(&mut self, report: &AlignmentReport) -> Result<(), ContractError> {
        self.log_report_summary(report);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
