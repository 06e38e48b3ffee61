//! StdoutSink - merged table as CSV on standard output

use std::io::Write;

use contracts::{AlignmentReport, ContractError, TableSink};
use tracing::{debug, instrument};

use crate::encode::write_csv;

/// Sink that prints the merged table to stdout
pub struct StdoutSink {
    name: String,
}

impl StdoutSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl TableSink for StdoutSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "stdout_sink_write",
        skip(self, report),
        fields(sink = %self.name, rows = report.table.len())
    )]
    async fn write(&mut self, report: &AlignmentReport) -> Result<(), ContractError> {
        let stdout = std::io::stdout();
        write_csv(&report.table, stdout.lock())
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    #[instrument(name = "stdout_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        std::io::stdout()
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    #[instrument(name = "stdout_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, "StdoutSink closed");
        Ok(())
    }
}
