//! TableSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for sinks that persist or display an
//! alignment result.

use crate::{AlignmentReport, ContractError};

/// Data output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(TableSink: Send)]
pub trait LocalTableSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write an alignment report
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, report: &AlignmentReport) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
