//! # Ingestion
//!
//! Turns the two input logs into [`RawSeries`] values.
//!
//! Responsibilities:
//! - Parse delimited-text logs, auto-detecting the time and speed columns
//! - Parse tagged-record (`<EngineDataLog>`) logs
//! - Normalize the speed channel to kph
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{load_tabular, load_tagged};
//!
//! let first = load_tabular(&job.inputs.tabular)?;
//! let second = load_tagged(&job.inputs.tagged)?;
//! ```

mod error;
mod read;
mod tabular;
mod tagged;
mod units;

use contracts::{ContractError, RawSeries, TabularInput, TaggedInput};
use tracing::{info, instrument};

// Re-exports
pub use error::{into_contract_error, IngestionError, Result};
pub use read::read_text;
pub use tabular::TabularParser;
pub use tagged::{parse_elapsed_time, parse_float_prefix, TaggedRecordParser};
pub use units::normalize_speed;

/// Input label used in errors and metrics for the delimited-text log
pub const TABULAR_INPUT: &str = "tabular";

/// Input label used in errors and metrics for the tagged-record log
pub const TAGGED_INPUT: &str = "tagged";

/// Read, parse and unit-normalize the delimited-text input
#[instrument(name = "load_tabular", skip(input), fields(path = %input.path.display()))]
pub fn load_tabular(input: &TabularInput) -> std::result::Result<RawSeries, ContractError> {
    let series = TabularParser::from_input(input)
        .parse_path(&input.path)
        .map_err(|e| into_contract_error(e, TABULAR_INPUT))?;
    let series = normalize_speed(series, input.speed_unit);

    observability::record_input_parsed(TABULAR_INPUT, series.len());
    info!(
        rows = series.len(),
        time_column = %series.time_channel(),
        speed_column = %series.speed_channel(),
        speed_unit = %input.speed_unit,
        "Tabular input loaded"
    );
    Ok(series)
}

/// Read, parse and unit-normalize the tagged-record input
#[instrument(name = "load_tagged", skip(input), fields(path = %input.path.display()))]
pub fn load_tagged(input: &TaggedInput) -> std::result::Result<RawSeries, ContractError> {
    let series = TaggedRecordParser::from_input(input)
        .parse_path(&input.path)
        .map_err(|e| into_contract_error(e, TAGGED_INPUT))?;
    let series = normalize_speed(series, input.speed_unit);

    observability::record_input_parsed(TAGGED_INPUT, series.len());
    info!(
        records = series.len(),
        channels = series.channels().len(),
        speed_unit = %input.speed_unit,
        "Tagged-record input loaded"
    );
    Ok(series)
}
