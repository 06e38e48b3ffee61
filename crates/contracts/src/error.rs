//! Layered error definitions
//!
//! Categorized by pipeline stage: config / read / parse / resample / merge floor / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Input Errors =====
    /// Input could not be read
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed tabular or tagged-record text, or missing required columns/tags
    #[error("{input}: {message}")]
    StructuralParse { input: String, message: String },

    /// Series violates its shape invariants (missing channel, ragged lengths)
    #[error("invalid series: {message}")]
    InvalidSeries { message: String },

    // ===== Alignment Errors =====
    /// No valid time samples, or an unusable resample interval
    #[error("resample error on '{channel}': {message}")]
    Resample { channel: String, message: String },

    /// A resampled series is below the sample floor
    #[error(
        "Not enough data points after resampling for a reliable analysis \
         (first={first}, second={second}, minimum={minimum})"
    )]
    InsufficientData {
        first: usize,
        second: usize,
        minimum: usize,
    },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create read error for the given path
    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create structural parse error
    pub fn structural_parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StructuralParse {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create invalid series error
    pub fn invalid_series(message: impl Into<String>) -> Self {
        Self::InvalidSeries {
            message: message.into(),
        }
    }

    /// Create resample error
    pub fn resample(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resample {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
