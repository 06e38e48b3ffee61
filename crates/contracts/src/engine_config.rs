//! Sync engine configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

/// Default resample step (seconds)
pub const DEFAULT_RESAMPLE_INTERVAL: f64 = 0.1;

/// Minimum grid length either resampled series must reach
pub const DEFAULT_MIN_SAMPLES: usize = 10;

/// Sync engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Uniform grid step Δ, shared by both series (seconds)
    pub resample_interval: f64,

    /// Fixed offset; when set the offset search is skipped
    pub manual_offset: Option<f64>,

    /// Sample floor checked after resampling
    pub min_samples: usize,

    /// Which sample wins when a timestamp repeats
    pub duplicate_policy: DuplicatePolicy,

    /// Merged-table naming
    pub merge: MergeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resample_interval: DEFAULT_RESAMPLE_INTERVAL,
            manual_offset: None,
            min_samples: DEFAULT_MIN_SAMPLES,
            duplicate_policy: DuplicatePolicy::default(),
            merge: MergeConfig::default(),
        }
    }
}

/// Tie-break applied while indexing distinct timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later-occurring sample replaces earlier ones
    #[default]
    LastSampleWins,
    /// The first-occurring sample is kept
    FirstSampleWins,
}

/// Column naming for the merged table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Name of the formatted grid time column
    #[serde(default = "default_time_column")]
    pub time_column: String,

    /// Prefix for first-series (tabular) channels
    #[serde(default = "default_first_prefix")]
    pub first_prefix: String,

    /// Prefix for second-series (tagged-record) channels
    #[serde(default = "default_second_prefix")]
    pub second_prefix: String,
}

fn default_time_column() -> String {
    "Time".to_string()
}

fn default_first_prefix() -> String {
    "csv_".to_string()
}

fn default_second_prefix() -> String {
    "xml_".to_string()
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            time_column: default_time_column(),
            first_prefix: default_first_prefix(),
            second_prefix: default_second_prefix(),
        }
    }
}
