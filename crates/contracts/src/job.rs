//! JobConfig - Config Loader output
//!
//! Describes one alignment job: the two inputs, alignment settings, merged
//! table naming and output routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::{
    DuplicatePolicy, EngineConfig, MergeConfig, DEFAULT_MIN_SAMPLES, DEFAULT_RESAMPLE_INTERVAL,
};

/// Miles per hour to kilometres per hour
pub const MPH_TO_KPH: f64 = 1.60934;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete job description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Input sources
    pub inputs: InputsConfig,

    /// Resampling / offset settings
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Merged table naming
    #[serde(default)]
    pub merge: MergeConfig,

    /// Output routing
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkConfig>,
}

/// The two input logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Delimited-text log (first series)
    pub tabular: TabularInput,

    /// Tagged-record log (second series)
    pub tagged: TaggedInput,
}

/// Tabular input settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularInput {
    /// Path to the CSV file
    pub path: PathBuf,

    /// Unit of the speed column
    #[serde(default)]
    pub speed_unit: SpeedUnit,

    /// Field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Lines starting with this character are skipped
    #[serde(default = "default_comment")]
    pub comment: char,
}

fn default_delimiter() -> char {
    ','
}

fn default_comment() -> char {
    '#'
}

impl TabularInput {
    /// Tabular input with default parsing options
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            speed_unit: SpeedUnit::default(),
            delimiter: default_delimiter(),
            comment: default_comment(),
        }
    }
}

/// Tagged-record input settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedInput {
    /// Path to the tagged-record file
    pub path: PathBuf,

    /// Unit of the speed tag
    #[serde(default)]
    pub speed_unit: SpeedUnit,

    /// Tags of the parsed record layout
    #[serde(default)]
    pub tags: RecordTags,
}

impl TaggedInput {
    /// Tagged input with the default `EngineDataLog` layout
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            speed_unit: SpeedUnit::default(),
            tags: RecordTags::default(),
        }
    }
}

/// Tag names of a tagged-record log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTags {
    /// Repeated block tag
    #[serde(default = "default_record_tag")]
    pub record: String,

    /// Elapsed-time tag (`HH:MM:SS[.fraction]`)
    #[serde(default = "default_time_tag")]
    pub time: String,

    /// Vehicle speed tag
    #[serde(default = "default_speed_tag")]
    pub speed: String,
}

fn default_record_tag() -> String {
    "EngineDataLog".to_string()
}

fn default_time_tag() -> String {
    "LogTime".to_string()
}

fn default_speed_tag() -> String {
    "VehicleSpeed".to_string()
}

impl Default for RecordTags {
    fn default() -> Self {
        Self {
            record: default_record_tag(),
            time: default_time_tag(),
            speed: default_speed_tag(),
        }
    }
}

/// Speed unit declared for an input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    /// Kilometres per hour (canonical)
    #[default]
    Kph,
    /// Miles per hour, scaled by [`MPH_TO_KPH`]
    Mph,
}

impl SpeedUnit {
    /// Factor converting this unit to kph
    pub fn to_kph_factor(self) -> f64 {
        match self {
            Self::Kph => 1.0,
            Self::Mph => MPH_TO_KPH,
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kph => f.write_str("kph"),
            Self::Mph => f.write_str("mph"),
        }
    }
}

/// Alignment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Uniform grid step (seconds)
    #[serde(default = "default_resample_interval")]
    pub resample_interval: f64,

    /// Fixed offset (seconds); skips the offset search
    #[serde(default)]
    pub manual_offset: Option<f64>,

    /// Sample floor after resampling
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Duplicate-timestamp tie-break
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

fn default_resample_interval() -> f64 {
    DEFAULT_RESAMPLE_INTERVAL
}

fn default_min_samples() -> usize {
    DEFAULT_MIN_SAMPLES
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            resample_interval: default_resample_interval(),
            manual_offset: None,
            min_samples: default_min_samples(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    4
}

impl SinkConfig {
    /// Sink with default queue and no params
    pub fn new(name: impl Into<String>, sink_type: SinkType) -> Self {
        Self {
            name: name.into(),
            sink_type,
            queue_capacity: default_queue_capacity(),
            params: HashMap::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Summary via tracing
    Log,
    /// CSV file output
    File,
    /// CSV on standard output
    Stdout,
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![SinkConfig::new("log", SinkType::Log)]
}

impl JobConfig {
    /// Job with default settings for the given input paths
    pub fn from_inputs(tabular: impl Into<PathBuf>, tagged: impl Into<PathBuf>) -> Self {
        Self {
            version: ConfigVersion::default(),
            inputs: InputsConfig {
                tabular: TabularInput::new(tabular),
                tagged: TaggedInput::new(tagged),
            },
            alignment: AlignmentConfig::default(),
            merge: MergeConfig::default(),
            sinks: default_sinks(),
        }
    }

    /// Build the sync engine configuration for this job
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            resample_interval: self.alignment.resample_interval,
            manual_offset: self.alignment.manual_offset,
            min_samples: self.alignment.min_samples,
            duplicate_policy: self.alignment.duplicate_policy,
            merge: self.merge.clone(),
        }
    }
}
