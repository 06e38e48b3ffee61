//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON job files
//! - Validate configuration legality
//! - Produce a `JobConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let job = ConfigLoader::load_from_path(Path::new("job.toml")).unwrap();
//! println!("Interval: {}", job.alignment.resample_interval);
//! ```

mod parser;
mod validator;

pub use contracts::JobConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;
use tracing::debug;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<JobConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        let job = Self::load_from_str(&content, format)?;
        debug!(path = %path.display(), ?format, "Job configuration loaded");
        Ok(job)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<JobConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate an already assembled configuration
    ///
    /// Used after command-line overrides have been applied.
    pub fn validate(job: &JobConfig) -> Result<(), ContractError> {
        validator::validate(job)
    }

    /// Serialize JobConfig to TOML string
    pub fn to_toml(job: &JobConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(job)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize JobConfig to JSON string
    pub fn to_json(job: &JobConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(job)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        std::fs::read_to_string(path)
            .map_err(|e| ContractError::read(path.display().to_string(), e))
    }

    /// Parse and validate configuration content
    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<JobConfig, ContractError> {
        let job = parser::parse(content, format)?;
        validator::validate(&job)?;
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SinkType;

    const MINIMAL_TOML: &str = r#"
[inputs.tabular]
path = "drive.csv"
speed_unit = "mph"

[inputs.tagged]
path = "engine.xml"

[alignment]
resample_interval = 0.2

[[sinks]]
name = "merged"
sink_type = "file"
[sinks.params]
path = "out/merged.csv"
write_meta = "true"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let job = result.unwrap();
        assert_eq!(job.alignment.resample_interval, 0.2);
        assert_eq!(job.sinks[0].sink_type, SinkType::File);
    }

    #[test]
    fn test_round_trip_toml() {
        let job = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&job).unwrap();
        let job2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(job.inputs.tabular.path, job2.inputs.tabular.path);
        assert_eq!(job.inputs.tabular.speed_unit, job2.inputs.tabular.speed_unit);
        assert_eq!(job.sinks.len(), job2.sinks.len());
        assert_eq!(job.sinks[0].params, job2.sinks[0].params);
    }

    #[test]
    fn test_round_trip_json() {
        let job = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&job).unwrap();
        let job2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(
            job.alignment.resample_interval,
            job2.alignment.resample_interval
        );
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[inputs.tabular]
path = "drive.csv"

[inputs.tagged]
path = "engine.xml"

[alignment]
resample_interval = 0.0
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(matches!(
            result,
            Err(ContractError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, MINIMAL_TOML).unwrap();

        let job = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(job.inputs.tagged.path.to_str(), Some("engine.xml"));
    }

    #[test]
    fn test_load_from_path_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.yaml");
        std::fs::write(&path, MINIMAL_TOML).unwrap();

        let err = ConfigLoader::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load_from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ContractError::Read { .. }));
    }
}
