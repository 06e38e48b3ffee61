//! FileSink - writes the merged table (and optional companions) to disk

use contracts::{AlignmentReport, ContractError, TableSink, UniformSeries};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

use super::param_flag;
use crate::encode::{write_csv, write_series_csv};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Merged CSV output path
    pub path: PathBuf,
    /// Also write `<stem>.first.csv` / `<stem>.second.csv`
    pub write_resampled: bool,
    /// Also write `<stem>.meta.json`
    pub write_meta: bool,
}

impl FileSinkConfig {
    /// Create config from params map
    ///
    /// `path` is required; `write_resampled` and `write_meta` default to off.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ContractError> {
        let path = params
            .get("path")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                ContractError::config_validation("params.path", "file sink requires a 'path'")
            })?;

        Ok(Self {
            path,
            write_resampled: param_flag(params, "write_resampled"),
            write_meta: param_flag(params, "write_meta"),
        })
    }

    /// Sibling of the output path sharing its stem: `out/merged.csv` → `out/merged.<suffix>`
    pub fn companion_path(&self, suffix: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "merged".to_string());
        self.path.with_file_name(format!("{stem}.{suffix}"))
    }
}

/// Summary written next to the merged table
#[derive(Debug, Serialize)]
struct RunMeta<'a> {
    generated_at: String,
    offset: f64,
    offset_source: &'a contracts::OffsetSource,
    rows: usize,
    matched_rows: usize,
    overlap_ratio: f64,
    columns: &'a [String],
    first: SeriesMeta<'a>,
    second: SeriesMeta<'a>,
}

#[derive(Debug, Serialize)]
struct SeriesMeta<'a> {
    time_channel: &'a str,
    speed_channel: &'a str,
    points: usize,
    interval: f64,
    time_range: Option<(f64, f64)>,
}

impl<'a> From<&'a UniformSeries> for SeriesMeta<'a> {
    fn from(series: &'a UniformSeries) -> Self {
        Self {
            time_channel: series.time_channel(),
            speed_channel: series.speed_channel(),
            points: series.len(),
            interval: series.interval,
            time_range: series.time_range(),
        }
    }
}

/// Sink that writes reports to disk files
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
    files_written: Vec<PathBuf>,
}

impl FileSink {
    /// Create a new FileSink, creating the output directory if needed
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            name: name.into(),
            config,
            files_written: Vec::new(),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let config = FileSinkConfig::from_params(params)?;
        Ok(Self::new(name, config)?)
    }

    /// Files produced so far
    pub fn files_written(&self) -> &[PathBuf] {
        &self.files_written
    }

    fn write_report_to_disk(&mut self, report: &AlignmentReport) -> std::io::Result<()> {
        let path = self.config.path.clone();
        Self::write_with(&path, |w| write_csv(&report.table, w))?;
        self.files_written.push(path);

        if self.config.write_resampled {
            for (suffix, series) in [("first.csv", &report.first), ("second.csv", &report.second)] {
                let path = self.config.companion_path(suffix);
                Self::write_with(&path, |w| write_series_csv(series, "time", w))?;
                self.files_written.push(path);
            }
        }

        if self.config.write_meta {
            let meta = RunMeta {
                generated_at: chrono::Utc::now().to_rfc3339(),
                offset: report.offset,
                offset_source: &report.offset_source,
                rows: report.table.len(),
                matched_rows: report.matched_rows,
                overlap_ratio: report.overlap_ratio(),
                columns: report.table.columns(),
                first: SeriesMeta::from(&report.first),
                second: SeriesMeta::from(&report.second),
            };
            let path = self.config.companion_path("meta.json");
            let file = File::create(&path)?;
            serde_json::to_writer_pretty(file, &meta)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            self.files_written.push(path);
        }

        Ok(())
    }

    fn write_with(
        path: &Path,
        encode: impl FnOnce(&mut BufWriter<File>) -> Result<(), ContractError>,
    ) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        encode(&mut writer).map_err(std::io::Error::other)?;
        writer.flush()?;
        debug!(path = %path.display(), "File written");
        Ok(())
    }

    fn persist_report(&mut self, report: &AlignmentReport) -> Result<(), ContractError> {
        self.write_report_to_disk(report).map_err(|e| {
            error!(sink = %self.name, path = %self.config.path.display(), error = %e, "Write failed");
            ContractError::sink_write(&self.name, e.to_string())
        })
    }
}

impl TableSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        skip(self, report),
        fields(sink = %self.name, rows = report.table.len())
    )]
    async fn write(&mut self, report: &AlignmentReport) -> Result<(), ContractError> {
        self.persist_report(report)?;
        info!(
            sink = %self.name,
            path = %self.config.path.display(),
            rows = report.table.len(),
            "Merged table written"
        );
        Ok(())
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, files = self.files_written.len(), "FileSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::tests::sample_report;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_sink_write() {
        let dir = tempdir().unwrap();
        let config = FileSinkConfig {
            path: dir.path().join("nested").join("merged.csv"),
            write_resampled: false,
            write_meta: false,
        };

        let mut sink = FileSink::new("test_file", config).unwrap();
        sink.write(&sample_report()).await.unwrap();
        sink.flush().await.unwrap();

        let text = fs::read_to_string(dir.path().join("nested/merged.csv")).unwrap();
        assert_eq!(
            text,
            "Time,csv_Speed,xml_Speed\n0.000,10,\n0.500,12.5,11\n1.000,15,14\n"
        );
        assert_eq!(sink.files_written().len(), 1);
    }

    #[tokio::test]
    async fn test_file_sink_companions() {
        let dir = tempdir().unwrap();
        let params = HashMap::from([
            (
                "path".to_string(),
                dir.path().join("run.csv").display().to_string(),
            ),
            ("write_resampled".to_string(), "true".to_string()),
            ("write_meta".to_string(), "yes".to_string()),
        ]);

        let mut sink = FileSink::from_params("file", &params).unwrap();
        sink.write(&sample_report()).await.unwrap();

        assert!(dir.path().join("run.first.csv").exists());
        assert!(dir.path().join("run.second.csv").exists());

        let meta: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("run.meta.json")).unwrap())
                .unwrap();
        assert_eq!(meta["offset"], 0.5);
        assert_eq!(meta["rows"], 3);
        assert_eq!(meta["matched_rows"], 2);
        assert_eq!(meta["offset_source"]["kind"], "estimated");
        assert_eq!(meta["first"]["points"], 3);
        assert!(meta["generated_at"].is_string());
    }

    #[test]
    fn test_config_requires_path() {
        let err = FileSinkConfig::from_params(&HashMap::new()).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_companion_path() {
        let config = FileSinkConfig {
            path: PathBuf::from("out/merged.csv"),
            write_resampled: true,
            write_meta: true,
        };
        assert_eq!(
            config.companion_path("meta.json"),
            PathBuf::from("out/merged.meta.json")
        );
    }
}
