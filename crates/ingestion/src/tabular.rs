//! Delimited-text log parser.
//!
//! One header row, then one record per line with exactly as many fields as
//! the header. Every column becomes a channel; the time and speed channels are
//! auto-detected from the header names and are never the same column.

use std::collections::HashMap;
use std::path::Path;

use contracts::{Channel, RawSeries, TabularInput};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::error::{IngestionError, Result};
use crate::read::read_text;

/// Cells that are typed as numbers; anything else becomes a missing sample
static NUMERIC_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*-?([0-9]+\.?|\.[0-9]+|[0-9]+\.[0-9]+)([eE][-+]?[0-9]+)?\s*$").expect("numeric cell pattern")
});

/// Parser for CSV-like speed logs
#[derive(Debug, Clone)]
pub struct TabularParser {
    delimiter: u8,
    comment: Option<u8>,
}

impl Default for TabularParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            comment: Some(b'#'),
        }
    }
}

impl TabularParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser configured from a job's tabular input section.
    ///
    /// Non-ASCII delimiter or comment characters fall back to the defaults;
    /// the config validator rejects them before this point.
    pub fn from_input(input: &TabularInput) -> Self {
        let defaults = Self::default();
        Self {
            delimiter: ascii_byte(input.delimiter).unwrap_or(defaults.delimiter),
            comment: ascii_byte(input.comment).or(defaults.comment),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Comment prefix; `None` disables comment skipping
    pub fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Read and parse a file
    pub fn parse_path(&self, path: &Path) -> Result<RawSeries> {
        let text = read_text(path)?;
        self.parse_str(&text)
    }

    /// Parse CSV text into a raw series.
    ///
    /// # Errors
    /// - malformed CSV, including rows whose field count differs from the header
    /// - no header containing `time` or no header containing `speed`
    #[instrument(name = "tabular_parse", level = "debug", skip(self, text), fields(bytes = text.len()))]
    pub fn parse_str(&self, text: &str) -> Result<RawSeries> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .comment(self.comment)
            .from_reader(text.as_bytes());

        let headers = reader.headers().map_err(csv_error)?.clone();
        let names = dedupe_headers(headers.iter());

        let time_name = find_column(&names, "time", None);
        let speed_name = find_column(&names, "speed", time_name.as_deref());
        let (Some(time_name), Some(speed_name)) = (time_name, speed_name) else {
            return Err(IngestionError::MissingColumns { headers: names });
        };

        let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            for (k, column) in columns.iter_mut().enumerate() {
                column.push(record.get(k).and_then(parse_cell));
            }
        }

        let rows = columns.first().map_or(0, Vec::len);
        debug!(
            rows,
            columns = names.len(),
            time_column = %time_name,
            speed_column = %speed_name,
            "Tabular log parsed"
        );

        let channels = names
            .iter()
            .zip(columns)
            .map(|(name, values)| Channel::new(name.clone(), values))
            .collect();

        Ok(RawSeries::new(time_name, speed_name, channels)?)
    }
}

fn ascii_byte(c: char) -> Option<u8> {
    c.is_ascii().then_some(c as u8)
}

fn csv_error(source: csv::Error) -> IngestionError {
    IngestionError::Csv {
        message: source.to_string(),
        source,
    }
}

/// First header whose lowercase form contains `needle`, skipping `exclude`
fn find_column(names: &[String], needle: &str, exclude: Option<&str>) -> Option<String> {
    names
        .iter()
        .filter(|name| Some(name.as_str()) != exclude)
        .find(|name| name.to_lowercase().contains(needle))
        .cloned()
}

/// Rename repeated header names to `name_1`, `name_2`, …
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::new();

    for header in headers {
        let mut name = header.to_string();
        if let Some(&count) = seen.get(header) {
            let mut suffix = count;
            loop {
                let candidate = format!("{header}_{suffix}");
                suffix += 1;
                if !seen.contains_key(&candidate) {
                    name = candidate;
                    break;
                }
            }
            seen.insert(header.to_string(), suffix);
        }
        seen.entry(name.clone()).or_insert(1);
        names.push(name);
    }

    names
}

/// Numeric value of a cell, `None` for empty or non-numeric cells
fn parse_cell(cell: &str) -> Option<f64> {
    if !NUMERIC_CELL.is_match(cell) {
        return None;
    }
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
