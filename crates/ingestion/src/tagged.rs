//! Tagged-record log parser.
//!
//! The log is a sequence of `<EngineDataLog>…</EngineDataLog>` blocks, each
//! holding one `<Tag>value</Tag>` element per field. The field set is taken
//! from the first block. This is plain pattern matching, not an XML parser:
//! attributes, namespaces and entities are not interpreted.

use std::path::Path;

use contracts::{Channel, RawSeries, RecordTags, TaggedInput};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::error::{IngestionError, Result};
use crate::read::read_text;

static OPEN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([A-Za-z]+)>").expect("open tag pattern"));

static ELAPSED_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]+))?$").expect("elapsed time pattern")
});

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|[0-9]+\.?[0-9]*(?:[eE][+-]?[0-9]+)?|\.[0-9]+(?:[eE][+-]?[0-9]+)?)")
        .expect("float prefix pattern")
});

/// Parser for `<EngineDataLog>` style logs
#[derive(Debug, Clone, Default)]
pub struct TaggedRecordParser {
    tags: RecordTags,
}

impl TaggedRecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_input(input: &TaggedInput) -> Self {
        Self {
            tags: input.tags.clone(),
        }
    }

    pub fn with_tags(mut self, tags: RecordTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn tags(&self) -> &RecordTags {
        &self.tags
    }

    /// Read and parse a file
    pub fn parse_path(&self, path: &Path) -> Result<RawSeries> {
        let text = read_text(path)?;
        self.parse_str(&text)
    }

    /// Parse tagged-record text into a raw series.
    ///
    /// # Errors
    /// - no record block
    /// - first block has no field tags
    /// - time or speed tag absent from the first block
    #[instrument(name = "tagged_parse", level = "debug", skip(self, text), fields(bytes = text.len()))]
    pub fn parse_str(&self, text: &str) -> Result<RawSeries> {
        let record = &self.tags.record;
        let record_re = Regex::new(&element_pattern(record, r"[\s\S]*?", false))?;

        let entries: Vec<&str> = record_re.find_iter(text).map(|m| m.as_str()).collect();
        let Some(first) = entries.first() else {
            return Err(IngestionError::NoRecords {
                record: record.clone(),
            });
        };

        let mut keys: Vec<String> = Vec::new();
        for caps in OPEN_TAG.captures_iter(first) {
            let key = &caps[1];
            if key != record && !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        if keys.is_empty() {
            return Err(IngestionError::NoTags {
                record: record.clone(),
            });
        }

        let mut channels = Vec::with_capacity(keys.len());
        for key in &keys {
            let value_re = Regex::new(&element_pattern(key, r"[\s\S]*?", true))?;
            let is_time = *key == self.tags.time;

            let values = entries
                .iter()
                .map(|entry| {
                    let raw = value_re
                        .captures(entry)
                        .and_then(|caps| caps.get(1))
                        .map(|m| m.as_str().trim());
                    if is_time {
                        raw.and_then(parse_elapsed_time)
                    } else {
                        raw.and_then(parse_float_prefix)
                    }
                })
                .collect();

            channels.push(Channel::new(key.clone(), values));
        }

        if !keys.contains(&self.tags.time) || !keys.contains(&self.tags.speed) {
            return Err(IngestionError::MissingTags {
                time: self.tags.time.clone(),
                speed: self.tags.speed.clone(),
            });
        }

        debug!(
            records = entries.len(),
            tags = keys.len(),
            "Tagged-record log parsed"
        );

        Ok(RawSeries::new(
            self.tags.time.clone(),
            self.tags.speed.clone(),
            channels,
        )?)
    }
}

/// `<tag>body</tag>`, optionally capturing the body
fn element_pattern(tag: &str, body: &str, capture: bool) -> String {
    let tag = regex::escape(tag);
    if capture {
        format!("<{tag}>({body})</{tag}>")
    } else {
        format!("<{tag}>{body}</{tag}>")
    }
}

/// `HH:MM:SS[.fraction]` to seconds
pub fn parse_elapsed_time(raw: &str) -> Option<f64> {
    let caps = ELAPSED_TIME.captures(raw)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    let fraction: f64 = match caps.get(4) {
        Some(m) => format!("0.{}", m.as_str()).parse().ok()?,
        None => 0.0,
    };
    Some(hours * 3600.0 + minutes * 60.0 + seconds + fraction)
}

/// Longest numeric prefix of `raw`, ignoring trailing garbage (`"42 km/h"` → 42)
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let m = FLOAT_PREFIX.find(raw.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = r#"<?xml version="1.0"?>
<Log>
  <EngineDataLog>
    <LogTime>00:00:01.5</LogTime>
    <VehicleSpeed>30</VehicleSpeed>
    <EngineRPM>1500 rpm</EngineRPM>
  </EngineDataLog>
  <EngineDataLog>
    <LogTime>00:00:02</LogTime>
    <VehicleSpeed> 32.5 </VehicleSpeed>
    <EngineRPM>n/a</EngineRPM>
  </EngineDataLog>
  <EngineDataLog>
    <LogTime>bad</LogTime>
    <EngineRPM>1600</EngineRPM>
  </EngineDataLog>
</Log>
"#;

    #[test]
    fn test_parse_log() {
        let series = TaggedRecordParser::new().parse_str(LOG).unwrap();

        assert_eq!(series.time_channel(), "LogTime");
        assert_eq!(series.speed_channel(), "VehicleSpeed");
        assert_eq!(series.len(), 3);

        let names: Vec<&str> = series.channels().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["LogTime", "VehicleSpeed", "EngineRPM"]);

        assert_eq!(series.time_values(), &[Some(1.5), Some(2.0), None]);
        assert_eq!(series.speed_values(), &[Some(30.0), Some(32.5), None]);
        assert_eq!(
            series.channel("EngineRPM").unwrap().values,
            vec![Some(1500.0), None, Some(1600.0)]
        );
    }

    #[test]
    fn test_no_records() {
        let err = TaggedRecordParser::new()
            .parse_str("<Log><Other/></Log>")
            .unwrap_err();
        assert_eq!(err.to_string(), "No <EngineDataLog> entries found.");
    }

    #[test]
    fn test_unterminated_record_is_not_a_record() {
        let err = TaggedRecordParser::new()
            .parse_str("<EngineDataLog><LogTime>00:00:01</LogTime>")
            .unwrap_err();
        assert!(matches!(err, IngestionError::NoRecords { .. }));
    }

    #[test]
    fn test_no_tags() {
        let err = TaggedRecordParser::new()
            .parse_str("<EngineDataLog> 12 </EngineDataLog>")
            .unwrap_err();
        assert_eq!(err.to_string(), "Could not find tags in <EngineDataLog>.");
    }

    #[test]
    fn test_missing_speed_tag() {
        let text = "<EngineDataLog><LogTime>00:00:01</LogTime><Rpm>1</Rpm></EngineDataLog>";
        let err = TaggedRecordParser::new().parse_str(text).unwrap_err();
        assert_eq!(
            err.to_string(),
            "XML file must contain <LogTime> and <VehicleSpeed> tags with data."
        );
    }

    #[test]
    fn test_tag_set_comes_from_first_record() {
        let text = "<EngineDataLog><LogTime>00:00:01</LogTime><VehicleSpeed>1</VehicleSpeed></EngineDataLog>\
                    <EngineDataLog><LogTime>00:00:02</LogTime><VehicleSpeed>2</VehicleSpeed><Extra>9</Extra></EngineDataLog>";
        let series = TaggedRecordParser::new().parse_str(text).unwrap();
        assert!(series.channel("Extra").is_none());
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_custom_tags() {
        let tags = RecordTags {
            record: "Row".into(),
            time: "Clock".into(),
            speed: "Kph".into(),
        };
        let text = "<Row><Clock>01:00:00</Clock><Kph>50</Kph></Row><Row><Clock>01:00:01.25</Clock><Kph>51</Kph></Row>";
        let series = TaggedRecordParser::new()
            .with_tags(tags)
            .parse_str(text)
            .unwrap();
        assert_eq!(series.time_values(), &[Some(3600.0), Some(3601.25)]);
        assert_eq!(series.speed_channel(), "Kph");
    }

    #[test]
    fn test_parse_elapsed_time() {
        assert_eq!(parse_elapsed_time("00:00:00"), Some(0.0));
        assert_eq!(parse_elapsed_time("01:02:03"), Some(3723.0));
        assert_eq!(parse_elapsed_time("00:00:10.25"), Some(10.25));
        assert_eq!(parse_elapsed_time("99:59:59.5"), Some(359999.5));
        assert_eq!(parse_elapsed_time("1:02:03"), None);
        assert_eq!(parse_elapsed_time("00:00:10."), None);
        assert_eq!(parse_elapsed_time("00:00"), None);
        assert_eq!(parse_elapsed_time(""), None);
        assert_eq!(parse_elapsed_time("00:00:\u{0661}\u{0662}"), None);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("  -3.5e1xyz"), Some(-35.0));
        assert_eq!(parse_float_prefix("42 km/h"), Some(42.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("+7."), Some(7.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("NaN"), None);
        assert_eq!(parse_float_prefix("12\u{0661}"), Some(12.0));
        assert_eq!(parse_float_prefix("\u{0661}2"), None);
    }
}
