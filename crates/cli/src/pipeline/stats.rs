//! Pipeline statistics.

use std::fmt;
use std::time::Duration;

use contracts::{AlignmentReport, OffsetSource};
use dispatcher::MetricsSnapshot;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Raw rows in the CSV log
    pub first_rows: usize,

    /// Raw records in the XML log
    pub second_rows: usize,

    /// Grid points after resampling (first, second)
    pub grid_points: (usize, usize),

    /// Offset applied when merging
    pub offset: f64,

    pub offset_source: Option<OffsetSource>,

    /// Rows in the merged table
    pub merged_rows: usize,

    /// Rows with a second-series sample
    pub matched_rows: usize,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Per-sink outcome
    pub sinks: Vec<(String, MetricsSnapshot)>,
}

impl PipelineStats {
    /// Take the figures of interest from a finished alignment
    pub fn record(&mut self, report: &AlignmentReport) {
        self.grid_points = (report.first.len(), report.second.len());
        self.offset = report.offset;
        self.offset_source = Some(report.offset_source);
        self.merged_rows = report.table.len();
        self.matched_rows = report.matched_rows;
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        print!("{self}");
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== speedsync ===\n")?;

        writeln!(f, "Inputs")?;
        writeln!(f, "   ├─ CSV rows: {}", self.first_rows)?;
        writeln!(f, "   ├─ XML records: {}", self.second_rows)?;
        writeln!(
            f,
            "   └─ Grid points: {} / {}",
            self.grid_points.0, self.grid_points.1
        )?;

        writeln!(f, "\nAlignment")?;
        match self.offset_source {
            Some(OffsetSource::Estimated { lag, score }) => writeln!(
                f,
                "   ├─ Offset: {:.3}s (estimated, lag {lag}, score {score:.3})",
                self.offset
            )?,
            Some(OffsetSource::Manual) => writeln!(f, "   ├─ Offset: {:.3}s (manual)", self.offset)?,
            None => writeln!(f, "   ├─ Offset: n/a")?,
        }
        writeln!(
            f,
            "   ├─ Merged rows: {} ({} matched)",
            self.merged_rows, self.matched_rows
        )?;
        writeln!(f, "   └─ Duration: {:.3}s", self.duration.as_secs_f64())?;

        if !self.sinks.is_empty() {
            writeln!(f, "\nSinks")?;
            for (i, (name, snapshot)) in self.sinks.iter().enumerate() {
                let prefix = if i + 1 == self.sinks.len() { "└─" } else { "├─" };
                writeln!(
                    f,
                    "   {prefix} {name}: {} write(s), {} row(s), {} failure(s)",
                    snapshot.write_count, snapshot.rows_written, snapshot.failure_count
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Channel, FieldValue, MergedTable, UniformSeries};

    #[test]
    fn test_record_report() {
        let series = UniformSeries::new(
            vec![0.0, 1.0],
            1.0,
            "Time",
            "Speed",
            vec![Channel::new("Speed", vec![Some(1.0), Some(2.0)])],
        )
        .unwrap();
        let mut table = MergedTable::new(vec!["Time".into()]);
        table.push_row(vec![FieldValue::Text("0.000".into())]);
        table.push_row(vec![FieldValue::Text("1.000".into())]);

        let report = AlignmentReport {
            first: series.clone(),
            second: series,
            offset: 1.0,
            offset_source: OffsetSource::Manual,
            matched_rows: 1,
            table,
        };

        let mut stats = PipelineStats::default();
        stats.record(&report);

        assert_eq!(stats.grid_points, (2, 2));
        assert_eq!(stats.merged_rows, 2);
        assert_eq!(stats.matched_rows, 1);
        assert_eq!(stats.offset_source, Some(OffsetSource::Manual));
    }

    #[test]
    fn test_summary_reports_single_run_once() {
        let stats = PipelineStats {
            first_rows: 120,
            second_rows: 80,
            grid_points: (100, 70),
            offset: 1.5,
            offset_source: Some(OffsetSource::Estimated {
                lag: 15,
                score: 42.0,
            }),
            merged_rows: 100,
            matched_rows: 60,
            ..Default::default()
        };

        let output = stats.to_string();
        assert!(output.contains("CSV rows: 120"));
        assert!(output.contains("Offset: 1.500s (estimated, lag 15, score 42.000)"));
        assert!(output.contains("Merged rows: 100 (60 matched)"));
        assert!(!output.contains("Sinks"));
        assert!(!output.contains("n=1"));
        assert_eq!(output.matches("Offset").count(), 1);
    }
}
