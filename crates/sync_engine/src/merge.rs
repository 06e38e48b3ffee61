//! Nearest-grid-index join of two uniform series at a fixed offset.

use contracts::{FieldValue, MergeConfig, MergedTable, UniformSeries};
use tracing::{debug, instrument};

/// Fixed-point rendering of a grid time with three decimals
///
/// Negative zero renders as `0.000`.
pub fn format_grid_time(t: f64) -> String {
    let rounded = format!("{t:.3}");
    match rounded.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => rounded,
    }
}

/// Half-up rounding, matching the usual "round to nearest, .5 goes up" rule
#[inline]
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Joins a second series onto the grid of a first series
#[derive(Debug, Clone, Default)]
pub struct Merger {
    config: MergeConfig,
}

impl Merger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge `b` onto the grid of `a`, shifted by `offset`.
    ///
    /// One record per grid point of `a`. Second-series fields are present in
    /// every record and null wherever the shifted index falls outside `b`.
    #[instrument(
        level = "debug",
        name = "merger_merge",
        skip(self, a, b),
        fields(first_len = a.len(), second_len = b.len())
    )]
    pub fn merge(&self, a: &UniformSeries, b: &UniformSeries, offset: f64) -> MergedTable {
        let mut columns = Vec::with_capacity(1 + a.channels().len() + b.channels().len());
        columns.push(self.config.time_column.clone());
        columns.extend(
            a.channels()
                .iter()
                .map(|c| format!("{}{}", self.config.first_prefix, c.name)),
        );
        columns.extend(
            b.channels()
                .iter()
                .map(|c| format!("{}{}", self.config.second_prefix, c.name)),
        );

        let mut table = MergedTable::with_capacity(columns, a.len());
        let mut matched = 0usize;

        for (i, &t) in a.time.iter().enumerate() {
            let mut row = Vec::with_capacity(table.columns().len());
            row.push(FieldValue::Text(format_grid_time(t)));
            row.extend(a.channels().iter().map(|c| FieldValue::from(c.values[i])));

            match second_index(a, b, t, offset) {
                Some(j) => {
                    matched += 1;
                    row.extend(b.channels().iter().map(|c| FieldValue::from(c.values[j])));
                }
                None => row.extend(b.channels().iter().map(|_| FieldValue::Null)),
            }

            table.push_row(row);
        }

        debug!(
            rows = table.len(),
            columns = table.columns().len(),
            matched,
            "Series merged"
        );

        table
    }

    /// Number of first-series grid points that land inside `b` at `offset`
    pub fn matched_rows(&self, a: &UniformSeries, b: &UniformSeries, offset: f64) -> usize {
        a.time
            .iter()
            .filter(|&&t| second_index(a, b, t, offset).is_some())
            .count()
    }
}

/// Index into `b` nearest to `t - offset`, if it lies inside `b`
fn second_index(a: &UniformSeries, b: &UniformSeries, t: f64, offset: f64) -> Option<usize> {
    let b_start = *b.time.first()?;
    let j = round_half_up((t - offset - b_start) / a.grid_step());

    if j.is_finite() && j >= 0.0 && j < b.len() as f64 {
        Some(j as usize)
    } else {
        None
    }
}
