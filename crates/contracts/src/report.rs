//! AlignmentReport - Sync engine output

use serde::{Deserialize, Serialize};

use crate::{MergedTable, UniformSeries};

/// How the offset used for merging was obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OffsetSource {
    /// Cross-correlation estimate
    Estimated {
        /// Winning lag in grid steps
        lag: i64,
        /// Unnormalized correlation score at that lag
        score: f64,
    },
    /// Supplied by the caller, offset search skipped
    Manual,
}

/// Result of one alignment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// First (tabular) series on its uniform grid
    pub first: UniformSeries,

    /// Second (tagged-record) series on its uniform grid
    pub second: UniformSeries,

    /// Offset applied when merging (seconds)
    pub offset: f64,

    /// Provenance of `offset`
    pub offset_source: OffsetSource,

    /// Records whose second-series index fell inside the second grid
    pub matched_rows: usize,

    /// Synchronized table
    pub table: MergedTable,
}

impl AlignmentReport {
    /// Fraction of merged records that found a second-series sample
    pub fn overlap_ratio(&self) -> f64 {
        if self.table.is_empty() {
            0.0
        } else {
            self.matched_rows as f64 / self.table.len() as f64
        }
    }
}
