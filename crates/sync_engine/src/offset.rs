//! Offset estimation by cross-correlation of the speed channels.
//!
//! The score is an unnormalized dot product of the mean-centred speed
//! signals. Missing samples count as zero both in the mean and in the
//! products, and longer overlaps score higher. Both traits bias the result
//! and are kept as is.

use contracts::UniformSeries;
use serde::Serialize;
use tracing::{debug, instrument};

/// Outcome of one offset search
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OffsetEstimate {
    /// Winning integer lag (grid samples)
    pub lag: i64,

    /// Score of the winning lag; `-inf` when no lag was scored
    pub score: f64,

    /// `lag` converted to time units
    pub offset: f64,

    /// Searched lag range is `[-max_lag, max_lag]`
    pub max_lag: usize,
}

/// Cross-correlation offset search over uniform series
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetFinder;

impl OffsetFinder {
    pub fn new() -> Self {
        Self
    }

    /// Offset (time units) that best aligns `b` onto `a`.
    ///
    /// Never fails; degenerate inputs yield `0.0`.
    pub fn find_offset(&self, a: &UniformSeries, b: &UniformSeries) -> f64 {
        self.estimate(a, b).offset
    }

    /// Full search result, including the winning lag and its score
    #[instrument(
        level = "debug",
        name = "offset_finder_estimate",
        skip(self, a, b),
        fields(first_len = a.len(), second_len = b.len())
    )]
    pub fn estimate(&self, a: &UniformSeries, b: &UniformSeries) -> OffsetEstimate {
        let a_norm = centred(a);
        let b_norm = centred(b);

        let max_lag = b_norm.len() / 2;
        let mut best_lag = 0i64;
        let mut best_score = f64::NEG_INFINITY;

        let max = max_lag as i64;
        for lag in -max..=max {
            let score = lag_score(&a_norm, &b_norm, lag);
            if score > best_score {
                best_score = score;
                best_lag = lag;
            }
        }

        let offset = best_lag as f64 * a.grid_step();
        let offset = if offset.is_finite() { offset } else { 0.0 };

        debug!(
            lag = best_lag,
            score = best_score,
            offset,
            max_lag,
            "Offset search finished"
        );

        OffsetEstimate {
            lag: best_lag,
            score: best_score,
            offset,
            max_lag,
        }
    }
}

/// Speed samples with missing values as zero, minus their mean
fn centred(series: &UniformSeries) -> Vec<f64> {
    let values: Vec<f64> = match series.speed() {
        Some(speed) => speed
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()).unwrap_or(0.0))
            .collect(),
        None => vec![0.0; series.len()],
    };

    if values.is_empty() {
        return values;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.into_iter().map(|v| v - mean).collect()
}

/// `Σ a[i] · b[i - lag]` over every `i` with `i - lag` inside `b`
fn lag_score(a: &[f64], b: &[f64], lag: i64) -> f64 {
    let (a_start, b_start) = if lag >= 0 {
        (lag as usize, 0)
    } else {
        (0, lag.unsigned_abs() as usize)
    };

    if a_start >= a.len() || b_start >= b.len() {
        return 0.0;
    }

    a[a_start..]
        .iter()
        .zip(&b[b_start..])
        .map(|(x, y)| x * y)
        .sum()
}
