//! Uniform-grid resampling by linear interpolation.

use std::cmp::Ordering;

use contracts::{Channel, ContractError, DuplicatePolicy, RawSeries, UniformSeries};
use tracing::{debug, instrument};

/// Upper bound on the capacity reserved up front for a grid
const MAX_PREALLOCATED_POINTS: usize = 1 << 20;

/// Sorted distinct timestamps and the sample index each one resolves to
#[derive(Debug)]
struct TimeSpine {
    times: Vec<f64>,
    indices: Vec<usize>,
}

impl TimeSpine {
    /// Index the finite timestamps of `times`.
    ///
    /// Returns `None` when no finite, non-null timestamp exists.
    fn build(times: &[Option<f64>], policy: DuplicatePolicy) -> Option<Self> {
        let mut pairs: Vec<(f64, usize)> = times
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.filter(|t| t.is_finite()).map(|t| (t, i)))
            .collect();

        if pairs.is_empty() {
            return None;
        }

        // Stable sort keeps source order inside each run of equal timestamps
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut spine = Self {
            times: Vec::with_capacity(pairs.len()),
            indices: Vec::with_capacity(pairs.len()),
        };

        for run in pairs.chunk_by(|a, b| a.0 == b.0) {
            let (t, i) = match policy {
                DuplicatePolicy::LastSampleWins => run[run.len() - 1],
                DuplicatePolicy::FirstSampleWins => run[0],
            };
            spine.times.push(t);
            spine.indices.push(i);
        }

        Some(spine)
    }

    fn t_min(&self) -> f64 {
        self.times[0]
    }

    fn t_max(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Value of `values` at time `t`, clamped at both ends of the spine
    fn sample(&self, values: &[Option<f64>], t: f64) -> Option<f64> {
        let last = self.times.len() - 1;
        let at = |k: usize| values.get(self.indices[k]).copied().flatten();

        if t <= self.times[0] {
            return at(0);
        }
        if t >= self.times[last] {
            return at(last);
        }

        // First distinct timestamp >= t; lies in 1..=last given the guards above
        let k = self.times.partition_point(|&x| x < t);
        interpolate(t, self.times[k - 1], at(k - 1), self.times[k], at(k))
    }
}

/// Linear interpolation between `(t1, y1)` and `(t2, y2)`.
///
/// Any null/non-finite endpoint, or a zero-width bracket, yields `y1` as is.
fn interpolate(t: f64, t1: f64, y1: Option<f64>, t2: f64, y2: Option<f64>) -> Option<f64> {
    match (y1, y2) {
        (Some(a), Some(b)) if a.is_finite() && b.is_finite() && t1 != t2 => {
            let alpha = (t - t1) / (t2 - t1);
            Some(a + alpha * (b - a))
        }
        _ => y1,
    }
}

/// Grid `t_min, t_min+Δ, …` built by repeated addition while `<= t_max`
fn uniform_grid(
    t_min: f64,
    t_max: f64,
    interval: f64,
    channel: &str,
) -> Result<Vec<f64>, ContractError> {
    let estimate = ((t_max - t_min) / interval) as usize;
    let mut grid = Vec::with_capacity(estimate.saturating_add(1).min(MAX_PREALLOCATED_POINTS));

    let mut t = t_min;
    while t <= t_max {
        grid.push(t);
        let next = t + interval;
        if next <= t {
            return Err(ContractError::resample(
                channel,
                format!("resample interval {interval} is too small to advance past t={t}"),
            ));
        }
        t = next;
    }

    Ok(grid)
}

/// Converts an irregularly sampled series into a uniform-grid series
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    interval: f64,
    duplicate_policy: DuplicatePolicy,
}

impl Resampler {
    /// Resampler with step `interval` and the default duplicate policy
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Override the duplicate-timestamp tie-break
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Grid step
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Resample every non-time channel of `series` onto a uniform grid
    /// spanning its valid timestamps.
    ///
    /// # Errors
    /// - interval not finite or not positive
    /// - no finite timestamp in the time channel
    #[instrument(
        level = "debug",
        name = "resampler_resample",
        skip(self, series),
        fields(time_channel = %series.time_channel(), samples = series.len())
    )]
    pub fn resample(&self, series: &RawSeries) -> Result<UniformSeries, ContractError> {
        let time_channel = series.time_channel();

        if !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(ContractError::resample(
                time_channel,
                format!(
                    "resample interval must be finite and > 0, got {}",
                    self.interval
                ),
            ));
        }

        let spine = TimeSpine::build(series.time_values(), self.duplicate_policy).ok_or_else(
            || {
                ContractError::resample(
                    time_channel,
                    format!("No valid time data in column '{time_channel}'."),
                )
            },
        )?;

        let grid = uniform_grid(spine.t_min(), spine.t_max(), self.interval, time_channel)?;

        let channels: Vec<Channel> = series
            .channels()
            .iter()
            .filter(|c| c.name != time_channel)
            .map(|c| {
                let values = grid.iter().map(|&t| spine.sample(&c.values, t)).collect();
                Channel::new(c.name.clone(), values)
            })
            .collect();

        debug!(
            t_min = spine.t_min(),
            t_max = spine.t_max(),
            distinct_times = spine.times.len(),
            grid_points = grid.len(),
            channels = channels.len(),
            "Series resampled"
        );

        UniformSeries::new(
            grid,
            self.interval,
            time_channel,
            series.speed_channel(),
            channels,
        )
    }
}
