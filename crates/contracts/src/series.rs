//! RawSeries / UniformSeries - Ingestion and Resampler outputs
//!
//! A series is an ordered set of named channels sharing one sample index.
//! The time and speed channels are designated by name on the series itself.

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// A single named channel of optional samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Column / tag name as found in the source
    pub name: String,

    /// Samples, index-aligned with the owning series
    pub values: Vec<Option<f64>>,
}

impl Channel {
    /// Create a channel
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the channel has no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parsed, not-yet-uniform series
///
/// Invariant: every channel has the length of the time channel, and both
/// designated channels exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    time_channel: String,
    speed_channel: String,
    channels: Vec<Channel>,
}

impl RawSeries {
    /// Build a series, checking the designated channels and channel lengths
    pub fn new(
        time_channel: impl Into<String>,
        speed_channel: impl Into<String>,
        channels: Vec<Channel>,
    ) -> Result<Self, ContractError> {
        let time_channel = time_channel.into();
        let speed_channel = speed_channel.into();

        let expected = channels
            .iter()
            .find(|c| c.name == time_channel)
            .map(Channel::len)
            .ok_or_else(|| {
                ContractError::invalid_series(format!("time channel '{time_channel}' not found"))
            })?;

        if !channels.iter().any(|c| c.name == speed_channel) {
            return Err(ContractError::invalid_series(format!(
                "speed channel '{speed_channel}' not found"
            )));
        }

        if let Some(ragged) = channels.iter().find(|c| c.len() != expected) {
            return Err(ContractError::invalid_series(format!(
                "channel '{}' has {} samples, time channel has {}",
                ragged.name,
                ragged.len(),
                expected
            )));
        }

        Ok(Self {
            time_channel,
            speed_channel,
            channels,
        })
    }

    /// Name of the designated time channel
    pub fn time_channel(&self) -> &str {
        &self.time_channel
    }

    /// Name of the designated speed channel
    pub fn speed_channel(&self) -> &str {
        &self.speed_channel
    }

    /// All channels, in source order (time channel included)
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Look up a channel by name
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Samples of the time channel
    pub fn time_values(&self) -> &[Option<f64>] {
        self.channel(&self.time_channel)
            .map(|c| c.values.as_slice())
            .unwrap_or(&[])
    }

    /// Samples of the speed channel
    pub fn speed_values(&self) -> &[Option<f64>] {
        self.channel(&self.speed_channel)
            .map(|c| c.values.as_slice())
            .unwrap_or(&[])
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.time_values().len()
    }

    /// Whether the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `f` to every present sample of the named channel.
    ///
    /// Consumes the series so the input stays immutable from the caller's
    /// point of view; unknown names leave the series untouched.
    pub fn map_channel(mut self, name: &str, f: impl Fn(f64) -> f64) -> Self {
        if let Some(channel) = self.channels.iter_mut().find(|c| c.name == name) {
            for value in channel.values.iter_mut().flatten() {
                *value = f(*value);
            }
        }
        self
    }
}

/// Series resampled onto a fixed-step time grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformSeries {
    /// Uniform time grid `t0, t0+Δ, …`
    pub time: Vec<f64>,

    /// Caller-supplied step Δ
    pub interval: f64,

    time_channel: String,
    speed_channel: String,
    channels: Vec<Channel>,
}

impl UniformSeries {
    /// Assemble a uniform series.
    ///
    /// `channels` must not contain the time channel and each must match the
    /// grid length.
    pub fn new(
        time: Vec<f64>,
        interval: f64,
        time_channel: impl Into<String>,
        speed_channel: impl Into<String>,
        channels: Vec<Channel>,
    ) -> Result<Self, ContractError> {
        if let Some(ragged) = channels.iter().find(|c| c.len() != time.len()) {
            return Err(ContractError::invalid_series(format!(
                "channel '{}' has {} samples, grid has {}",
                ragged.name,
                ragged.len(),
                time.len()
            )));
        }

        Ok(Self {
            time,
            interval,
            time_channel: time_channel.into(),
            speed_channel: speed_channel.into(),
            channels,
        })
    }

    /// Name of the source time channel
    pub fn time_channel(&self) -> &str {
        &self.time_channel
    }

    /// Name of the designated speed channel
    pub fn speed_channel(&self) -> &str {
        &self.speed_channel
    }

    /// Resampled non-time channels, in source order
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Look up a resampled channel by name
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Resampled speed samples, if the speed channel survived resampling
    pub fn speed(&self) -> Option<&[Option<f64>]> {
        self.channel(&self.speed_channel).map(|c| c.values.as_slice())
    }

    /// Number of grid points
    #[inline]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the grid is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Step between the first two grid points.
    ///
    /// Falls back to the configured interval for grids shorter than two.
    pub fn grid_step(&self) -> f64 {
        match self.time.as_slice() {
            [t0, t1, ..] => t1 - t0,
            _ => self.interval,
        }
    }

    /// First and last grid time
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((*self.time.first()?, *self.time.last()?))
    }
}
