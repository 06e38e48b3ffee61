//! Speed unit normalization

use contracts::{RawSeries, SpeedUnit};
use tracing::debug;

/// Convert the designated speed channel of `series` to kph.
///
/// Missing samples stay missing; other channels are untouched.
pub fn normalize_speed(series: RawSeries, unit: SpeedUnit) -> RawSeries {
    match unit {
        SpeedUnit::Kph => series,
        SpeedUnit::Mph => {
            let factor = unit.to_kph_factor();
            let speed = series.speed_channel().to_string();
            debug!(channel = %speed, factor, "Converting speed channel to kph");
            series.map_channel(&speed, |v| v * factor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Channel, MPH_TO_KPH};

    fn series() -> RawSeries {
        RawSeries::new(
            "Time",
            "Speed",
            vec![
                Channel::new("Time", vec![Some(0.0), Some(1.0), Some(2.0)]),
                Channel::new("Speed", vec![Some(10.0), None, Some(0.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_kph_is_identity() {
        assert_eq!(normalize_speed(series(), SpeedUnit::Kph), series());
    }

    #[test]
    fn test_mph_scales_speed_only() {
        let out = normalize_speed(series(), SpeedUnit::Mph);
        assert_eq!(
            out.speed_values(),
            &[Some(10.0 * MPH_TO_KPH), None, Some(0.0)]
        );
        assert_eq!(out.time_values(), series().time_values());
    }
}
