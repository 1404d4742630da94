//! Display Formatting Helpers
//!
//! Small presentation helpers for hosts that render readings in a UI or
//! log line. Missing values render as `"N/A"` rather than forcing every
//! caller to restate that convention.

use chrono::{DateTime, Duration, Utc};

use crate::reading::SensorKind;

/// Render a channel value at its display precision with its unit.
///
/// `Some(21.456)` for temperature renders as `"21.46 °C"`; `None` as
/// `"N/A"`.
pub fn format_sensor_value(kind: SensorKind, value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.prec$} {}", kind.unit(), prec = kind.display_precision()),
        None => "N/A".to_string(),
    }
}

/// Render a duration at human scale: seconds, minutes, hours, or days.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{:.1}min", secs as f64 / 60.0)
    } else if secs < 86_400 {
        format!("{:.1}h", secs as f64 / 3600.0)
    } else {
        format!("{:.1}days", secs as f64 / 86_400.0)
    }
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS`, or `"N/A"` when absent.
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_values_carry_unit_and_precision() {
        assert_eq!(
            format_sensor_value(SensorKind::Temperature, Some(21.456)),
            "21.46 °C"
        );
        assert_eq!(
            format_sensor_value(SensorKind::Moisture, Some(45.67)),
            "45.7 %"
        );
        assert_eq!(
            format_sensor_value(SensorKind::Pressure, Some(101_325.4)),
            "101325 Pa"
        );
        assert_eq!(format_sensor_value(SensorKind::Weight, None), "N/A");
    }

    #[test]
    fn durations_pick_a_human_scale() {
        assert_eq!(format_duration(Duration::seconds(45)), "45s");
        assert_eq!(format_duration(Duration::seconds(90)), "1.5min");
        assert_eq!(format_duration(Duration::seconds(5400)), "1.5h");
        assert_eq!(format_duration(Duration::days(2)), "2.0days");
    }

    #[test]
    fn timestamps_render_or_degrade() {
        let ts = DateTime::from_timestamp(0, 0);
        assert_eq!(format_timestamp(ts), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(None), "N/A");
    }
}
