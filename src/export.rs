//! Snapshot Export
//!
//! Serializes a snapshot to CSV or JSON text. CSV rows render each
//! channel at its display precision with missing values as empty fields;
//! JSON is the serde representation of the readings, missing values as
//! nulls. An empty snapshot exports as an empty string in either format.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::errors::ExportError;
use crate::reading::{SensorKind, Snapshot};

/// The formats the core can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Export a snapshot in the given format.
pub fn export(snapshot: &Snapshot, format: ExportFormat) -> String {
    if snapshot.is_empty() {
        return String::new();
    }
    match format {
        ExportFormat::Csv => to_csv(snapshot),
        ExportFormat::Json => to_json(snapshot),
    }
}

/// Export with a format chosen by name.
pub fn export_named(snapshot: &Snapshot, format: &str) -> Result<String, ExportError> {
    Ok(export(snapshot, format.parse()?))
}

fn to_csv(snapshot: &Snapshot) -> String {
    let mut out = String::from("timestamp,temperature,weight,moisture,pressure,sensor_id\n");
    for reading in snapshot {
        let mut row = reading.timestamp.to_rfc3339();
        for kind in SensorKind::ALL {
            row.push(',');
            if let Some(v) = reading.value(kind) {
                let _ = write!(row, "{v:.prec$}", prec = kind.display_precision());
            }
        }
        row.push(',');
        row.push_str(&csv_field(&reading.sensor_id));
        row.push('\n');
        out.push_str(&row);
    }
    out
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn to_json(snapshot: &Snapshot) -> String {
    // Readings hold only plainly serializable fields, so this cannot fail.
    serde_json::to_string_pretty(snapshot).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;
    use chrono::DateTime;

    fn sample() -> Snapshot {
        let mut a = Reading::empty_at(DateTime::from_timestamp(0, 0).unwrap());
        a.temperature = Some(21.456);
        a.weight = Some(50.0);
        a.moisture = Some(45.67);
        a.pressure = Some(101_325.4);
        a.sensor_id = "hive-01".to_string();

        let mut b = Reading::empty_at(DateTime::from_timestamp(60, 0).unwrap());
        b.temperature = Some(22.0);
        b.sensor_id = "hive-01".to_string();

        Snapshot::new(vec![a, b])
    }

    #[test]
    fn csv_rounds_to_display_precision() {
        let csv = export(&sample(), ExportFormat::Csv);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("timestamp,temperature,weight,moisture,pressure,sensor_id")
        );
        let first = lines.next().unwrap();
        assert!(first.ends_with(",21.46,50.00,45.7,101325,hive-01"));
    }

    #[test]
    fn csv_leaves_missing_fields_empty() {
        let csv = export(&sample(), ExportFormat::Csv);
        let second = csv.lines().nth(2).unwrap();
        assert!(second.ends_with(",22.00,,,,hive-01"));
    }

    #[test]
    fn csv_quotes_awkward_sensor_ids() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn json_round_trips_missing_as_null() {
        let json = export(&sample(), ExportFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["temperature"], 22.0);
        assert!(rows[1]["weight"].is_null());
        assert_eq!(rows[0]["sensor_id"], "hive-01");
    }

    #[test]
    fn empty_snapshot_exports_as_empty_string() {
        assert_eq!(export(&Snapshot::empty(), ExportFormat::Csv), "");
        assert_eq!(export(&Snapshot::empty(), ExportFormat::Json), "");
    }

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!("CSV".parse(), Ok(ExportFormat::Csv));
        assert_eq!("json".parse(), Ok(ExportFormat::Json));
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(name)) if name == "xml"
        ));
    }

    #[test]
    fn named_export_rejects_unknown_formats() {
        assert!(export_named(&sample(), "parquet").is_err());
        assert!(export_named(&sample(), "Json").is_ok());
    }
}
