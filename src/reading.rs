//! Reading, Snapshot, and Per-Sensor Containers
//!
//! ## Overview
//!
//! This module defines the data model everything else operates on:
//!
//! - [`SensorKind`]: the closed set of sensor channels a reading carries,
//!   with each channel's unit, valid range, and display precision.
//! - [`Reading`]: one timestamped multi-sensor observation. Any channel
//!   may be missing; the set of channels is fixed.
//! - [`Snapshot`]: an ordered, independently owned sequence of readings.
//!   Snapshots are structural copies: once handed to a consumer they can
//!   never be mutated by the store or by another consumer.
//! - [`SensorMap`]: a fixed-shape record holding one `T` per sensor
//!   channel. Analytics results use it instead of string-keyed maps, so a
//!   typo in a sensor name is a compile error rather than a silent miss.
//!
//! ## Wire form
//!
//! Raw readings arrive as JSON objects (the simulator and any real
//! collector speak JSON). [`Reading::from_value`] normalizes the wire form
//! into the typed shape: timestamps are parsed from RFC 3339 strings,
//! `"%Y-%m-%d %H:%M:%S"` strings, or numeric Unix seconds; sensor fields
//! that are absent, null, non-numeric, or non-finite become missing.
//! Range checking is the validator's job, not normalization's.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::*;
use crate::errors::NormalizeError;

/// Sensor id recorded when the wire form carries none.
pub const UNKNOWN_SENSOR_ID: &str = "unknown";

/// The closed set of sensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Temperature,
    Weight,
    Moisture,
    Pressure,
}

impl SensorKind {
    /// All channels, in canonical order. Iteration and reporting order
    /// everywhere in the crate follows this array.
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Temperature,
        SensorKind::Weight,
        SensorKind::Moisture,
        SensorKind::Pressure,
    ];

    /// Position in [`SensorKind::ALL`]; indexes matrix-shaped results.
    pub const fn index(&self) -> usize {
        match self {
            SensorKind::Temperature => 0,
            SensorKind::Weight => 1,
            SensorKind::Moisture => 2,
            SensorKind::Pressure => 3,
        }
    }

    /// Field name on the wire and in exports.
    pub const fn name(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Weight => "weight",
            SensorKind::Moisture => "moisture",
            SensorKind::Pressure => "pressure",
        }
    }

    /// Unit of measurement.
    pub const fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Weight => "kg",
            SensorKind::Moisture => "%",
            SensorKind::Pressure => "Pa",
        }
    }

    /// Valid `(min, max)` range from the range table.
    ///
    /// Any stored or cleaned value lies in this range or is missing.
    pub const fn valid_range(&self) -> (f64, f64) {
        match self {
            SensorKind::Temperature => (TEMPERATURE_MIN_C, TEMPERATURE_MAX_C),
            SensorKind::Weight => (WEIGHT_MIN_KG, WEIGHT_MAX_KG),
            SensorKind::Moisture => (MOISTURE_MIN_PCT, MOISTURE_MAX_PCT),
            SensorKind::Pressure => (PRESSURE_MIN_PA, PRESSURE_MAX_PA),
        }
    }

    /// Midpoint of the valid range, the fill of last resort for a column
    /// with no observed values at all.
    pub fn range_midpoint(&self) -> f64 {
        let (min, max) = self.valid_range();
        (min + max) / 2.0
    }

    /// Whether `value` lies inside the valid range (inclusive).
    pub fn in_range(&self, value: f64) -> bool {
        let (min, max) = self.valid_range();
        (min..=max).contains(&value)
    }

    /// Decimal places used when displaying or exporting this channel.
    pub const fn display_precision(&self) -> usize {
        match self {
            SensorKind::Temperature => 2,
            SensorKind::Weight => 2,
            SensorKind::Moisture => 1,
            SensorKind::Pressure => 0,
        }
    }
}

/// One `T` per sensor channel.
///
/// The fixed shape replaces the string-keyed result dictionaries the
/// presentation layer used to index: lookups go through [`SensorKind`],
/// and serialization still produces the familiar per-sensor object.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SensorMap<T> {
    pub temperature: T,
    pub weight: T,
    pub moisture: T,
    pub pressure: T,
}

impl<T> SensorMap<T> {
    /// Build a map by evaluating `f` once per channel, in canonical order.
    pub fn from_fn(mut f: impl FnMut(SensorKind) -> T) -> Self {
        Self {
            temperature: f(SensorKind::Temperature),
            weight: f(SensorKind::Weight),
            moisture: f(SensorKind::Moisture),
            pressure: f(SensorKind::Pressure),
        }
    }

    pub fn get(&self, kind: SensorKind) -> &T {
        match kind {
            SensorKind::Temperature => &self.temperature,
            SensorKind::Weight => &self.weight,
            SensorKind::Moisture => &self.moisture,
            SensorKind::Pressure => &self.pressure,
        }
    }

    pub fn get_mut(&mut self, kind: SensorKind) -> &mut T {
        match kind {
            SensorKind::Temperature => &mut self.temperature,
            SensorKind::Weight => &mut self.weight,
            SensorKind::Moisture => &mut self.moisture,
            SensorKind::Pressure => &mut self.pressure,
        }
    }

    /// Iterate `(channel, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (SensorKind, &T)> {
        SensorKind::ALL.iter().map(move |&k| (k, self.get(k)))
    }
}

/// One timestamped multi-sensor observation.
///
/// Every channel is optional; the timestamp and sensor id are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
    pub moisture: Option<f64>,
    pub pressure: Option<f64>,
    pub sensor_id: String,
}

impl Reading {
    /// Reading with the given timestamp and all channels missing.
    pub fn empty_at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            temperature: None,
            weight: None,
            moisture: None,
            pressure: None,
            sensor_id: UNKNOWN_SENSOR_ID.to_string(),
        }
    }

    /// Value of one channel.
    pub fn value(&self, kind: SensorKind) -> Option<f64> {
        match kind {
            SensorKind::Temperature => self.temperature,
            SensorKind::Weight => self.weight,
            SensorKind::Moisture => self.moisture,
            SensorKind::Pressure => self.pressure,
        }
    }

    /// Overwrite one channel.
    pub fn set_value(&mut self, kind: SensorKind, value: Option<f64>) {
        match kind {
            SensorKind::Temperature => self.temperature = value,
            SensorKind::Weight => self.weight = value,
            SensorKind::Moisture => self.moisture = value,
            SensorKind::Pressure => self.pressure = value,
        }
    }

    /// Count of channels carrying a value.
    pub fn present_count(&self) -> usize {
        SensorKind::ALL
            .iter()
            .filter(|&&k| self.value(k).is_some())
            .count()
    }

    /// Normalize a raw wire record into a typed reading.
    ///
    /// Sensor fields that are absent, null, non-numeric, or non-finite
    /// become missing; the validator has already told the caller about
    /// them, normalization just refuses to store garbage. Only a missing
    /// or unparsable timestamp is fatal.
    pub fn from_value(raw: &Value) -> Result<Self, NormalizeError> {
        let obj = raw.as_object().ok_or(NormalizeError::NotAnObject)?;

        let ts_field = obj
            .get("timestamp")
            .ok_or(NormalizeError::MissingTimestamp)?;
        let timestamp = parse_timestamp(ts_field)
            .ok_or_else(|| NormalizeError::BadTimestamp(ts_field.to_string()))?;

        let mut reading = Reading::empty_at(timestamp);
        for kind in SensorKind::ALL {
            let value = obj
                .get(kind.name())
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite());
            reading.set_value(kind, value);
        }
        if let Some(id) = obj.get("sensor_id").and_then(Value::as_str) {
            reading.sensor_id = id.to_string();
        }
        Ok(reading)
    }
}

/// Parse a wire timestamp: RFC 3339, `"%Y-%m-%d %H:%M:%S"`, or numeric
/// Unix seconds. Returns `None` for anything else.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => {
            let secs = n.as_f64()?;
            if !secs.is_finite() {
                return None;
            }
            let whole = secs.trunc() as i64;
            let nanos = (secs.fract().abs() * 1e9) as u32;
            DateTime::from_timestamp(whole, nanos)
        }
        _ => None,
    }
}

/// An ordered, independently owned sequence of readings.
///
/// Snapshots come out of the store (or the cleaning pipeline) as
/// structural copies, so iterating one never races with a concurrent
/// append. Column access works per [`SensorKind`], which is how the
/// cleaning stages and analytics consume them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    readings: Vec<Reading>,
}

impl Snapshot {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Reading> {
        self.readings.get(index)
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }

    /// Extract one channel as a column, row order preserved.
    pub fn column(&self, kind: SensorKind) -> Vec<Option<f64>> {
        self.readings.iter().map(|r| r.value(kind)).collect()
    }

    /// Write a column back, row order preserved.
    ///
    /// The column length must match the snapshot length.
    pub fn set_column(&mut self, kind: SensorKind, values: &[Option<f64>]) {
        debug_assert_eq!(values.len(), self.readings.len());
        for (reading, value) in self.readings.iter_mut().zip(values) {
            reading.set_value(kind, *value);
        }
    }

    /// Restore ascending timestamp order (stable, so equal timestamps
    /// keep their arrival order).
    pub fn sort_by_timestamp(&mut self) {
        self.readings.sort_by_key(|r| r.timestamp);
    }

    /// Whether timestamps are non-decreasing.
    pub fn is_time_ordered(&self) -> bool {
        self.readings
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }

    /// Earliest timestamp, if any readings exist.
    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.readings.first().map(|r| r.timestamp)
    }

    /// Latest timestamp, if any readings exist.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.readings.last().map(|r| r.timestamp)
    }
}

impl FromIterator<Reading> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Snapshot {
    type Item = Reading;
    type IntoIter = std::vec::IntoIter<Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
