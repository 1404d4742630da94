//! Anomaly Detection
//!
//! Per-channel anomaly counts by one of two methods: z-score against the
//! population standard deviation, or IQR fences. A channel needs at
//! least three values; a flat channel (zero spread) reports zero
//! anomalies rather than none at all, since the method did run and found
//! nothing.

use std::str::FromStr;

use serde::Serialize;

use crate::constants::{IQR_MULTIPLIER, MIN_ANALYSIS_SAMPLES, ZSCORE_THRESHOLD};
use crate::reading::{SensorKind, SensorMap, Snapshot};
use crate::stats;

/// Which detection method to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyMethod {
    /// |z| > 3 against the population standard deviation.
    ZScore,
    /// Outside the 1.5x IQR fences.
    Iqr,
}

impl AnomalyMethod {
    pub const fn name(&self) -> &'static str {
        match self {
            AnomalyMethod::ZScore => "zscore",
            AnomalyMethod::Iqr => "iqr",
        }
    }
}

impl FromStr for AnomalyMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zscore" => Ok(AnomalyMethod::ZScore),
            "iqr" => Ok(AnomalyMethod::Iqr),
            _ => Err(()),
        }
    }
}

/// Anomalies found in one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorAnomalies {
    pub count: usize,
    /// Share of the channel's non-missing values, in percent.
    pub percentage: f64,
    /// Row positions of the flagged readings within the snapshot.
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

/// Detect anomalies in every channel with the given method.
///
/// Channels with fewer than three values report `None`.
pub fn anomalies(snapshot: &Snapshot, method: AnomalyMethod) -> SensorMap<Option<SensorAnomalies>> {
    SensorMap::from_fn(|kind| column_anomalies(snapshot, kind, method))
}

/// Detect anomalies with a method chosen by name.
///
/// An unrecognized name yields an all-`None` report.
pub fn anomalies_named(snapshot: &Snapshot, method: &str) -> SensorMap<Option<SensorAnomalies>> {
    match method.parse::<AnomalyMethod>() {
        Ok(method) => anomalies(snapshot, method),
        Err(()) => {
            log::warn!("unknown anomaly method {method:?}");
            SensorMap::from_fn(|_| None)
        }
    }
}

fn column_anomalies(
    snapshot: &Snapshot,
    kind: SensorKind,
    method: AnomalyMethod,
) -> Option<SensorAnomalies> {
    let column = snapshot.column(kind);
    let values = stats::non_missing(&column);
    if values.len() < MIN_ANALYSIS_SAMPLES {
        return None;
    }

    let flag: Box<dyn Fn(f64) -> bool> = match method {
        AnomalyMethod::ZScore => {
            let mean = stats::mean(&values)?;
            let std = stats::population_std(&values)?;
            if std == 0.0 {
                // Flat channel: the test ran, nothing can exceed the threshold.
                return Some(SensorAnomalies {
                    count: 0,
                    percentage: 0.0,
                    indices: Vec::new(),
                    values: Vec::new(),
                });
            }
            Box::new(move |v| ((v - mean) / std).abs() > ZSCORE_THRESHOLD)
        }
        AnomalyMethod::Iqr => {
            let q1 = stats::quantile(&values, 0.25)?;
            let q3 = stats::quantile(&values, 0.75)?;
            let iqr = q3 - q1;
            let lower = q1 - IQR_MULTIPLIER * iqr;
            let upper = q3 + IQR_MULTIPLIER * iqr;
            Box::new(move |v| v < lower || v > upper)
        }
    };

    let mut indices = Vec::new();
    let mut flagged = Vec::new();
    for (i, slot) in column.iter().enumerate() {
        if let Some(v) = *slot {
            if flag(v) {
                indices.push(i);
                flagged.push(v);
            }
        }
    }

    Some(SensorAnomalies {
        count: indices.len(),
        percentage: indices.len() as f64 / values.len() as f64 * 100.0,
        indices,
        values: flagged,
    })
}
