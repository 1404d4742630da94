//! Quality Reporting
//!
//! Reporting-only views of a snapshot's condition. Nothing here repairs
//! anything (that is the pipeline's job); these functions answer "how
//! bad is it?" for dashboards and alerting:
//!
//! - [`detect_outliers`]: rows flagged by the z-score test *or* the IQR
//!   test. Deliberately wider than the cleaning pipeline's removal stage
//!   (which uses IQR alone), so the report surfaces everything either
//!   method considers suspicious.
//! - [`data_quality`]: record counts, missing/invalid/duplicate tallies,
//!   completeness, and temporal consistency.
//! - [`detect_gaps`]: stretches where collection stalled.
//! - [`quality_score`]: a single 0-100 composite for at-a-glance grading.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::*;
use crate::reading::{Reading, SensorKind, Snapshot};
use crate::stats;

/// Data-quality metrics for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub total_records: usize,
    /// Missing sensor values across all channels.
    pub missing_values: usize,
    pub missing_percentage: f64,
    /// Readings identical to an earlier reading in every field.
    pub duplicate_records: usize,
    /// Values outside their channel's valid range (before any scrub).
    pub invalid_values: usize,
    /// Rows flagged by [`detect_outliers`].
    pub outliers_detected: usize,
    /// Percentage of sensor cells carrying a value.
    pub data_completeness: f64,
    /// Timestamps non-decreasing with every gap in the plausible band.
    pub temporal_consistency: bool,
}

/// A stretch where collection stalled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataGap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub seconds: f64,
}

/// Rows flagged by the z-score test or the IQR test, in snapshot order.
///
/// Both tests run per channel over non-missing values; a row matching
/// either test for any channel is returned whole.
pub fn detect_outliers(snapshot: &Snapshot) -> Snapshot {
    let mut flagged: BTreeSet<usize> = BTreeSet::new();

    for kind in SensorKind::ALL {
        let column = snapshot.column(kind);
        let present: Vec<(usize, f64)> = column
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .collect();
        if present.is_empty() {
            continue;
        }
        let values: Vec<f64> = present.iter().map(|(_, v)| *v).collect();

        if let (Some(m), Some(s)) = (stats::mean(&values), stats::population_std(&values)) {
            if s > 0.0 {
                for &(row, v) in &present {
                    if ((v - m) / s).abs() > ZSCORE_THRESHOLD {
                        flagged.insert(row);
                    }
                }
            }
        }

        if let Some((lower, upper)) = iqr_bounds(&values) {
            for &(row, v) in &present {
                if v < lower || v > upper {
                    flagged.insert(row);
                }
            }
        }
    }

    flagged
        .into_iter()
        .filter_map(|i| snapshot.get(i).cloned())
        .collect()
}

/// IQR outlier fences `[Q1 - k*IQR, Q3 + k*IQR]`.
pub(crate) fn iqr_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let q1 = stats::quantile(values, 0.25)?;
    let q3 = stats::quantile(values, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - IQR_MULTIPLIER * iqr, q3 + IQR_MULTIPLIER * iqr))
}

/// Quality metrics for one snapshot.
pub fn data_quality(snapshot: &Snapshot) -> QualityReport {
    let total = snapshot.len();
    if total == 0 {
        return QualityReport {
            total_records: 0,
            missing_values: 0,
            missing_percentage: 0.0,
            duplicate_records: 0,
            invalid_values: 0,
            outliers_detected: 0,
            data_completeness: 100.0,
            temporal_consistency: true,
        };
    }

    let cells = total * SensorKind::ALL.len();
    let mut missing = 0;
    let mut invalid = 0;
    for kind in SensorKind::ALL {
        for value in snapshot.column(kind) {
            match value {
                None => missing += 1,
                Some(v) if !kind.in_range(v) => invalid += 1,
                Some(_) => {}
            }
        }
    }

    QualityReport {
        total_records: total,
        missing_values: missing,
        missing_percentage: missing as f64 / cells as f64 * 100.0,
        duplicate_records: duplicate_count(snapshot.readings()),
        invalid_values: invalid,
        outliers_detected: detect_outliers(snapshot).len(),
        data_completeness: (cells - missing) as f64 / cells as f64 * 100.0,
        temporal_consistency: temporal_consistency(snapshot),
    }
}

/// Readings identical to an earlier reading in every field.
fn duplicate_count(readings: &[Reading]) -> usize {
    // f64 is not hashable; key on the bit patterns instead.
    let mut seen: HashMap<(i64, [Option<u64>; 4], &str), usize> = HashMap::new();
    for reading in readings {
        let mut bits = [None; 4];
        for (slot, kind) in bits.iter_mut().zip(SensorKind::ALL) {
            *slot = reading.value(kind).map(f64::to_bits);
        }
        let key = (
            reading.timestamp.timestamp_micros(),
            bits,
            reading.sensor_id.as_str(),
        );
        *seen.entry(key).or_insert(0) += 1;
    }
    readings.len() - seen.len()
}

/// Timestamps non-decreasing and every consecutive gap within the
/// plausible collection band. Fewer than two readings is trivially
/// consistent.
fn temporal_consistency(snapshot: &Snapshot) -> bool {
    if snapshot.len() < 2 {
        return true;
    }
    if !snapshot.is_time_ordered() {
        return false;
    }
    snapshot.readings().windows(2).all(|w| {
        let gap = (w[1].timestamp - w[0].timestamp).num_milliseconds() as f64 / 1000.0;
        (MIN_READING_GAP_S..=MAX_READING_GAP_S).contains(&gap)
    })
}

/// Gaps longer than [`GAP_FACTOR`] times the expected interval.
pub fn detect_gaps(snapshot: &Snapshot, expected_interval_secs: f64) -> Vec<DataGap> {
    let mut timestamps: Vec<DateTime<Utc>> =
        snapshot.iter().map(|r| r.timestamp).collect();
    timestamps.sort();

    timestamps
        .windows(2)
        .filter_map(|w| {
            let seconds = (w[1] - w[0]).num_milliseconds() as f64 / 1000.0;
            (seconds > expected_interval_secs * GAP_FACTOR).then(|| DataGap {
                start: w[0],
                end: w[1],
                seconds,
            })
        })
        .collect()
}

/// Composite 0–100 quality score: the average of completeness, per-channel
/// range consistency, and temporal ordering (100 ordered / 50 not).
pub fn quality_score(snapshot: &Snapshot) -> f64 {
    if snapshot.is_empty() {
        return 0.0;
    }

    let mut scores: Vec<f64> = Vec::new();

    let cells = snapshot.len() * SensorKind::ALL.len();
    let present: usize = SensorKind::ALL
        .iter()
        .map(|&k| stats::non_missing(&snapshot.column(k)).len())
        .sum();
    scores.push(present as f64 / cells as f64 * 100.0);

    let mut consistency: Vec<f64> = Vec::new();
    for kind in SensorKind::ALL {
        let values = stats::non_missing(&snapshot.column(kind));
        if !values.is_empty() {
            let in_range = values.iter().filter(|&&v| kind.in_range(v)).count();
            consistency.push(in_range as f64 / values.len() as f64 * 100.0);
        }
    }
    if let Some(avg) = stats::mean(&consistency) {
        scores.push(avg);
    }

    if snapshot.len() > 1 {
        scores.push(if snapshot.is_time_ordered() { 100.0 } else { 50.0 });
    }

    stats::mean(&scores).unwrap_or(0.0)
}
