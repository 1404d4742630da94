//! Analytics Engine
//!
//! Read-only analysis over snapshots: descriptive statistics, trend
//! regression, correlation, anomaly detection, health scoring, insight
//! generation, and a collection-performance rollup. Every operation
//! takes a `&Snapshot` and never mutates it; callers typically feed the
//! cleaning pipeline's output here, but nothing requires it.

pub mod anomaly;
pub mod correlation;
pub mod describe;
pub mod health;
pub mod insight;
pub mod trend;

pub use anomaly::{anomalies, anomalies_named, AnomalyMethod, SensorAnomalies};
pub use correlation::{
    correlations, CorrelationAnalysis, CorrelationDirection, CorrelationMatrix,
    CorrelationStrength, PairCorrelation,
};
pub use describe::{statistics, ColumnStats, Statistics};
pub use health::{health, HealthStatus, SensorHealth};
pub use insight::{insights, Insight, InsightKind, Severity};
pub use trend::{trends, Trend, TrendConfidence, TrendDirection};

use serde::Serialize;

use crate::reading::{SensorKind, Snapshot};
use crate::stats;

/// Rollup of how well collection and the sensors are doing overall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Seconds between the earliest and latest reading.
    pub collection_period_secs: f64,
    /// Readings per hour; periods under an hour count as one hour.
    pub average_rate_per_hour: f64,
    /// Share of sensor slots carrying a value, in percent.
    pub data_completeness_percent: f64,
    /// Z-score anomalies as a share of non-missing values, in percent.
    pub anomaly_rate_percent: f64,
    /// Mean of the four channel health scores.
    pub mean_health_score: f64,
}

/// Compute the performance rollup. `None` for an empty snapshot.
pub fn performance(snapshot: &Snapshot) -> Option<PerformanceMetrics> {
    let first = snapshot.first_timestamp()?;
    let last = snapshot.last_timestamp()?;
    let period_secs = (last - first).num_milliseconds() as f64 / 1000.0;
    let hours = (period_secs / 3600.0).max(1.0);

    let rows = snapshot.len();
    let present: usize = snapshot.iter().map(|r| r.present_count()).sum();
    let slots = rows * SensorKind::ALL.len();
    let completeness = present as f64 / slots as f64 * 100.0;

    let mut non_missing = 0usize;
    for kind in SensorKind::ALL {
        non_missing += stats::non_missing(&snapshot.column(kind)).len();
    }
    let anomalous: usize = anomalies(snapshot, AnomalyMethod::ZScore)
        .iter()
        .filter_map(|(_, a)| a.as_ref().map(|a| a.count))
        .sum();
    let anomaly_rate = if non_missing == 0 {
        0.0
    } else {
        anomalous as f64 / non_missing as f64 * 100.0
    };

    let reports = health(snapshot);
    let mean_health =
        reports.iter().map(|(_, h)| h.score).sum::<f64>() / SensorKind::ALL.len() as f64;

    Some(PerformanceMetrics {
        collection_period_secs: period_secs,
        average_rate_per_hour: rows as f64 / hours,
        data_completeness_percent: completeness,
        anomaly_rate_percent: anomaly_rate,
        mean_health_score: mean_health,
    })
}
