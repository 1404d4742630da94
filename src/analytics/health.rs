//! Sensor Health Scoring
//!
//! A composite 0-100 score per channel from three components:
//!
//! - **availability** (weight 0.4): share of rows where the channel
//!   carried a value,
//! - **stability** (weight 0.3): 100 minus the whole-column coefficient
//!   of variation, floored at zero,
//! - **recent stability** (weight 0.3): the same measure over the last
//!   10% of rows (at least one row).
//!
//! Scores map to tiers at 90 / 70 / 50. A channel with no data scores
//! zero: unavailable and maximally unstable by convention.

use serde::Serialize;

use crate::constants::{
    HEALTH_AVAILABILITY_WEIGHT, HEALTH_EXCELLENT, HEALTH_FAIR, HEALTH_GOOD,
    HEALTH_RECENT_FRACTION, HEALTH_RECENT_WEIGHT, HEALTH_STABILITY_WEIGHT,
};
use crate::reading::{SensorKind, SensorMap, Snapshot};
use crate::stats;

/// Tiered reading of a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= HEALTH_EXCELLENT {
            HealthStatus::Excellent
        } else if score >= HEALTH_GOOD {
            HealthStatus::Good
        } else if score >= HEALTH_FAIR {
            HealthStatus::Fair
        } else {
            HealthStatus::Poor
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Fair => "fair",
            HealthStatus::Poor => "poor",
        }
    }
}

/// Health report for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorHealth {
    /// Composite score, 0-100.
    pub score: f64,
    pub status: HealthStatus,
    /// Share of rows carrying a value, in percent.
    pub availability: f64,
    /// Whole-column coefficient of variation, in percent.
    pub variability: f64,
    /// Coefficient of variation over the recent window, in percent.
    pub recent_variability: f64,
}

/// Score every channel's health.
pub fn health(snapshot: &Snapshot) -> SensorMap<SensorHealth> {
    SensorMap::from_fn(|kind| channel_health(snapshot, kind))
}

fn channel_health(snapshot: &Snapshot, kind: SensorKind) -> SensorHealth {
    let column = snapshot.column(kind);
    let total = column.len();
    let values = stats::non_missing(&column);

    if total == 0 || values.is_empty() {
        return SensorHealth {
            score: 0.0,
            status: HealthStatus::Poor,
            availability: 0.0,
            variability: 100.0,
            recent_variability: 100.0,
        };
    }

    let availability = values.len() as f64 / total as f64 * 100.0;
    let variability = stats::coefficient_of_variation(&values);

    let window = ((total as f64 * HEALTH_RECENT_FRACTION).ceil() as usize).max(1);
    let recent = stats::non_missing(&column[total - window..]);
    let recent_variability = stats::coefficient_of_variation(&recent);

    let score = (HEALTH_AVAILABILITY_WEIGHT * availability
        + HEALTH_STABILITY_WEIGHT * (100.0 - variability.min(100.0))
        + HEALTH_RECENT_WEIGHT * (100.0 - recent_variability.min(100.0)))
        .min(100.0);

    SensorHealth {
        score,
        status: HealthStatus::from_score(score),
        availability,
        variability,
        recent_variability,
    }
}
