//! Descriptive Statistics
//!
//! Per-channel summary moments and shape measures, plus the pairwise
//! correlation matrix. Everything is computed over the channel's
//! non-missing values; a channel with no values reports `None`, and the
//! shape measures inside a report go `None` individually when the column
//! is too short or too flat for them to be defined.

use serde::Serialize;

use crate::analytics::correlation::{correlations, CorrelationMatrix};
use crate::reading::{SensorKind, SensorMap, Snapshot};
use crate::stats;

/// Summary statistics for one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; needs two values.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    /// Bias-corrected skewness; needs three values and spread.
    pub skewness: Option<f64>,
    /// Bias-corrected excess kurtosis; needs four values and spread.
    pub kurtosis: Option<f64>,
    pub variance: Option<f64>,
    /// Coefficient of variation (%); zero mean saturates to 100.
    pub coefficient_of_variation: f64,
}

/// Descriptive statistics for a whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub sensors: SensorMap<Option<ColumnStats>>,
    pub correlation: CorrelationMatrix,
}

/// Compute per-channel statistics and the correlation matrix.
pub fn statistics(snapshot: &Snapshot) -> Statistics {
    Statistics {
        sensors: SensorMap::from_fn(|kind| column_stats(snapshot, kind)),
        correlation: correlations(snapshot).matrix,
    }
}

fn column_stats(snapshot: &Snapshot, kind: SensorKind) -> Option<ColumnStats> {
    let values = stats::non_missing(&snapshot.column(kind));
    if values.is_empty() {
        return None;
    }
    Some(ColumnStats {
        count: values.len(),
        mean: stats::mean(&values)?,
        std: stats::sample_std(&values),
        min: stats::min(&values)?,
        max: stats::max(&values)?,
        q25: stats::quantile(&values, 0.25)?,
        median: stats::median(&values)?,
        q75: stats::quantile(&values, 0.75)?,
        skewness: stats::skewness(&values),
        kurtosis: stats::kurtosis(&values),
        variance: stats::sample_variance(&values),
        coefficient_of_variation: stats::coefficient_of_variation(&values),
    })
}
