//! Trend Analysis
//!
//! Ordinary least-squares regression of each channel against elapsed
//! time (seconds since the snapshot's earliest timestamp). A channel
//! needs at least three non-missing points; below that, or when every
//! point shares one timestamp, the channel reports no trend.
//!
//! Classification follows the slope's own uncertainty: a slope smaller
//! in magnitude than its standard error reads as "stable", otherwise the
//! sign decides. Confidence tiers come from R². The slope's two-sided
//! p-value uses a Student's t distribution with `n - 2` degrees of
//! freedom.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::constants::{MIN_ANALYSIS_SAMPLES, TREND_R2_HIGH, TREND_R2_MEDIUM};
use crate::reading::{SensorMap, Snapshot};

/// Direction a channel is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Stable,
    Increasing,
    Decreasing,
}

impl TrendDirection {
    pub const fn label(&self) -> &'static str {
        match self {
            TrendDirection::Stable => "stable",
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
        }
    }
}

/// How much the regression fit is worth trusting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendConfidence {
    High,
    Medium,
    Low,
}

/// Regression result for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    /// Units per second.
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub std_error: f64,
    pub direction: TrendDirection,
    pub confidence: TrendConfidence,
}

/// Regress every channel against elapsed time.
pub fn trends(snapshot: &Snapshot) -> SensorMap<Option<Trend>> {
    let Some(origin) = snapshot.iter().map(|r| r.timestamp).min() else {
        return SensorMap::from_fn(|_| None);
    };

    SensorMap::from_fn(|kind| {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for reading in snapshot {
            if let Some(v) = reading.value(kind) {
                xs.push((reading.timestamp - origin).num_milliseconds() as f64 / 1000.0);
                ys.push(v);
            }
        }
        fit_trend(&xs, &ys)
    })
}

fn fit_trend(xs: &[f64], ys: &[f64]) -> Option<Trend> {
    let n = xs.len();
    if n < MIN_ANALYSIS_SAMPLES {
        return None;
    }
    let nf = n as f64;
    let mx = xs.iter().sum::<f64>() / nf;
    let my = ys.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        // All points share one timestamp; elapsed time explains nothing.
        return None;
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let r = if syy == 0.0 { 0.0 } else { sxy / (sxx * syy).sqrt() };
    let r_squared = r * r;

    let df = nf - 2.0;
    let std_error = ((1.0 - r_squared) * syy / sxx / df).max(0.0).sqrt();
    let p_value = slope_p_value(slope, std_error, df);

    let direction = if slope.abs() < std_error {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };
    let confidence = if r_squared > TREND_R2_HIGH {
        TrendConfidence::High
    } else if r_squared > TREND_R2_MEDIUM {
        TrendConfidence::Medium
    } else {
        TrendConfidence::Low
    };

    Some(Trend {
        slope,
        intercept,
        r_squared,
        p_value,
        std_error,
        direction,
        confidence,
    })
}

/// Two-sided p-value for the slope under the null of no trend.
fn slope_p_value(slope: f64, std_error: f64, df: f64) -> f64 {
    if std_error == 0.0 {
        // A perfect fit: the null is either certain or impossible.
        return if slope == 0.0 { 1.0 } else { 0.0 };
    }
    let t = (slope / std_error).abs();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(t)),
        Err(_) => 1.0,
    }
}
