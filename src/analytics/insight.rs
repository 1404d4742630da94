//! Insight Generation
//!
//! Turns the analytic reports into a small list of human-readable
//! findings, in a fixed rule order:
//!
//! 1. high-confidence trends,
//! 2. significant strong or moderate correlations,
//! 3. health warnings (poor or fair) and excellent confirmations,
//! 4. high-variability warnings,
//! 5. a data-volume note, always present.
//!
//! An empty snapshot produces no insights at all.

use serde::Serialize;

use crate::analytics::correlation::{correlations, CorrelationStrength};
use crate::analytics::health::{health, HealthStatus};
use crate::analytics::trend::{trends, TrendConfidence, TrendDirection};
use crate::constants::{HIGH_VARIABILITY_CV, ROBUST_VOLUME_RECORDS};
use crate::reading::{SensorKind, Snapshot};
use crate::stats;

/// What kind of finding an insight reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Trend,
    Correlation,
    Health,
    Variability,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// One finding, with the sensors it concerns and its headline metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub sensors: Vec<SensorKind>,
    pub metric: Option<f64>,
    pub summary: String,
}

/// Generate insights from a snapshot.
pub fn insights(snapshot: &Snapshot) -> Vec<Insight> {
    if snapshot.is_empty() {
        return Vec::new();
    }
    let mut found = Vec::new();

    for (kind, trend) in trends(snapshot).iter() {
        let Some(trend) = trend else { continue };
        if trend.confidence != TrendConfidence::High
            || trend.direction == TrendDirection::Stable
        {
            continue;
        }
        found.push(Insight {
            kind: InsightKind::Trend,
            severity: Severity::Info,
            sensors: vec![kind],
            metric: Some(trend.slope),
            summary: format!(
                "{} is {} at {:.4} {}/s (R² = {:.2})",
                kind.name(),
                trend.direction.label(),
                trend.slope,
                kind.unit(),
                trend.r_squared,
            ),
        });
    }

    for pair in correlations(snapshot).pairs {
        if !pair.significant
            || matches!(
                pair.strength,
                CorrelationStrength::Weak | CorrelationStrength::VeryWeak
            )
        {
            continue;
        }
        found.push(Insight {
            kind: InsightKind::Correlation,
            severity: Severity::Info,
            sensors: vec![pair.a, pair.b],
            metric: Some(pair.coefficient),
            summary: format!(
                "{} correlation between {} and {} (r = {:.2})",
                pair.strength.label(),
                pair.a.name(),
                pair.b.name(),
                pair.coefficient,
            ),
        });
    }

    for (kind, report) in health(snapshot).iter() {
        match report.status {
            HealthStatus::Poor | HealthStatus::Fair => found.push(Insight {
                kind: InsightKind::Health,
                severity: Severity::Warning,
                sensors: vec![kind],
                metric: Some(report.score),
                summary: format!(
                    "{} health is {} (score {:.0}/100)",
                    kind.name(),
                    report.status.label(),
                    report.score,
                ),
            }),
            HealthStatus::Excellent => found.push(Insight {
                kind: InsightKind::Health,
                severity: Severity::Info,
                sensors: vec![kind],
                metric: Some(report.score),
                summary: format!("{} is operating excellently", kind.name()),
            }),
            HealthStatus::Good => {}
        }
    }

    for kind in SensorKind::ALL {
        let values = stats::non_missing(&snapshot.column(kind));
        if values.len() < 2 {
            continue;
        }
        let cv = stats::coefficient_of_variation(&values);
        if cv > HIGH_VARIABILITY_CV {
            found.push(Insight {
                kind: InsightKind::Variability,
                severity: Severity::Warning,
                sensors: vec![kind],
                metric: Some(cv),
                summary: format!(
                    "{} shows high variability (CV = {:.0}%)",
                    kind.name(),
                    cv,
                ),
            });
        }
    }

    let records = snapshot.len();
    found.push(Insight {
        kind: InsightKind::Volume,
        severity: Severity::Info,
        sensors: Vec::new(),
        metric: Some(records as f64),
        summary: if records > ROBUST_VOLUME_RECORDS {
            format!("{records} records collected, enough for robust analysis")
        } else {
            format!("{records} records collected; trends may shift as data accumulates")
        },
    });

    if found.is_empty() {
        // Unreachable while the volume note is unconditional; kept so a
        // caller never has to guess what an empty list means.
        found.push(Insight {
            kind: InsightKind::Volume,
            severity: Severity::Info,
            sensors: Vec::new(),
            metric: None,
            summary: "no significant patterns detected".to_string(),
        });
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;
    use chrono::DateTime;

    fn full_reading(ts: i64) -> Reading {
        let mut r = Reading::empty_at(DateTime::from_timestamp(ts, 0).unwrap());
        r.temperature = Some(20.0);
        r.weight = Some(50.0);
        r.moisture = Some(45.0);
        r.pressure = Some(101_325.0);
        r
    }

    #[test]
    fn empty_snapshot_yields_no_insights() {
        assert!(insights(&Snapshot::empty()).is_empty());
    }

    #[test]
    fn volume_note_is_always_present() {
        let snap: Snapshot = (0..10).map(full_reading).collect();
        let found = insights(&snap);
        let volume = found.iter().find(|i| i.kind == InsightKind::Volume).unwrap();
        assert_eq!(volume.severity, Severity::Info);
        assert!(volume.summary.contains("10 records"));
    }

    #[test]
    fn large_volume_is_called_robust() {
        let snap: Snapshot = (0..150).map(full_reading).collect();
        let volume = insights(&snap)
            .into_iter()
            .find(|i| i.kind == InsightKind::Volume)
            .unwrap();
        assert!(volume.summary.contains("robust"));
    }

    #[test]
    fn strong_trend_is_reported() {
        let snap: Snapshot = (0..30)
            .map(|i| {
                let mut r = full_reading(i);
                r.temperature = Some(20.0 + 0.5 * i as f64);
                r
            })
            .collect();
        let found = insights(&snap);
        let trend = found
            .iter()
            .find(|i| i.kind == InsightKind::Trend && i.sensors == [SensorKind::Temperature])
            .unwrap();
        assert!(trend.summary.contains("increasing"));
    }

    #[test]
    fn strong_correlation_is_reported() {
        let snap: Snapshot = (0..30)
            .map(|i| {
                let mut r = full_reading(i);
                r.temperature = Some(20.0 + i as f64);
                r.moisture = Some(80.0 - 2.0 * i as f64);
                r
            })
            .collect();
        let found = insights(&snap);
        let corr = found
            .iter()
            .find(|i| i.kind == InsightKind::Correlation)
            .unwrap();
        assert!(corr.sensors.contains(&SensorKind::Temperature));
        assert!(corr.sensors.contains(&SensorKind::Moisture));
        assert!(corr.summary.contains("strong"));
    }

    #[test]
    fn dead_channel_raises_a_health_warning() {
        let snap: Snapshot = (0..20)
            .map(|i| {
                let mut r = full_reading(i);
                r.weight = None;
                r
            })
            .collect();
        let found = insights(&snap);
        let warning = found
            .iter()
            .find(|i| i.kind == InsightKind::Health && i.sensors == [SensorKind::Weight])
            .unwrap();
        assert_eq!(warning.severity, Severity::Warning);
    }

    #[test]
    fn rule_order_groups_kinds() {
        let snap: Snapshot = (0..30)
            .map(|i| {
                let mut r = full_reading(i);
                r.temperature = Some(20.0 + 0.5 * i as f64);
                r
            })
            .collect();
        let kinds: Vec<InsightKind> = insights(&snap).iter().map(|i| i.kind).collect();
        let first_health = kinds.iter().position(|k| *k == InsightKind::Health);
        let first_trend = kinds.iter().position(|k| *k == InsightKind::Trend);
        if let (Some(t), Some(h)) = (first_trend, first_health) {
            assert!(t < h);
        }
        assert_eq!(*kinds.last().unwrap(), InsightKind::Volume);
    }
}
