//! Integration tests for the analytics engine
//!
//! Runs the whole store -> clean -> analyze path over simulated
//! collection runs, and checks that every analytic degrades to a neutral
//! result on an empty snapshot instead of panicking.

use chrono::DateTime;
use farmsense_core::analytics::{
    anomalies, anomalies_named, correlations, health, insights, performance, statistics, trends,
    AnomalyMethod, HealthStatus, InsightKind, TrendConfidence, TrendDirection,
};
use farmsense_core::clean::{clean, detect_gaps};
use farmsense_core::{CleanOptions, ReadingStore, SensorKind, Snapshot};
use serde_json::json;

/// A two-hour simulated run: warming temperature, drying moisture,
/// steady weight and pressure, one spike and one dropout.
fn simulated_run() -> Snapshot {
    let store = ReadingStore::new();
    for i in 0..120i64 {
        let mut record = json!({
            "timestamp": i * 60,
            "temperature": 18.0 + 0.05 * i as f64,
            "weight": 50.0,
            "moisture": 60.0 - 0.1 * i as f64,
            "pressure": 101_325.0,
            "sensor_id": "SIM_001",
        });
        if i == 40 {
            record["temperature"] = json!(95.0);
        }
        if i == 80 {
            record["moisture"] = serde_json::Value::Null;
        }
        store.append(&record);
    }
    clean(&store.snapshot(), &CleanOptions::default())
}

#[test]
fn trends_recover_the_simulated_drift() {
    let snap = simulated_run();
    let report = trends(&snap);

    let temp = report.temperature.unwrap();
    assert_eq!(temp.direction, TrendDirection::Increasing);
    assert_eq!(temp.confidence, TrendConfidence::High);
    // 0.05 units per reading, one reading per 60 seconds.
    assert!((temp.slope - 0.05 / 60.0).abs() < 1e-4);

    let moisture = report.moisture.unwrap();
    assert_eq!(moisture.direction, TrendDirection::Decreasing);

    // Constant channels regress to a zero slope with a certain null.
    let weight = report.weight.unwrap();
    assert_eq!(weight.slope, 0.0);
    assert_eq!(weight.p_value, 1.0);
    assert_eq!(weight.r_squared, 0.0);
}

#[test]
fn opposing_drifts_correlate_strongly() {
    let analysis = correlations(&simulated_run());
    let pair = analysis
        .pairs
        .iter()
        .find(|p| p.a == SensorKind::Temperature && p.b == SensorKind::Moisture)
        .unwrap();
    assert!(pair.coefficient < -0.9);
    assert!(pair.significant);
}

#[test]
fn cleaned_data_carries_no_zscore_anomalies() {
    // The 95 degree spike was fenced out during cleaning, so the
    // analytics layer sees a smooth series.
    let report = anomalies(&simulated_run(), AnomalyMethod::ZScore);
    assert_eq!(report.temperature.unwrap().count, 0);
}

#[test]
fn statistics_and_performance_agree_on_counts() {
    let snap = simulated_run();
    let stats = statistics(&snap);
    assert_eq!(stats.sensors.temperature.unwrap().count, 120);

    let metrics = performance(&snap).unwrap();
    assert_eq!(metrics.data_completeness_percent, 100.0);
    assert!(metrics.mean_health_score > 70.0);
    assert!((metrics.collection_period_secs - 119.0 * 60.0).abs() < 1e-9);
}

#[test]
fn healthy_run_reports_mostly_positive_insights() {
    let snap = simulated_run();
    let found = insights(&snap);

    assert!(found.iter().any(|i| i.kind == InsightKind::Trend));
    assert!(found.iter().any(|i| i.kind == InsightKind::Correlation));
    assert_eq!(found.last().unwrap().kind, InsightKind::Volume);
    assert!(found.last().unwrap().summary.contains("robust"));
}

#[test]
fn steady_full_channels_score_excellent() {
    let report = health(&simulated_run());
    assert_eq!(report.weight.status, HealthStatus::Excellent);
    assert_eq!(report.pressure.status, HealthStatus::Excellent);
}

#[test]
fn gap_detection_finds_the_dropout() {
    let store = ReadingStore::new();
    for i in 0..30i64 {
        // A 10-reading hole between minutes 10 and 20.
        if (10..20).contains(&i) {
            continue;
        }
        store.append(&json!({ "timestamp": i * 60, "temperature": 20.0 }));
    }
    let gaps = detect_gaps(&store.snapshot(), 60.0);
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].seconds, 660.0);
    assert_eq!(gaps[0].start, DateTime::from_timestamp(9 * 60, 0).unwrap());
    assert_eq!(gaps[0].end, DateTime::from_timestamp(20 * 60, 0).unwrap());
}

#[test]
fn every_analytic_is_neutral_on_empty_input() {
    let empty = Snapshot::empty();

    assert!(statistics(&empty).sensors.temperature.is_none());
    assert!(trends(&empty).temperature.is_none());
    assert!(correlations(&empty).pairs.is_empty());
    assert!(anomalies(&empty, AnomalyMethod::Iqr).temperature.is_none());
    assert!(anomalies_named(&empty, "zscore").temperature.is_none());
    assert_eq!(health(&empty).temperature.status, HealthStatus::Poor);
    assert!(insights(&empty).is_empty());
    assert_eq!(performance(&empty), None);
    assert!(detect_gaps(&empty, 60.0).is_empty());
}
