//! Integration tests for the reading store
//!
//! Exercises the store the way a host application does: one producer
//! thread appending on a timer while consumers pull snapshots, plus the
//! full ingest path from raw wire records.

use std::sync::Arc;
use std::thread;

use chrono::DateTime;
use farmsense_core::{validate, ReadingStore, SensorKind};
use serde_json::json;

fn raw(ts: i64, temp: f64) -> serde_json::Value {
    json!({
        "timestamp": ts,
        "temperature": temp,
        "weight": 50.0,
        "moisture": 45.0,
        "pressure": 101_325.0,
        "sensor_id": "SIM_001",
    })
}

#[test]
fn concurrent_appends_and_snapshots_stay_consistent() {
    let store = Arc::new(ReadingStore::with_capacity(500));
    let mut handles = Vec::new();

    for worker in 0..4i64 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..100i64 {
                store.append(&raw(worker * 1000 + i, 20.0));
            }
        }));
    }

    // Readers run while the writers are still going; every snapshot
    // they see must be internally ordered and within capacity.
    for _ in 0..2 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                let snap = store.snapshot();
                assert!(snap.is_time_ordered());
                assert!(snap.len() <= 500);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let snap = store.snapshot();
    assert_eq!(snap.len(), 400);
    assert!(snap.is_time_ordered());
}

#[test]
fn eviction_under_concurrent_load_keeps_the_newest() {
    let store = Arc::new(ReadingStore::with_capacity(50));
    let handles: Vec<_> = (0..4i64)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100i64 {
                    store.append(&raw(worker * 100 + i, 20.0));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snap = store.snapshot();
    assert_eq!(snap.len(), 50);
    assert!(snap.is_time_ordered());
    // The global maximum timestamp always survives eviction.
    assert_eq!(snap.last_timestamp(), DateTime::from_timestamp(399, 0));
}

#[test]
fn validate_then_append_ingest_path() {
    let store = ReadingStore::new();

    let good = raw(100, 21.5);
    let report = validate(&good);
    assert!(report.is_valid());
    assert!(store.append(&good));

    // Out of range: the validator flags it, and a host that appends it
    // anyway still gets it scrubbed later by the cleaning pipeline.
    let out_of_range = raw(200, 500.0);
    let report = validate(&out_of_range);
    assert!(!report.is_valid());

    // Structurally broken: the store itself refuses it.
    let no_timestamp = json!({ "temperature": 21.0 });
    assert!(!validate(&no_timestamp).is_valid());
    assert!(!store.append(&no_timestamp));

    assert_eq!(store.count(), 1);
}

#[test]
fn equal_timestamps_keep_arrival_order() {
    let store = ReadingStore::new();
    for temp in [20.0, 21.0, 22.0] {
        store.append(&raw(1000, temp));
    }
    let temps = store.snapshot().column(SensorKind::Temperature);
    assert_eq!(temps, vec![Some(20.0), Some(21.0), Some(22.0)]);
}

#[test]
fn summary_reflects_live_contents() {
    let store = ReadingStore::with_capacity(3);
    for i in 0..5 {
        store.append(&raw(i, 20.0 + i as f64));
    }

    let summary = store.summary();
    assert_eq!(summary.total_records, 3);
    // Only the three newest survive in a capacity-3 store.
    let temp = summary.sensors.temperature.as_ref().unwrap();
    assert_eq!(temp.min, 22.0);
    assert_eq!(temp.max, 24.0);

    let usage = store.usage();
    assert_eq!(usage.records, 3);
    assert_eq!(usage.percent_full, 100.0);
}
