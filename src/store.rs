//! Bounded Concurrent Time-Series Store
//!
//! ## Overview
//!
//! [`ReadingStore`] is the system of record: a bounded, timestamp-ordered
//! buffer of validated readings, safe for a producer appending on a timer
//! tick while consumers pull snapshots for cleaning and analytics.
//!
//! ## Invariants
//!
//! After every mutation:
//!
//! - readings are sorted by timestamp ascending;
//! - the buffer never holds more than `capacity` readings: once full,
//!   the oldest reading is evicted on the next append (FIFO), so the
//!   producer is never blocked and memory never grows unbounded;
//! - everything returned to a caller is a structural copy, so no
//!   consumer ever observes a mutation mid-read.
//!
//! ## Locking discipline
//!
//! One mutex guards the buffer. It is held only for the insert/trim step
//! of a mutation or the copy-out step of a read; summary statistics and
//! any other O(n) analysis run on the copy *after* the lock is released.
//! A poisoned lock (a panicking thread mid-append) is recovered rather
//! than propagated: the invariants hold between operations, so the data
//! behind a poisoned lock is still consistent.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::constants::STORE_CAPACITY;
use crate::reading::{Reading, SensorKind, SensorMap, Snapshot};
use crate::stats;

/// Bounded, ordered, concurrency-safe buffer of readings.
pub struct ReadingStore {
    buffer: Mutex<Vec<Reading>>,
    capacity: usize,
}

/// Per-channel summary inside [`StoreSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSummary {
    /// Non-missing values in the column.
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
    /// The column's value in the newest reading (which may be missing).
    pub latest: Option<f64>,
}

/// First and last timestamps currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Store-wide summary: per-channel statistics plus global metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub sensors: SensorMap<Option<SensorSummary>>,
    pub total_records: usize,
    pub time_span: Option<TimeSpan>,
    /// Distinct sensor ids, in first-seen order.
    pub sensor_ids: Vec<String>,
}

/// Occupancy report for the bounded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoreUsage {
    pub records: usize,
    pub capacity: usize,
    pub percent_full: f64,
}

impl Default for ReadingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingStore {
    /// Empty store with the standard capacity.
    pub fn new() -> Self {
        Self::with_capacity(STORE_CAPACITY)
    }

    /// Empty store with a custom capacity (mainly for tests).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Reading>> {
        // Invariants hold between operations, so a poisoned lock still
        // guards consistent data.
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a raw reading that has already passed the validator.
    ///
    /// The store does not re-check ranges; it only normalizes the record
    /// and re-derives its ordering position. Returns `false`, with the
    /// buffer untouched, when normalization fails.
    pub fn append(&self, raw: &Value) -> bool {
        let reading = match Reading::from_value(raw) {
            Ok(reading) => reading,
            Err(err) => {
                log::warn!("append rejected: {err}");
                return false;
            }
        };

        let mut buffer = self.lock();
        // Insert after any equal timestamps so arrival order is kept.
        let pos = buffer.partition_point(|r| r.timestamp <= reading.timestamp);
        buffer.insert(pos, reading);
        if buffer.len() > self.capacity {
            let excess = buffer.len() - self.capacity;
            buffer.drain(..excess);
        }
        true
    }

    /// Full independent copy of the buffer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.lock().clone())
    }

    /// Readings with `timestamp >= now - window`.
    pub fn recent(&self, window: Duration) -> Snapshot {
        let cutoff = Utc::now() - window;
        self.lock()
            .iter()
            .filter(|r| r.timestamp >= cutoff)
            .cloned()
            .collect()
    }

    /// Readings with `start <= timestamp <= end`.
    pub fn by_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Snapshot {
        self.lock()
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .cloned()
            .collect()
    }

    /// Most recent reading, if any.
    pub fn latest(&self) -> Option<Reading> {
        self.lock().last().cloned()
    }

    /// Timestamp of the most recent reading, if any.
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.lock().last().map(|r| r.timestamp)
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Reset to the empty state. Idempotent.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Per-channel statistics plus global metadata.
    ///
    /// The lock is held only to copy the buffer; the arithmetic runs on
    /// the copy.
    pub fn summary(&self) -> StoreSummary {
        let snapshot = self.snapshot();

        let sensors = SensorMap::from_fn(|kind| summarize_column(&snapshot, kind));

        let time_span = match (snapshot.first_timestamp(), snapshot.last_timestamp()) {
            (Some(start), Some(end)) => Some(TimeSpan { start, end }),
            _ => None,
        };

        let mut sensor_ids: Vec<String> = Vec::new();
        for reading in &snapshot {
            if !sensor_ids.iter().any(|id| id == &reading.sensor_id) {
                sensor_ids.push(reading.sensor_id.clone());
            }
        }

        StoreSummary {
            sensors,
            total_records: snapshot.len(),
            time_span,
            sensor_ids,
        }
    }

    /// How full the bounded buffer is.
    pub fn usage(&self) -> StoreUsage {
        let records = self.count();
        StoreUsage {
            records,
            capacity: self.capacity,
            percent_full: records as f64 / self.capacity as f64 * 100.0,
        }
    }
}

fn summarize_column(snapshot: &Snapshot, kind: SensorKind) -> Option<SensorSummary> {
    let column = snapshot.column(kind);
    let values = stats::non_missing(&column);
    if values.is_empty() {
        return None;
    }
    Some(SensorSummary {
        count: values.len(),
        mean: stats::mean(&values)?,
        min: stats::min(&values)?,
        max: stats::max(&values)?,
        std: stats::sample_std(&values),
        latest: column.last().copied().flatten(),
    })
}
