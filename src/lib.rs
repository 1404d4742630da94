//! Sensor data quality and analytics core for FarmSense
//!
//! Takes raw multi-sensor readings (temperature, weight, moisture,
//! pressure) through validation, bounded concurrent storage, cleaning,
//! and analysis. Designed as an embeddable library: the host owns
//! ingestion and presentation, this crate owns data quality.
//!
//! Pipeline shape:
//! - [`validate`] checks a raw record against the range table
//! - [`ReadingStore`] keeps a bounded, time-ordered window of readings
//! - [`clean`](clean::clean) repairs, scrubs, and optionally smooths a snapshot
//! - [`analytics`] computes statistics, trends, correlations, anomalies,
//!   health scores, and insights over snapshots
//!
//! ```no_run
//! use farmsense_core::{clean, CleanOptions, ReadingStore};
//! use serde_json::json;
//!
//! let store = ReadingStore::new();
//! store.append(&json!({
//!     "timestamp": "2026-06-01T12:00:00Z",
//!     "temperature": 21.5,
//!     "weight": 48.2,
//!     "moisture": 45.0,
//!     "pressure": 101325.0,
//! }));
//!
//! let cleaned = clean::clean(&store.snapshot(), &CleanOptions::default());
//! let report = farmsense_core::analytics::statistics(&cleaned);
//! ```

#![deny(unsafe_code)]

pub mod analytics;
pub mod clean;
pub mod constants;
pub mod errors;
pub mod export;
pub mod format;
pub mod reading;
pub mod stats;
pub mod store;
pub mod validate;

// Public API
pub use clean::CleanOptions;
pub use errors::{ExportError, NormalizeError};
pub use export::{export, export_named, ExportFormat};
pub use reading::{Reading, SensorKind, SensorMap, Snapshot};
pub use store::{ReadingStore, StoreSummary, StoreUsage};
pub use validate::{validate, ValidationReport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
