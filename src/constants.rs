//! Fixed Configuration Surface
//!
//! Every tunable the core consumes lives here as a compile-time constant:
//! the sensor range table, the store capacity, and the statistical
//! thresholds used by cleaning and analytics. None of these are mutable at
//! runtime; the host application gets exactly the behavior the constants
//! describe.

// ===== SENSOR RANGE TABLE =====

/// Minimum valid temperature reading (°C).
///
/// Matches the coldest conditions the deployed probes are rated for.
pub const TEMPERATURE_MIN_C: f64 = -50.0;

/// Maximum valid temperature reading (°C).
pub const TEMPERATURE_MAX_C: f64 = 100.0;

/// Minimum valid weight reading (kg). Load cells cannot go negative.
pub const WEIGHT_MIN_KG: f64 = 0.0;

/// Maximum valid weight reading (kg).
pub const WEIGHT_MAX_KG: f64 = 1000.0;

/// Minimum valid moisture reading (% relative).
pub const MOISTURE_MIN_PCT: f64 = 0.0;

/// Maximum valid moisture reading (% relative).
pub const MOISTURE_MAX_PCT: f64 = 100.0;

/// Minimum valid barometric pressure reading (Pa).
///
/// Covers severe low-pressure weather at altitude.
pub const PRESSURE_MIN_PA: f64 = 80_000.0;

/// Maximum valid barometric pressure reading (Pa).
pub const PRESSURE_MAX_PA: f64 = 120_000.0;

// ===== STORE LIMITS =====

/// Maximum number of readings the store retains.
///
/// Once full, the oldest reading is evicted on the next append (FIFO).
/// Bounds memory use without ever blocking the producer.
pub const STORE_CAPACITY: usize = 10_000;

// ===== OUTLIER DETECTION =====

/// Z-score magnitude above which a value is flagged as an outlier.
pub const ZSCORE_THRESHOLD: f64 = 3.0;

/// Multiplier applied to the IQR when computing outlier fences.
///
/// Bounds are `[Q1 - k*IQR, Q3 + k*IQR]` with `k` = this constant.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Minimum non-missing values a column needs before the cleaning
/// pipeline's IQR stage will touch it. Smaller columns pass through.
pub const IQR_MIN_SAMPLES: usize = 5;

/// Minimum non-missing values a column needs for anomaly detection
/// and trend regression to produce a result.
pub const MIN_ANALYSIS_SAMPLES: usize = 3;

// ===== SMOOTHING =====

/// Largest Savitzky-Golay window the pipeline will use.
///
/// The effective window is `min(5, n)` rounded down to odd.
pub const SMOOTH_MAX_WINDOW: usize = 5;

/// Polynomial degree of the smoothing filter.
pub const SMOOTH_POLY_DEGREE: usize = 2;

/// Snapshot must hold more entries than this before smoothing applies.
pub const SMOOTH_MIN_ENTRIES: usize = 5;

// ===== TREND CLASSIFICATION =====

/// R² above which a trend is reported with high confidence.
pub const TREND_R2_HIGH: f64 = 0.7;

/// R² above which a trend is reported with medium confidence.
pub const TREND_R2_MEDIUM: f64 = 0.3;

// ===== CORRELATION TIERS =====

/// |r| at or above which a correlation is strong.
pub const CORR_STRONG: f64 = 0.7;

/// |r| at or above which a correlation is moderate.
pub const CORR_MODERATE: f64 = 0.4;

/// |r| at or above which a correlation is weak (and significant).
pub const CORR_WEAK: f64 = 0.2;

// ===== SENSOR HEALTH =====

/// Weight of availability in the composite health score.
pub const HEALTH_AVAILABILITY_WEIGHT: f64 = 0.4;

/// Weight of whole-column stability in the composite health score.
pub const HEALTH_STABILITY_WEIGHT: f64 = 0.3;

/// Weight of recent-window stability in the composite health score.
pub const HEALTH_RECENT_WEIGHT: f64 = 0.3;

/// Fraction of the column used as the recent-stability window.
pub const HEALTH_RECENT_FRACTION: f64 = 0.10;

/// Health score tiers: `excellent >= 90`, `good >= 70`, `fair >= 50`.
pub const HEALTH_EXCELLENT: f64 = 90.0;
pub const HEALTH_GOOD: f64 = 70.0;
pub const HEALTH_FAIR: f64 = 50.0;

// ===== INSIGHTS =====

/// CV (%) above which a sensor is flagged as highly variable.
pub const HIGH_VARIABILITY_CV: f64 = 50.0;

/// Record count above which the data volume supports robust analysis.
pub const ROBUST_VOLUME_RECORDS: usize = 100;

// ===== TEMPORAL CONSISTENCY =====

/// Shortest plausible gap between consecutive readings (seconds).
pub const MIN_READING_GAP_S: f64 = 0.5;

/// Longest plausible gap between consecutive readings (seconds).
pub const MAX_READING_GAP_S: f64 = 3600.0;

/// A gap longer than `expected_interval * this` counts as a collection gap.
pub const GAP_FACTOR: f64 = 2.0;
