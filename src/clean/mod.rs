//! Cleaning Pipeline
//!
//! Transforms a raw snapshot into a cleaned one. Pure function of its
//! inputs: the store is never touched, the input snapshot is never
//! mutated, and the same snapshot with the same options always produces
//! the same output.
//!
//! ## Stage order
//!
//! Each stage runs over the whole snapshot before the next begins:
//!
//! 1. **Missing-value repair** (when `fill_missing`): per-column
//!    forward-fill / backward-fill / interpolation / range-midpoint, see
//!    [`repair`].
//! 2. **Invalid-value scrub** (always): out-of-range values become
//!    missing, then every column is repaired with the same procedure.
//!    This stage is unconditional on purpose: an invalid value must
//!    never survive into cleaned output, whatever the options say.
//! 3. **Outlier removal** (when `remove_outliers`): per column with
//!    more than four values, IQR-fenced values become missing and are
//!    repaired. Smaller columns are left untouched.
//! 4. **Smoothing** (when `smooth` and the snapshot is long enough):
//!    Savitzky-Golay per column, see [`smooth`]; an inapplicable column
//!    is kept as-is instead of failing the pipeline. Smoothed values are
//!    clamped to the channel range so the range invariant survives
//!    filter overshoot.
//! 5. **Normalize** (always): sort ascending by timestamp.
//!
//! Running `clean` on its own output leaves the repair and scrub stages
//! with nothing to do: nothing is missing and nothing is invalid after
//! one pass. The outlier stage usually converges on the first pass too,
//! though repairs shift the fences, so a second pass can occasionally
//! trim further. Smoothing, being a curve fit, always re-fits.

pub mod quality;
pub mod repair;
pub mod smooth;

pub use quality::{data_quality, detect_gaps, detect_outliers, quality_score, DataGap, QualityReport};
pub use repair::repair_column;
pub use smooth::smooth_column;

use crate::constants::{IQR_MIN_SAMPLES, SMOOTH_MIN_ENTRIES};
use crate::reading::{SensorKind, Snapshot};
use crate::stats;

/// Which optional stages the pipeline runs.
///
/// The defaults are the standard cleaning profile: repair and outlier
/// removal on, smoothing off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    pub remove_outliers: bool,
    pub fill_missing: bool,
    pub smooth: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            remove_outliers: true,
            fill_missing: true,
            smooth: false,
        }
    }
}

/// Run the cleaning pipeline over a snapshot.
pub fn clean(snapshot: &Snapshot, options: &CleanOptions) -> Snapshot {
    if snapshot.is_empty() {
        return Snapshot::empty();
    }
    let mut cleaned = snapshot.clone();

    if options.fill_missing {
        for kind in SensorKind::ALL {
            let mut column = cleaned.column(kind);
            let filled = repair_column(&mut column, kind);
            if filled > 0 {
                log::debug!("repair: filled {filled} missing {} values", kind.name());
            }
            cleaned.set_column(kind, &column);
        }
    }

    scrub_invalid(&mut cleaned);

    if options.remove_outliers {
        remove_outliers(&mut cleaned);
    }

    if options.smooth && cleaned.len() > SMOOTH_MIN_ENTRIES {
        apply_smoothing(&mut cleaned);
    }

    cleaned.sort_by_timestamp();
    cleaned
}

/// Stage 2: out-of-range values become missing, then every column is
/// repaired. Runs regardless of the `fill_missing` flag.
fn scrub_invalid(snapshot: &mut Snapshot) {
    for kind in SensorKind::ALL {
        let mut column = snapshot.column(kind);
        let mut scrubbed = 0;
        for slot in column.iter_mut() {
            if let Some(v) = *slot {
                if !kind.in_range(v) {
                    *slot = None;
                    scrubbed += 1;
                }
            }
        }
        repair_column(&mut column, kind);
        if scrubbed > 0 {
            log::debug!("scrub: replaced {scrubbed} invalid {} values", kind.name());
        }
        snapshot.set_column(kind, &column);
    }
}

/// Stage 3: IQR-fenced values become missing, then the column is
/// repaired. Columns with too few values pass through.
fn remove_outliers(snapshot: &mut Snapshot) {
    for kind in SensorKind::ALL {
        let mut column = snapshot.column(kind);
        let values = stats::non_missing(&column);
        if values.len() < IQR_MIN_SAMPLES {
            continue;
        }
        let Some((lower, upper)) = quality::iqr_bounds(&values) else {
            continue;
        };

        let mut removed = 0;
        for slot in column.iter_mut() {
            if let Some(v) = *slot {
                if v < lower || v > upper {
                    *slot = None;
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            repair_column(&mut column, kind);
            log::debug!("outliers: repaired {removed} {} values", kind.name());
            snapshot.set_column(kind, &column);
        }
    }
}

/// Stage 4: smooth each applicable column, clamped to the channel range.
fn apply_smoothing(snapshot: &mut Snapshot) {
    for kind in SensorKind::ALL {
        let column = snapshot.column(kind);
        if let Some(smoothed) = smooth_column(&column) {
            let (min, max) = kind.valid_range();
            let clamped: Vec<Option<f64>> =
                smoothed.into_iter().map(|v| Some(v.clamp(min, max))).collect();
            snapshot.set_column(kind, &clamped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;
    use chrono::DateTime;

    fn reading(ts: i64, temp: Option<f64>) -> Reading {
        let mut r = Reading::empty_at(DateTime::from_timestamp(ts, 0).unwrap());
        r.temperature = temp;
        r.weight = Some(50.0);
        r.moisture = Some(45.0);
        r.pressure = Some(101_325.0);
        r
    }

    fn temps(snapshot: &Snapshot) -> Vec<Option<f64>> {
        snapshot.column(SensorKind::Temperature)
    }

    #[test]
    fn invalid_value_never_survives() {
        // The end-to-end walk-through: 20, 1000 (invalid), 22.
        let snap = Snapshot::new(vec![
            reading(0, Some(20.0)),
            reading(1, Some(1000.0)),
            reading(2, Some(22.0)),
        ]);
        let cleaned = clean(&snap, &CleanOptions { fill_missing: true, ..Default::default() });

        let column = temps(&cleaned);
        assert!(!column.contains(&Some(1000.0)));
        // Repaired from its neighbors, inside the valid range.
        let repaired = column[1].unwrap();
        assert!((20.0..=22.0).contains(&repaired));
        assert!(column.iter().flatten().all(|&v| SensorKind::Temperature.in_range(v)));
    }

    #[test]
    fn scrub_runs_even_without_fill_missing() {
        let snap = Snapshot::new(vec![
            reading(0, Some(20.0)),
            reading(1, Some(-200.0)),
            reading(2, Some(22.0)),
        ]);
        let options = CleanOptions {
            fill_missing: false,
            remove_outliers: false,
            smooth: false,
        };
        let cleaned = clean(&snap, &options);
        assert_eq!(temps(&cleaned)[1], Some(20.0));
    }

    #[test]
    fn missing_values_filled_when_requested() {
        let snap = Snapshot::new(vec![
            reading(0, None),
            reading(1, Some(21.0)),
            reading(2, None),
        ]);
        let cleaned = clean(&snap, &CleanOptions::default());
        assert_eq!(temps(&cleaned), vec![Some(21.0), Some(21.0), Some(21.0)]);
    }

    #[test]
    fn outlier_stage_repairs_fenced_values_only() {
        let mut readings: Vec<Reading> = (0..9).map(|i| reading(i, Some(20.0 + 0.1 * i as f64))).collect();
        readings[4].temperature = Some(80.0);
        let cleaned = clean(&Snapshot::new(readings), &CleanOptions::default());

        let column = temps(&cleaned);
        assert!(!column.contains(&Some(80.0)));
        // Untouched inliers keep their exact values.
        assert_eq!(column[0], Some(20.0));
        assert_eq!(column[8], Some(20.8));
        // The repaired slot took the previous value.
        assert_eq!(column[4], Some(20.3));
    }

    #[test]
    fn small_columns_skip_the_outlier_stage() {
        // Four values: the fence stage must not touch them.
        let snap = Snapshot::new(vec![
            reading(0, Some(20.0)),
            reading(1, Some(20.0)),
            reading(2, Some(20.0)),
            reading(3, Some(90.0)),
        ]);
        let cleaned = clean(&snap, &CleanOptions::default());
        assert_eq!(temps(&cleaned)[3], Some(90.0));
    }

    #[test]
    fn normalize_restores_timestamp_order() {
        let snap = Snapshot::new(vec![
            reading(5, Some(21.0)),
            reading(1, Some(20.0)),
            reading(3, Some(20.5)),
        ]);
        let options = CleanOptions { remove_outliers: false, fill_missing: false, smooth: false };
        let cleaned = clean(&snap, &options);
        assert!(cleaned.is_time_ordered());
        assert_eq!(temps(&cleaned), vec![Some(20.0), Some(20.5), Some(21.0)]);
    }

    #[test]
    fn smoothing_needs_more_than_five_entries() {
        let short: Snapshot = (0..5).map(|i| reading(i, Some(20.0 + i as f64))).collect();
        let options = CleanOptions { smooth: true, ..Default::default() };
        let smoothed_short = clean(&short, &options);
        assert_eq!(temps(&smoothed_short), temps(&short));

        let long: Snapshot = (0..8)
            .map(|i| reading(i, Some(if i % 2 == 0 { 20.0 } else { 21.0 })))
            .collect();
        let smoothed_long = clean(&long, &options);
        assert_ne!(temps(&smoothed_long), temps(&long));
        // Smoothed output still honors the range table.
        assert!(temps(&smoothed_long)
            .iter()
            .flatten()
            .all(|&v| SensorKind::Temperature.in_range(v)));
    }

    #[test]
    fn cleaning_is_idempotent_without_smoothing() {
        let mut readings: Vec<Reading> = (0..12)
            .map(|i| reading(i, Some(20.0 + (i % 4) as f64)))
            .collect();
        readings[3].temperature = Some(400.0);
        readings[7].temperature = None;
        readings[9].moisture = Some(-5.0);
        let snap = Snapshot::new(readings);

        let options = CleanOptions::default();
        let once = clean(&snap, &options);
        let twice = clean(&once, &options);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_snapshot_passes_through() {
        let cleaned = clean(&Snapshot::empty(), &CleanOptions::default());
        assert!(cleaned.is_empty());
    }
}
