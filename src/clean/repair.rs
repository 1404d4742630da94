//! Missing-Value Repair
//!
//! One repair procedure serves every stage that manufactures gaps: the
//! missing-value stage, the invalid-value scrub, and outlier removal all
//! hand their holes to [`repair_column`]. The procedure, in order:
//!
//! 1. forward-fill from the nearest earlier value;
//! 2. backward-fill any still-missing leading values;
//! 3. linear interpolation for interior gaps the fills left behind;
//! 4. if the column never had a value at all, fill with the midpoint of
//!    the channel's valid range.
//!
//! Because forward-fill runs first, an interior gap repairs to the
//! previous observation; interpolation only fires on gap patterns the
//! fills cannot reach. The order is part of the cleaning contract; do
//! not reorder it.

use crate::reading::SensorKind;

/// Repair every missing value in `values`. Returns how many were filled.
pub fn repair_column(values: &mut [Option<f64>], kind: SensorKind) -> usize {
    let missing = values.iter().filter(|v| v.is_none()).count();
    if missing == 0 {
        return 0;
    }

    forward_fill(values);
    backward_fill(values);
    interpolate(values);

    if values.iter().any(Option::is_none) {
        let midpoint = kind.range_midpoint();
        for slot in values.iter_mut() {
            if slot.is_none() {
                *slot = Some(midpoint);
            }
        }
    }
    missing
}

/// Carry the last observed value forward over gaps.
pub(crate) fn forward_fill(values: &mut [Option<f64>]) {
    let mut last = None;
    for slot in values.iter_mut() {
        match slot {
            Some(v) => last = Some(*v),
            None => *slot = last,
        }
    }
}

/// Carry the next observed value backward over gaps.
pub(crate) fn backward_fill(values: &mut [Option<f64>]) {
    let mut next = None;
    for slot in values.iter_mut().rev() {
        match slot {
            Some(v) => next = Some(*v),
            None => *slot = next,
        }
    }
}

/// Linearly interpolate interior gaps between two observed values.
pub(crate) fn interpolate(values: &mut [Option<f64>]) {
    let mut prev_known: Option<(usize, f64)> = None;
    for i in 0..values.len() {
        let Some(value) = values[i] else { continue };
        if let Some((j, start)) = prev_known {
            if i - j > 1 {
                let step = (value - start) / (i - j) as f64;
                for (offset, slot) in values[j + 1..i].iter_mut().enumerate() {
                    *slot = Some(start + step * (offset + 1) as f64);
                }
            }
        }
        prev_known = Some((i, value));
    }
}
