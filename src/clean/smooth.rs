//! Local Polynomial Smoothing (Savitzky-Golay, degree 2)
//!
//! Each output sample is the value of a least-squares quadratic fitted to
//! the window centered on it. For the fixed 5-point window the interior
//! reduces to a convolution with `(-3, 12, 17, 12, -3) / 35`; the two
//! samples at each edge are evaluated from the quadratic fitted to the
//! outermost full window, so the ends are smoothed rather than clipped.
//!
//! The filter is *inapplicable*, and the caller keeps the original
//! column, when the window cannot be formed: fewer than five samples
//! after rounding the window down to odd, or any missing value in the
//! column. Inapplicability is an explicit `None`, never a panic and
//! never a half-smoothed column.

use crate::constants::{SMOOTH_MAX_WINDOW, SMOOTH_POLY_DEGREE};

/// Convolution weights for the interior of the 5-point quadratic window.
const INTERIOR_WEIGHTS: [f64; 5] = [-3.0, 12.0, 17.0, 12.0, -3.0];
const INTERIOR_NORM: f64 = 35.0;

/// Smooth one complete column. `None` when the filter is inapplicable.
pub fn smooth_column(column: &[Option<f64>]) -> Option<Vec<f64>> {
    if column.iter().any(Option::is_none) {
        return None;
    }
    let values: Vec<f64> = column.iter().map(|v| v.unwrap_or_default()).collect();

    let mut window = SMOOTH_MAX_WINDOW.min(values.len());
    if window % 2 == 0 {
        window -= 1;
    }
    // The quadratic needs more points than its degree.
    if window <= SMOOTH_POLY_DEGREE + 1 {
        return None;
    }

    let n = values.len();
    let half = window / 2;
    let mut smoothed = vec![0.0; n];

    for i in half..n - half {
        let acc: f64 = INTERIOR_WEIGHTS
            .iter()
            .zip(&values[i - half..=i + half])
            .map(|(w, v)| w * v)
            .sum();
        smoothed[i] = acc / INTERIOR_NORM;
    }

    // Edges: evaluate the quadratic fitted to the outermost full window.
    let head = fit_quadratic(&values[..window])?;
    for i in 0..half {
        smoothed[i] = eval_quadratic(head, i as f64);
    }
    let tail = fit_quadratic(&values[n - window..])?;
    for i in n - half..n {
        let x = (i - (n - window)) as f64;
        smoothed[i] = eval_quadratic(tail, x);
    }

    Some(smoothed)
}

/// Least-squares quadratic through `(0, ys[0]), (1, ys[1]), ...`.
///
/// Returns coefficients `[c0, c1, c2]` for `c0 + c1*x + c2*x^2`, or
/// `None` if the normal equations are singular.
fn fit_quadratic(ys: &[f64]) -> Option<[f64; 3]> {
    let n = ys.len() as f64;
    let (mut s1, mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0, 0.0);
    let (mut t0, mut t1, mut t2) = (0.0, 0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let x = i as f64;
        s1 += x;
        s2 += x * x;
        s3 += x * x * x;
        s4 += x * x * x * x;
        t0 += y;
        t1 += x * y;
        t2 += x * x * y;
    }
    solve3(
        [[n, s1, s2], [s1, s2, s3], [s2, s3, s4]],
        [t0, t1, t2],
    )
}

fn eval_quadratic(c: [f64; 3], x: f64) -> f64 {
    c[0] + c[1] * x + c[2] * x * x
}

/// Gaussian elimination with partial pivoting for a 3x3 system.
fn solve3(mut a: [[f64; 3]; 3], mut b: [f64; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let pivot = (col..3).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..3 {
            let factor = a[row][col] / a[col][col];
            for k in col..3 {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; 3];
    for row in (0..3).rev() {
        let mut acc = b[row];
        for k in row + 1..3 {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }
    Some(x)
}
