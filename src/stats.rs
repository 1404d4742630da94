//! Shared Numeric Kernel
//!
//! Small, pure statistics helpers used by the store summary, the cleaning
//! pipeline, and the analytics engine. Conventions, chosen once here so
//! every caller agrees:
//!
//! - Spread is the *sample* standard deviation (`n - 1` divisor) except
//!   for z-scores, which use the population deviation (`n` divisor),
//!   matching how the reference statistics stack computes each.
//! - Quantiles use linear interpolation between order statistics.
//! - Skewness and kurtosis are the bias-corrected estimators (kurtosis is
//!   *excess* kurtosis: a normal distribution scores 0).
//! - Every function tolerates short input by returning `None` instead of
//!   NaN, so degenerate columns stay explicit at call sites.

/// Values of a column that are actually present.
pub fn non_missing(column: &[Option<f64>]) -> Vec<f64> {
    column.iter().filter_map(|v| *v).collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (`n - 1` divisor). Needs at least two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation (`n - 1` divisor).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Population standard deviation (`n` divisor). Used for z-scores.
pub fn population_std(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / values.len() as f64).sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Quantile `q` in `[0, 1]` with linear interpolation between order
/// statistics, the same scheme the reference stack uses.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Bias-corrected sample skewness. Needs at least three values and a
/// non-zero spread.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let m = mean(values)?;
    let s = sample_std(values)?;
    if s == 0.0 {
        return None;
    }
    let m3: f64 = values.iter().map(|v| ((v - m) / s).powi(3)).sum();
    let nf = n as f64;
    Some(nf / ((nf - 1.0) * (nf - 2.0)) * m3)
}

/// Bias-corrected excess kurtosis. Needs at least four values and a
/// non-zero spread.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let m = mean(values)?;
    let s = sample_std(values)?;
    if s == 0.0 {
        return None;
    }
    let m4: f64 = values.iter().map(|v| ((v - m) / s).powi(4)).sum();
    let nf = n as f64;
    let lead = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0));
    let tail = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    Some(lead * m4 - tail)
}

/// Coefficient of variation in percent.
///
/// A zero (or undefined) mean makes the ratio meaningless, so it maps to
/// the worst-case 100, the convention the health scorer depends on.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    match (mean(values), sample_std(values)) {
        (Some(m), Some(s)) if m != 0.0 => (s / m * 100.0).abs(),
        _ => 100.0,
    }
}

/// Pearson correlation over two equal-length series.
///
/// `None` for fewer than two points or when either side has zero
/// variance (the ratio is undefined, not zero).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}
