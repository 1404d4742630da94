//! Correlation Analysis
//!
//! Pearson correlation between every unordered pair of sensor channels,
//! computed over pairwise-complete rows (a row contributes to a pair only
//! when both channels carry a value). Each pair gets a strength tier, a
//! sign-based direction, and a significance flag; pairs whose coefficient
//! is undefined (too few complete rows, or a zero-variance side) are
//! omitted rather than reported as NaN.

use serde::Serialize;

use crate::constants::{CORR_MODERATE, CORR_STRONG, CORR_WEAK};
use crate::reading::{SensorKind, Snapshot};
use crate::stats;

/// Tiered magnitude of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl CorrelationStrength {
    pub fn from_coefficient(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude >= CORR_STRONG {
            CorrelationStrength::Strong
        } else if magnitude >= CORR_MODERATE {
            CorrelationStrength::Moderate
        } else if magnitude >= CORR_WEAK {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::VeryWeak
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::VeryWeak => "very weak",
        }
    }
}

/// Sign of a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationDirection {
    Positive,
    Negative,
}

/// One unordered channel pair's correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairCorrelation {
    pub a: SensorKind,
    pub b: SensorKind,
    pub coefficient: f64,
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
    /// Whether the magnitude clears the weak-correlation floor.
    pub significant: bool,
}

/// Full 4x4 coefficient matrix, `None` where undefined.
///
/// Symmetric, with unit diagonal wherever the channel has any data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CorrelationMatrix {
    cells: [[Option<f64>; 4]; 4],
}

impl CorrelationMatrix {
    pub fn get(&self, a: SensorKind, b: SensorKind) -> Option<f64> {
        self.cells[a.index()][b.index()]
    }

    fn set(&mut self, a: SensorKind, b: SensorKind, r: Option<f64>) {
        self.cells[a.index()][b.index()] = r;
        self.cells[b.index()][a.index()] = r;
    }
}

/// Pairwise correlations plus the full matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationAnalysis {
    pub pairs: Vec<PairCorrelation>,
    pub matrix: CorrelationMatrix,
}

/// Correlate every channel pair over pairwise-complete rows.
pub fn correlations(snapshot: &Snapshot) -> CorrelationAnalysis {
    let mut matrix = CorrelationMatrix::default();
    let mut pairs = Vec::new();

    let columns: Vec<Vec<Option<f64>>> =
        SensorKind::ALL.iter().map(|&k| snapshot.column(k)).collect();

    for (i, &a) in SensorKind::ALL.iter().enumerate() {
        let has_data = columns[i].iter().any(Option::is_some);
        matrix.set(a, a, has_data.then_some(1.0));

        for &b in &SensorKind::ALL[i + 1..] {
            let r = pairwise_pearson(&columns[a.index()], &columns[b.index()]);
            matrix.set(a, b, r);

            if let Some(r) = r {
                pairs.push(PairCorrelation {
                    a,
                    b,
                    coefficient: r,
                    strength: CorrelationStrength::from_coefficient(r),
                    direction: if r > 0.0 {
                        CorrelationDirection::Positive
                    } else {
                        CorrelationDirection::Negative
                    },
                    significant: r.abs() >= CORR_WEAK,
                });
            }
        }
    }

    CorrelationAnalysis { pairs, matrix }
}

/// Pearson r over rows where both columns carry a value.
fn pairwise_pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let (mut x, mut y) = (Vec::new(), Vec::new());
    for (a, b) in xs.iter().zip(ys) {
        if let (Some(a), Some(b)) = (a, b) {
            x.push(*a);
            y.push(*b);
        }
    }
    stats::pearson(&x, &y)
}
