//! Correlation between a factor cross-section and forward returns.

use std::str::FromStr;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{MathError, TieBreak, rank};

/// Correlation used for information coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationMethod {
    /// Rank correlation (average ranks for ties).
    #[default]
    Spearman,
    /// Linear correlation.
    Pearson,
}

impl CorrelationMethod {
    /// Accepted names.
    pub const VALID: [&'static str; 2] = ["spearman", "pearson"];

    /// Correlation of the pairs where both values are finite.
    #[must_use]
    pub fn correlate(self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        match self {
            Self::Spearman => spearman(x, y),
            Self::Pearson => pearson(x, y),
        }
    }
}

impl FromStr for CorrelationMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spearman" => Ok(Self::Spearman),
            "pearson" => Ok(Self::Pearson),
            other => Err(MathError::InvalidParameter(format!(
                "unknown correlation method {other}, valid methods are: {:?}",
                Self::VALID
            ))),
        }
    }
}

fn finite_pairs(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> (Array1<f64>, Array1<f64>) {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip();
    (Array1::from(xs), Array1::from(ys))
}

fn pearson_complete(x: &Array1<f64>, y: &Array1<f64>) -> f64 {
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }
    let mx = x.sum() / n as f64;
    let my = y.sum() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    sxy / (sxx * syy).sqrt()
}

/// Pearson correlation over finite pairs.
///
/// `NaN` with fewer than 2 pairs or when either side is constant.
#[must_use]
pub fn pearson(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let (x, y) = finite_pairs(x, y);
    pearson_complete(&x, &y)
}

/// Spearman rank correlation over finite pairs.
///
/// `NaN` with fewer than 2 pairs or when either side is constant.
#[must_use]
pub fn spearman(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let (x, y) = finite_pairs(x, y);
    let rx = rank(x.view(), true, TieBreak::Average);
    let ry = rank(y.view(), true, TieBreak::Average);
    pearson_complete(&rx, &ry)
}
