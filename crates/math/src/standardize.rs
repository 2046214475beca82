//! Cross-sectional standardization.

use std::str::FromStr;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{MathError, finite_mean, finite_std};

/// Centre used before scaling by the standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMethod {
    /// `(x - mean) / std`.
    #[default]
    Normal,
    /// `(x - cap-weighted mean) / std`.
    Cap,
}

impl ScaleMethod {
    /// Accepted names.
    pub const VALID: [&'static str; 2] = ["normal", "cap"];
}

impl FromStr for ScaleMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "cap" => Ok(Self::Cap),
            other => Err(MathError::InvalidParameter(format!(
                "unknown scale method {other}, valid methods are: {:?}",
                Self::VALID
            ))),
        }
    }
}

/// Cap-weighted mean over entries where both value and cap are finite.
///
/// Weights are `cap / sum(cap)` with the sum taken over every finite cap.
#[must_use]
pub fn cap_weighted_mean(data: ArrayView1<'_, f64>, cap: ArrayView1<'_, f64>) -> f64 {
    let total: f64 = cap.iter().filter(|c| c.is_finite()).sum();
    if total == 0.0 {
        return f64::NAN;
    }
    data.iter()
        .zip(cap.iter())
        .filter(|(x, c)| x.is_finite() && c.is_finite())
        .map(|(x, c)| x * c / total)
        .sum()
}

/// Standardize one cross-section.
///
/// A zero or undefined standard deviation yields `NaN` for every entry.
///
/// # Errors
///
/// Returns an error if `Cap` is requested without a cap series or the cap
/// series has a different length.
pub fn standardize(
    data: ArrayView1<'_, f64>,
    cap: Option<ArrayView1<'_, f64>>,
    method: ScaleMethod,
) -> Result<Array1<f64>, MathError> {
    let centre = match method {
        ScaleMethod::Normal => finite_mean(data),
        ScaleMethod::Cap => {
            let cap = cap.ok_or_else(|| {
                MathError::InvalidParameter("cap standardization needs a cap series".to_string())
            })?;
            if cap.len() != data.len() {
                return Err(MathError::DimensionMismatch { expected: data.len(), actual: cap.len() });
            }
            cap_weighted_mean(data, cap)
        }
    };
    let std = finite_std(data);
    if !(std.is_finite() && std > 0.0) {
        return Ok(Array1::from_elem(data.len(), f64::NAN));
    }
    Ok(data.mapv(|x| (x - centre) / std))
}
