//! Outlier clipping around the cross-sectional mean.

use std::str::FromStr;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{MathError, finite_mean, finite_std, mean_abs_deviation};

/// Dispersion measure that defines an extreme value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremeMethod {
    /// Mean absolute deviation.
    #[default]
    Mad,
    /// Sample standard deviation.
    Std,
}

impl ExtremeMethod {
    /// Accepted names.
    pub const VALID: [&'static str; 2] = ["mad", "std"];

    fn dispersion(self, data: ArrayView1<'_, f64>) -> f64 {
        match self {
            Self::Mad => mean_abs_deviation(data),
            Self::Std => finite_std(data),
        }
    }
}

impl FromStr for ExtremeMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mad" => Ok(Self::Mad),
            "std" => Ok(Self::Std),
            other => Err(MathError::InvalidParameter(format!(
                "unknown extreme method {other}, valid methods are: {:?}",
                Self::VALID
            ))),
        }
    }
}

/// Clip values to `mean ± num * dispersion`.
///
/// `NaN` entries stay `NaN`. When the bounds are undefined (fewer finite
/// values than the dispersion needs) the data is returned unchanged.
///
/// # Errors
///
/// Returns `MathError::InvalidParameter` if `num` is not a positive number.
pub fn clip_extremes(
    data: ArrayView1<'_, f64>,
    num: f64,
    method: ExtremeMethod,
) -> Result<Array1<f64>, MathError> {
    if !(num.is_finite() && num > 0.0) {
        return Err(MathError::InvalidParameter(format!("num must be positive, got {num}")));
    }
    let mu = finite_mean(data);
    let spread = method.dispersion(data);
    let (lower, upper) = (mu - num * spread, mu + num * spread);
    if !(lower.is_finite() && upper.is_finite()) {
        return Ok(data.to_owned());
    }
    Ok(data.mapv(|x| if x.is_nan() { x } else { x.clamp(lower, upper) }))
}

/// Outlier clipping configuration and transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremeClipper {
    num: f64,
    method: ExtremeMethod,
}

impl ExtremeClipper {
    /// Create a new clipper.
    ///
    /// # Errors
    /// Returns `MathError::InvalidParameter` if `num` is not positive.
    pub fn new(num: f64, method: ExtremeMethod) -> Result<Self, MathError> {
        if !(num.is_finite() && num > 0.0) {
            return Err(MathError::InvalidParameter(format!("num must be positive, got {num}")));
        }
        Ok(Self { num, method })
    }

    /// Width of the band in units of dispersion.
    #[must_use]
    pub const fn num(&self) -> f64 {
        self.num
    }

    /// Dispersion measure.
    #[must_use]
    pub const fn method(&self) -> ExtremeMethod {
        self.method
    }

    /// Apply clipping to one cross-section.
    ///
    /// # Errors
    /// Returns error if clipping fails.
    pub fn apply(&self, data: ArrayView1<'_, f64>) -> Result<Array1<f64>, MathError> {
        clip_extremes(data, self.num, self.method)
    }
}

impl Default for ExtremeClipper {
    fn default() -> Self {
        Self { num: 3.0, method: ExtremeMethod::Mad }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    #[test]
    fn clips_to_mad_band() {
        let data = array![1.0, 2.0, 3.0, 4.0, 100.0];
        let mu = 22.0;
        let mad = (21.0 + 20.0 + 19.0 + 18.0 + 78.0) / 5.0;
        let result = clip_extremes(data.view(), 1.0, ExtremeMethod::Mad).unwrap();
        assert_relative_eq!(result[4], mu + mad, epsilon = 1e-12);
        assert_relative_eq!(result[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn std_band_preserves_middle() {
        let data = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = clip_extremes(data.view(), 3.0, ExtremeMethod::Std).unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn keeps_nan() {
        let data = array![1.0, f64::NAN, 3.0, 50.0];
        let result = clip_extremes(data.view(), 1.0, ExtremeMethod::Mad).unwrap();
        assert!(result[1].is_nan());
        assert!(result[3] < 50.0);
    }

    #[test]
    fn single_value_is_unchanged_under_std() {
        let data = array![7.0];
        assert_eq!(clip_extremes(data.view(), 3.0, ExtremeMethod::Std).unwrap(), data);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn invalid_num_errors(#[case] num: f64) {
        assert!(clip_extremes(array![1.0, 2.0].view(), num, ExtremeMethod::Mad).is_err());
        assert!(ExtremeClipper::new(num, ExtremeMethod::Std).is_err());
    }

    #[test]
    fn parses_names() {
        assert_eq!("std".parse::<ExtremeMethod>().unwrap(), ExtremeMethod::Std);
        assert!("iqr".parse::<ExtremeMethod>().is_err());
    }
}
