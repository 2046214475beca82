//! Moments over the finite entries of a cross-section.

use ndarray::ArrayView1;

/// Mean of the finite entries, `NaN` if there are none.
#[must_use]
pub fn finite_mean(data: ArrayView1<'_, f64>) -> f64 {
    let (sum, n) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Sample standard deviation (`ddof = 1`) of the finite entries.
#[must_use]
pub fn finite_std(data: ArrayView1<'_, f64>) -> f64 {
    let mean = finite_mean(data);
    let (ss, n) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + (v - mean).powi(2), n + 1));
    if n < 2 { f64::NAN } else { (ss / (n - 1) as f64).sqrt() }
}

/// Mean absolute deviation around the mean of the finite entries.
#[must_use]
pub fn mean_abs_deviation(data: ArrayView1<'_, f64>) -> f64 {
    let mean = finite_mean(data);
    let (sum, n) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + (v - mean).abs(), n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}
