//! Trailing-window statistics over a date series.
//!
//! Windows cover the last `window` positions; `NaN` entries are skipped and
//! one finite observation is enough for a value.

use ndarray::{Array1, ArrayView1};

fn rolling<F>(values: ArrayView1<'_, f64>, window: usize, stat: F) -> Array1<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let window = window.max(1);
    let mut buf = Vec::with_capacity(window);
    Array1::from_iter((0..values.len()).map(|i| {
        buf.clear();
        let start = (i + 1).saturating_sub(window);
        buf.extend(values.slice(ndarray::s![start..=i]).iter().copied().filter(|v| !v.is_nan()));
        if buf.is_empty() { f64::NAN } else { stat(&buf) }
    }))
}

/// Trailing mean.
#[must_use]
pub fn rolling_mean(values: ArrayView1<'_, f64>, window: usize) -> Array1<f64> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Trailing sample standard deviation (`ddof = 1`); `NaN` with one observation.
#[must_use]
pub fn rolling_std(values: ArrayView1<'_, f64>, window: usize) -> Array1<f64> {
    rolling(values, window, |w| {
        let n = w.len();
        if n < 2 {
            return f64::NAN;
        }
        let mean = w.iter().sum::<f64>() / n as f64;
        (w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn mean_uses_partial_windows() {
        let values = array![1.0, 2.0, 3.0, 4.0];
        let mean = rolling_mean(values.view(), 2);
        assert_eq!(mean.to_vec(), vec![1.0, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn std_first_value_is_nan() {
        let values = array![1.0, 3.0, 5.0];
        let std = rolling_std(values.view(), 12);
        assert!(std[0].is_nan());
        assert_relative_eq!(std[1], 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(std[2], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn nan_entries_are_skipped() {
        let values = array![f64::NAN, 2.0, f64::NAN, 4.0];
        let mean = rolling_mean(values.view(), 3);
        assert!(mean[0].is_nan());
        assert_eq!(mean[1], 2.0);
        assert_eq!(mean[2], 2.0);
        assert_eq!(mean[3], 3.0);
    }
}
