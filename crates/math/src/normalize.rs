//! Per-date normalization of factor allocations.

use ndarray::{Array1, ArrayView1};

/// Divide each finite entry by the sum of the finite entries.
///
/// When no entry is finite or the sum is zero the whole row is `NaN`.
/// Non-finite entries stay `NaN`.
#[must_use]
pub fn normalize_row(row: ArrayView1<'_, f64>) -> Array1<f64> {
    let (sum, count) = row
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 || sum == 0.0 || !sum.is_finite() {
        return Array1::from_elem(row.len(), f64::NAN);
    }
    row.mapv(|v| if v.is_finite() { v / sum } else { f64::NAN })
}
