//! Per-date information coefficients.

use ndarray::{Array2, s};
use rayon::prelude::*;
use segovia_math::CorrelationMethod;
use segovia_primitives::{FactorSeries, Panel};

use crate::ScoreError;

/// Correlation of every factor with `ret` on every panel date.
///
/// Only pairs where both values are finite count; fewer than two pairs (or a
/// constant side) gives `NaN`. Every panel date gets a row.
///
/// # Errors
///
/// Returns an error if the panel has no factors.
pub fn compute_ic(panel: &Panel, method: CorrelationMethod) -> Result<FactorSeries, ScoreError> {
    let k = panel.n_factors();
    if k == 0 {
        return Err(ScoreError::NoFactors);
    }
    let factors = panel.factors();
    let ret = panel.ret();

    let rows: Vec<Vec<f64>> = panel
        .date_slices()
        .par_iter()
        .map(|slice| {
            let r = ret.slice(s![slice.start..slice.end]);
            (0..k)
                .map(|j| method.correlate(factors.slice(s![slice.start..slice.end, j]), r))
                .collect()
        })
        .collect();

    let mut values = Array2::from_elem((rows.len(), k), f64::NAN);
    for (i, row) in rows.into_iter().enumerate() {
        for (j, v) in row.into_iter().enumerate() {
            values[[i, j]] = v;
        }
    }
    let dates = panel.index().unique_dates().collect();
    Ok(FactorSeries::new(dates, panel.factor_names().to_vec(), values)?)
}
