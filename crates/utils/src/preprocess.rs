//! Per-date cleaning of every factor column.

use ndarray::{Array1, ArrayView1, s};
use segovia_math::{ExtremeClipper, ExtremeMethod, MathError, ScaleMethod, standardize};
use segovia_primitives::Panel;

use crate::UtilsError;

fn map_cross_sections<F>(panel: &Panel, f: F) -> Result<Panel, UtilsError>
where
    F: Fn(ArrayView1<'_, f64>, Option<ArrayView1<'_, f64>>) -> Result<Array1<f64>, MathError>,
{
    let mut factors = panel.factors().clone();
    let cap = panel.cap();
    for slice in panel.date_slices() {
        let cap_slice = cap.as_ref().map(|c| c.slice(s![slice.start..slice.end]));
        for mut column in factors.slice_mut(s![slice.start..slice.end, ..]).columns_mut() {
            let cleaned = f(column.view(), cap_slice)?;
            column.assign(&cleaned);
        }
    }
    Ok(panel.with_factor_values(factors)?)
}

/// Clip every factor to `mean ± num * dispersion` within each date.
///
/// # Errors
///
/// Returns an error if `num` is not positive.
pub fn de_extreme(panel: &Panel, num: f64, method: ExtremeMethod) -> Result<Panel, UtilsError> {
    let clipper = ExtremeClipper::new(num, method)?;
    map_cross_sections(panel, |values, _| clipper.apply(values))
}

/// Standardize every factor within each date.
///
/// # Errors
///
/// Returns an error if `ScaleMethod::Cap` is requested on a panel without a
/// `cap` column.
pub fn standardize_panel(panel: &Panel, method: ScaleMethod) -> Result<Panel, UtilsError> {
    if method == ScaleMethod::Cap && panel.cap().is_none() {
        return Err(UtilsError::MissingColumn(segovia_primitives::CAP_COL.to_string()));
    }
    map_cross_sections(panel, |values, cap| standardize(values, cap, method))
}
