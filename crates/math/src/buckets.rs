//! Splitting a cross-section into ordered groups and equal-width bins.

use std::cmp::Ordering;

use derive_more::Display;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::MathError;

/// One-based group label, displayed as `Q01`, `Q02`, ...
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[display("Q{_0:02}")]
pub struct GroupLabel(pub usize);

impl GroupLabel {
    /// The best-ranked group.
    pub const TOP: Self = Self(1);
}

/// Assign each entry to one of `num_group` groups by rank.
///
/// Entries are ranked in order of appearance among equals, with `NaN` after
/// every finite value. The first `N % num_group` groups hold one more entry
/// than the rest. With `ascending = false` the largest value lands in `Q01`.
///
/// # Errors
///
/// Returns `MathError::InvalidParameter` if `num_group` is zero.
pub fn assign_groups(
    values: ArrayView1<'_, f64>,
    num_group: usize,
    ascending: bool,
) -> Result<Vec<GroupLabel>, MathError> {
    if num_group == 0 {
        return Err(MathError::InvalidParameter("num_group must be at least 1".to_string()));
    }
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| match (values[a].is_nan(), values[b].is_nan()) {
        (false, false) => {
            let ord = values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal);
            if ascending { ord } else { ord.reverse() }
        }
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    });

    let base = n / num_group;
    let extra = n % num_group;
    let mut labels = vec![GroupLabel::TOP; n];
    let mut pos = 0;
    for group in 0..num_group {
        let size = base + usize::from(group < extra);
        for &i in &order[pos..pos + size] {
            labels[i] = GroupLabel(group + 1);
        }
        pos += size;
    }
    Ok(labels)
}

/// Bin finite values into `bins` equal-width intervals over their range.
///
/// Intervals are closed on the right and the lowest edge is widened so the
/// minimum falls in bin 1. A constant cross-section is centred on a widened
/// range. Returns the bin number (`1..=bins`) or `NaN` for missing values.
///
/// # Errors
///
/// Returns `MathError::InvalidParameter` if `bins` is zero.
pub fn equal_width_bins(values: ArrayView1<'_, f64>, bins: usize) -> Result<Array1<f64>, MathError> {
    if bins == 0 {
        return Err(MathError::InvalidParameter("bins must be at least 1".to_string()));
    }
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (mut lo, mut hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        return Ok(Array1::from_elem(values.len(), f64::NAN));
    }

    let widened;
    if lo == hi {
        lo -= if lo == 0.0 { 0.001 } else { 0.001 * lo.abs() };
        hi += if hi == 0.0 { 0.001 } else { 0.001 * hi.abs() };
        widened = false;
    } else {
        widened = true;
    }
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    edges[bins] = hi;
    if widened {
        edges[0] -= 0.001 * (hi - lo);
    }

    Ok(values.mapv(|v| {
        if !v.is_finite() {
            return f64::NAN;
        }
        let bin = edges[1..].iter().position(|&edge| v <= edge).map_or(bins, |k| k + 1);
        bin as f64
    }))
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    fn sizes(labels: &[GroupLabel], k: usize) -> Vec<usize> {
        (1..=k).map(|g| labels.iter().filter(|l| l.0 == g).count()).collect()
    }

    #[rstest]
    #[case(10, 3, vec![4, 3, 3])]
    #[case(7, 5, vec![2, 2, 1, 1, 1])]
    #[case(5, 5, vec![1, 1, 1, 1, 1])]
    #[case(3, 5, vec![1, 1, 1, 0, 0])]
    fn group_sizes_are_balanced(#[case] n: usize, #[case] k: usize, #[case] expected: Vec<usize>) {
        let values = Array1::from_iter((0..n).map(|i| i as f64));
        let labels = assign_groups(values.view(), k, false).unwrap();
        assert_eq!(sizes(&labels, k), expected);
    }

    #[test]
    fn descending_puts_largest_first() {
        let values = array![1.0, 5.0, 3.0, 4.0];
        let labels = assign_groups(values.view(), 2, false).unwrap();
        assert_eq!(labels[1], GroupLabel::TOP);
        assert_eq!(labels[3], GroupLabel::TOP);
        assert_eq!(labels[0], GroupLabel(2));
    }

    #[test]
    fn missing_values_sink_to_last_group() {
        let values = array![f64::NAN, 1.0, 2.0];
        let labels = assign_groups(values.view(), 3, true).unwrap();
        assert_eq!(labels, vec![GroupLabel(3), GroupLabel(1), GroupLabel(2)]);
    }

    #[test]
    fn label_display() {
        assert_eq!(GroupLabel(1).to_string(), "Q01");
        assert_eq!(GroupLabel(12).to_string(), "Q12");
        assert!(assign_groups(array![1.0].view(), 0, true).is_err());
    }

    #[test]
    fn equal_width_bins_cover_range() {
        let ranks = Array1::from_iter((1..=10).map(f64::from));
        let bins = equal_width_bins(ranks.view(), 9).unwrap();
        assert_eq!(bins[0], 1.0);
        assert_eq!(bins[9], 9.0);
        assert_eq!(bins[1], 1.0);
        assert_eq!(bins[2], 2.0);
    }

    #[test]
    fn constant_values_fall_in_middle_bin() {
        let bins = equal_width_bins(array![3.0, 3.0, f64::NAN].view(), 9).unwrap();
        assert_eq!(bins[0], 5.0);
        assert!(bins[2].is_nan());
    }

    #[test]
    fn all_missing_is_nan() {
        let bins = equal_width_bins(array![f64::NAN, f64::NAN].view(), 9).unwrap();
        assert!(bins.iter().all(|v| v.is_nan()));
    }
}
