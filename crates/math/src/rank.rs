//! Cross-sectional ranking kernels.

use std::cmp::Ordering;

use ndarray::{Array1, ArrayView1};

/// How equal values share ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Equal values are ranked in order of appearance.
    #[default]
    First,
    /// Equal values all receive the mean of the ranks they span.
    Average,
}

/// Rank the non-missing entries of `values` from 1 upward.
///
/// With `ascending` the smallest value gets rank 1, otherwise the largest
/// does. `NaN` entries are left as `NaN`.
#[must_use]
pub fn rank(values: ArrayView1<'_, f64>, ascending: bool, tie: TieBreak) -> Array1<f64> {
    let mut out = Array1::from_elem(values.len(), f64::NAN);
    let mut order: Vec<usize> = (0..values.len()).filter(|&i| !values[i].is_nan()).collect();
    order.sort_by(|&a, &b| {
        let ord = values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal);
        if ascending { ord } else { ord.reverse() }
    });

    match tie {
        TieBreak::First => {
            for (pos, &i) in order.iter().enumerate() {
                out[i] = (pos + 1) as f64;
            }
        }
        TieBreak::Average => {
            let mut start = 0;
            while start < order.len() {
                let mut end = start + 1;
                while end < order.len() && values[order[end]] == values[order[start]] {
                    end += 1;
                }
                // positions start..end hold ranks start+1..=end
                let shared = (start + 1 + end) as f64 / 2.0;
                for &i in &order[start..end] {
                    out[i] = shared;
                }
                start = end;
            }
        }
    }
    out
}
