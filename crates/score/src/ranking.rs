//! Per-date factor ranks.

use ndarray::{Array2, ArrayView1, s};
use polars::prelude::*;
use rayon::prelude::*;
use segovia_math::{TieBreak, rank};
use segovia_primitives::{
    DATE_COL, Direction, FactorName, Panel, PanelError, PanelIndex, SYMBOL_COL,
};

use crate::ScoreError;

/// Ranks of every factor, aligned row for row with the panel they came from.
///
/// Within a date, valid values of a factor hold ranks `M+1..=N` (the best
/// security holds `N`) and the `M` missing values hold `0`.
#[derive(Debug, Clone)]
pub struct RankPanel {
    index: PanelIndex,
    factor_names: Vec<FactorName>,
    ranks: Array2<f64>,
}

impl RankPanel {
    /// Row index shared with the source panel.
    #[must_use]
    pub const fn index(&self) -> &PanelIndex {
        &self.index
    }

    /// Factor names in column order.
    #[must_use]
    pub fn factor_names(&self) -> &[FactorName] {
        &self.factor_names
    }

    /// Rank matrix (rows x factors).
    #[must_use]
    pub const fn ranks(&self) -> &Array2<f64> {
        &self.ranks
    }

    /// Ranks of one factor.
    #[must_use]
    pub fn factor(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.factor_names.iter().position(|f| f.as_str() == name).map(|j| self.ranks.column(j))
    }

    /// Convert to a frame with `date`, `symbol` and one rank column per factor.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects a column.
    pub fn to_frame(&self) -> Result<DataFrame, PanelError> {
        let mut columns = vec![
            Column::new(DATE_COL.into(), self.index.dates().to_vec()),
            Column::new(
                SYMBOL_COL.into(),
                self.index.symbols().iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            ),
        ];
        for (name, values) in self.factor_names.iter().zip(self.ranks.columns()) {
            columns.push(Column::new(name.as_str().into(), values.to_vec()));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Rank one cross-section so that the best value gets `N`, missing values `0`.
fn rank_cross_section(values: ArrayView1<'_, f64>, direction: Direction) -> Vec<f64> {
    let missing = values.iter().filter(|v| v.is_nan()).count() as f64;
    rank(values, direction.ranks_ascending(), TieBreak::First)
        .iter()
        .map(|&r| if r.is_nan() { 0.0 } else { r + missing })
        .collect()
}

/// Rank every factor within every date.
///
/// `directions` holds one entry per factor, in panel column order. The input
/// panel is not modified.
///
/// # Errors
///
/// Returns an error if the panel has no factors or the direction count
/// differs from the factor count.
pub fn rank_factors(panel: &Panel, directions: &[Direction]) -> Result<RankPanel, ScoreError> {
    let k = panel.n_factors();
    if k == 0 {
        return Err(ScoreError::NoFactors);
    }
    if directions.len() != k {
        return Err(ScoreError::InvalidConfig(format!(
            "{} directions given for {k} factors",
            directions.len()
        )));
    }

    let factors = panel.factors();
    let blocks: Vec<Vec<Vec<f64>>> = panel
        .date_slices()
        .par_iter()
        .map(|slice| {
            directions
                .iter()
                .enumerate()
                .map(|(j, &direction)| {
                    rank_cross_section(factors.slice(s![slice.start..slice.end, j]), direction)
                })
                .collect()
        })
        .collect();

    let mut ranks = Array2::zeros(factors.dim());
    for (slice, block) in panel.date_slices().iter().zip(blocks) {
        for (j, column) in block.into_iter().enumerate() {
            for (offset, value) in column.into_iter().enumerate() {
                ranks[[slice.start + offset, j]] = value;
            }
        }
    }

    Ok(RankPanel {
        index: panel.index().clone(),
        factor_names: panel.factor_names().to_vec(),
        ranks,
    })
}
