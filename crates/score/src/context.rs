//! Cap-scenario scoring from stratified IC weights.

use std::collections::{BTreeSet, HashMap};

use ndarray::{Array1, Array2, Array3, ArrayView2, Axis, s};
use rayon::prelude::*;
use segovia_math::{TieBreak, equal_width_bins, rank, rolling_mean, rolling_std};
use segovia_primitives::{CAP_COL, Date, Direction, FactorName, Panel, StratifiedIcRecord, Stratum};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ScoreError;

/// Settings for the contextual scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Factor whose stratified IC drives the scenario weights.
    pub stratum_factor: String,
    /// Rolling window (in dates) for the IC information ratio.
    pub ir_window: usize,
    /// Number of equal-width bins the cap ranks are cut into.
    pub num_bins: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { stratum_factor: "M004023".to_string(), ir_window: 12, num_bins: 9 }
    }
}

/// Per-date `factors x strata` weight matrices.
///
/// Each stratum column sums to 1 across the factors with a reference entry,
/// or is all zero when none of them has a usable information ratio on that
/// date. Cells without any reference entry stay `NaN`.
#[derive(Debug, Clone)]
pub struct DecileWeights {
    dates: Vec<Date>,
    factors: Vec<FactorName>,
    values: Array3<f64>,
}

impl DecileWeights {
    /// Build weights from stratified IC records.
    ///
    /// Dates are the union of record dates. For every (factor, stratum) the
    /// information ratio is the rolling mean over the rolling standard
    /// deviation of the IC; non-finite ratios count as zero and signs are
    /// dropped before normalizing. A (date, factor, stratum) cell with no
    /// record at all stays `NaN`, so scores relying on it are `NaN` too.
    /// Records for factors outside `factors` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `factors` is empty or `ir_window` is zero.
    pub fn from_records(
        records: &[StratifiedIcRecord],
        factors: &[FactorName],
        ir_window: usize,
    ) -> Result<Self, ScoreError> {
        if factors.is_empty() {
            return Err(ScoreError::NoFactors);
        }
        if ir_window == 0 {
            return Err(ScoreError::InvalidConfig("ir_window must be at least 1".to_string()));
        }

        let dates: Vec<Date> =
            records.iter().map(|r| r.date).collect::<BTreeSet<_>>().into_iter().collect();
        let date_pos: HashMap<Date, usize> = dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();
        let factor_pos: HashMap<&str, usize> =
            factors.iter().enumerate().map(|(j, f)| (f.as_str(), j)).collect();

        let shape = (dates.len(), factors.len(), Stratum::ALL.len());
        let mut ic = Array3::from_elem(shape, f64::NAN);
        let mut recorded = Array3::from_elem(shape, false);
        for record in records {
            let Some(&j) = factor_pos.get(record.factor.as_str()) else {
                continue;
            };
            let cell = [date_pos[&record.date], j, record.stratum.position()];
            ic[cell] = record.ic;
            recorded[cell] = true;
        }

        let mut values = Array3::zeros(ic.dim());
        for j in 0..factors.len() {
            for stratum in Stratum::ALL {
                let series = ic.slice(s![.., j, stratum.position()]);
                let mean = rolling_mean(series, ir_window);
                let std = rolling_std(series, ir_window);
                let ir = (&mean / &std).mapv(|v| if v.is_finite() { v.abs() } else { 0.0 });
                values.slice_mut(s![.., j, stratum.position()]).assign(&ir);
            }
        }
        values.zip_mut_with(&recorded, |v, &seen| {
            if !seen {
                *v = f64::NAN;
            }
        });
        for mut by_date in values.axis_iter_mut(Axis(0)) {
            for mut column in by_date.axis_iter_mut(Axis(1)) {
                let sum: f64 = column.iter().filter(|v| !v.is_nan()).sum();
                if sum > 0.0 {
                    column.mapv_inplace(|v| v / sum);
                }
            }
        }

        Ok(Self { dates, factors: factors.to_vec(), values })
    }

    /// Dates with a weight matrix.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Factor order of the matrix rows.
    #[must_use]
    pub fn factors(&self) -> &[FactorName] {
        &self.factors
    }

    /// `factors x strata` matrix for `date`; strata follow [`Stratum::ALL`].
    #[must_use]
    pub fn weights_for(&self, date: Date) -> Option<ArrayView2<'_, f64>> {
        self.dates.binary_search(&date).ok().map(|i| self.values.index_axis(Axis(0), i))
    }

    /// Weight of one (date, factor, stratum) cell; `NaN` when the reference
    /// has no entry for it.
    #[must_use]
    pub fn get(&self, date: Date, factor: &str, stratum: Stratum) -> Option<f64> {
        let j = self.factors.iter().position(|f| f.as_str() == factor)?;
        self.weights_for(date).map(|w| w[[j, stratum.position()]])
    }
}

/// Scenario shares of each security in one cross-section (`rows x strata`).
///
/// Caps are ranked (ties averaged) and the ranks cut into `num_bins`
/// equal-width bins. A security in bin `d` has large-cap share
/// `d / (num_bins + 1)` and small-cap share `1 - d / (num_bins + 1)`.
/// Missing caps give `NaN` shares.
///
/// # Errors
///
/// Returns an error if `num_bins` is zero.
pub fn cap_shares(
    cap: ndarray::ArrayView1<'_, f64>,
    num_bins: usize,
) -> Result<Array2<f64>, ScoreError> {
    let bins = equal_width_bins(rank(cap, true, TieBreak::Average).view(), num_bins)?;
    let denom = (num_bins + 1) as f64;
    let mut shares = Array2::from_elem((cap.len(), Stratum::ALL.len()), f64::NAN);
    for (i, &d) in bins.iter().enumerate() {
        if d.is_finite() {
            shares[[i, Stratum::High.position()]] = d / denom;
            shares[[i, Stratum::Low.position()]] = (denom - d) / denom;
        }
    }
    Ok(shares)
}

/// Contextual score of every panel row.
///
/// Factors are sign-adjusted by `directions` and ranked per date (ties
/// averaged). The exposure to each scenario is the rank vector times that
/// date's weight column, and the score mixes the scenario exposures by the
/// security's cap shares. Missing factor ranks and weight cells without a
/// reference entry propagate to `NaN`; so does a date without weights.
///
/// # Errors
///
/// Returns an error if the panel has no `cap` column, no factors, or the
/// weight table covers different factors.
pub fn context_score(
    panel: &Panel,
    directions: &[Direction],
    weights: &DecileWeights,
    config: &ContextConfig,
) -> Result<Array1<f64>, ScoreError> {
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
    if weights.factors() != panel.factor_names() {
        return Err(ScoreError::InvalidConfig(
            "decile weights cover different factors than the panel".to_string(),
        ));
    }
    let cap = panel.cap().ok_or_else(|| ScoreError::MissingColumn(CAP_COL.to_string()))?;
    let factors = panel.factors();

    let blocks: Vec<Result<Vec<f64>, ScoreError>> = panel
        .date_slices()
        .par_iter()
        .map(|slice| {
            let Some(w) = weights.weights_for(slice.date) else {
                debug!(date = %slice.date, "no decile weights for date");
                return Ok(vec![f64::NAN; slice.len()]);
            };
            let mut x = Array2::zeros((slice.len(), k));
            for (j, &direction) in directions.iter().enumerate() {
                let adjusted = factors.slice(s![slice.start..slice.end, j]).mapv(|v| v * direction.sign());
                x.column_mut(j).assign(&rank(adjusted.view(), true, TieBreak::Average));
            }
            let exposure = x.dot(&w);
            let shares = cap_shares(cap.slice(s![slice.start..slice.end]), config.num_bins)?;
            Ok((&exposure * &shares).sum_axis(Axis(1)).to_vec())
        })
        .collect();

    let mut scores = Array1::from_elem(panel.len(), f64::NAN);
    for (slice, block) in panel.date_slices().iter().zip(blocks) {
        scores.slice_mut(s![slice.start..slice.end]).assign(&Array1::from(block?));
    }
    Ok(scores)
}
