//! Rolling factor-weight schemes and the weighted rank score.

use ndarray::{Array1, Array2, s};
use segovia_math::{GroupLabel, assign_groups, normalize_row, rolling_mean, rolling_std};
use segovia_primitives::{FactorSeries, Panel};

use crate::{RankPanel, ScoreError};

/// Everything a weight scheme may look at.
#[derive(Debug, Clone, Copy)]
pub struct WeightInputs<'a> {
    /// Source panel.
    pub panel: &'a Panel,
    /// Ranks of the panel's factors.
    pub ranks: &'a RankPanel,
    /// Per-date IC table, when the scheme needs one.
    pub ic: Option<&'a FactorSeries>,
    /// Rolling window in dates.
    pub window: usize,
    /// Number of groups for group-based schemes.
    pub num_group: usize,
}

impl WeightInputs<'_> {
    fn ic(&self, scheme: &str) -> Result<&FactorSeries, ScoreError> {
        self.ic.ok_or_else(|| ScoreError::InvalidConfig(format!("{scheme} needs an IC table")))
    }

    fn dates(&self) -> Vec<segovia_primitives::Date> {
        self.panel.index().unique_dates().collect()
    }
}

/// Per-date allocation across factors.
pub trait WeightScheme: Send + Sync + std::fmt::Debug {
    /// Method name.
    fn name(&self) -> &'static str;

    /// Whether [`WeightInputs::ic`] must be populated.
    fn needs_ic(&self) -> bool {
        false
    }

    /// Weights for every panel date (`dates x factors`).
    ///
    /// # Errors
    /// Returns `ScoreError` if a required input is missing.
    fn weights(&self, inputs: &WeightInputs<'_>) -> Result<FactorSeries, ScoreError>;
}

/// `1/K` for every factor on every date.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualWeight;

impl WeightScheme for EqualWeight {
    fn name(&self) -> &'static str {
        "equal_weighted"
    }

    fn weights(&self, inputs: &WeightInputs<'_>) -> Result<FactorSeries, ScoreError> {
        let factors = inputs.panel.factor_names().to_vec();
        let k = factors.len();
        if k == 0 {
            return Err(ScoreError::NoFactors);
        }
        Ok(FactorSeries::filled(inputs.dates(), factors, 1.0 / k as f64)?)
    }
}

/// Rolling mean of `|IC|`, normalized per date.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcWeight;

impl WeightScheme for IcWeight {
    fn name(&self) -> &'static str {
        "ic_weighted"
    }

    fn needs_ic(&self) -> bool {
        true
    }

    fn weights(&self, inputs: &WeightInputs<'_>) -> Result<FactorSeries, ScoreError> {
        let window = inputs.window;
        let mean = inputs.ic(self.name())?.abs().map_columns(|c| rolling_mean(c, window));
        Ok(mean.map_rows(normalize_row))
    }
}

/// Rolling mean over rolling std of `|IC|`, normalized per date.
///
/// The standard deviation of the first date is undefined and taken as 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcirWeight;

impl WeightScheme for IcirWeight {
    fn name(&self) -> &'static str {
        "icir_weighted"
    }

    fn needs_ic(&self) -> bool {
        true
    }

    fn weights(&self, inputs: &WeightInputs<'_>) -> Result<FactorSeries, ScoreError> {
        let window = inputs.window;
        let ic = inputs.ic(self.name())?.abs();
        let mean = ic.map_columns(|c| rolling_mean(c, window));
        let std = ic.map_columns(|c| {
            let mut std = rolling_std(c, window);
            if let Some(first) = std.first_mut() {
                *first = 1.0;
            }
            std
        });
        let ir = mean.zip_map(&std, |m, s| {
            let ir = m / s;
            if ir.is_finite() { ir } else { f64::NAN }
        })?;
        Ok(ir.map_rows(normalize_row))
    }
}

/// Rolling mean of each factor's top-group return, normalized per date.
///
/// Unlike the IC-based schemes these weights are not guaranteed to be
/// non-negative. Normalization uses the plain (signed) sum, so a factor whose
/// top group lost money on average gets a negative weight, and the others
/// can exceed 1. A date whose rolling returns sum to zero gets `NaN` weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnWeight;

impl WeightScheme for ReturnWeight {
    fn name(&self) -> &'static str {
        "ret_weighted"
    }

    fn weights(&self, inputs: &WeightInputs<'_>) -> Result<FactorSeries, ScoreError> {
        let window = inputs.window;
        let top = top_group_returns(inputs.panel, inputs.ranks, inputs.num_group)?;
        Ok(top.map_columns(|c| rolling_mean(c, window)).map_rows(normalize_row))
    }
}

/// Mean forward return of the `Q01` group of each factor on each date.
///
/// Groups are cut from the factor's ranks, highest rank first. A date whose
/// top group has no finite return gives `NaN`.
///
/// # Errors
///
/// Returns an error if `num_group` is zero.
pub fn top_group_returns(
    panel: &Panel,
    ranks: &RankPanel,
    num_group: usize,
) -> Result<FactorSeries, ScoreError> {
    let slices = panel.date_slices();
    let k = ranks.factor_names().len();
    let ret = panel.ret();
    let mut values = Array2::from_elem((slices.len(), k), f64::NAN);

    for (i, slice) in slices.iter().enumerate() {
        let r = ret.slice(s![slice.start..slice.end]);
        for j in 0..k {
            let column = ranks.ranks().slice(s![slice.start..slice.end, j]);
            let groups = assign_groups(column, num_group, false)?;
            let (sum, n) = groups
                .iter()
                .zip(r.iter())
                .filter(|(g, v)| **g == GroupLabel::TOP && v.is_finite())
                .fold((0.0, 0usize), |(sum, n), (_, v)| (sum + v, n + 1));
            if n > 0 {
                values[[i, j]] = sum / n as f64;
            }
        }
    }

    let dates = panel.index().unique_dates().collect();
    Ok(FactorSeries::new(dates, ranks.factor_names().to_vec(), values)?)
}

/// Weighted sum of ranks, each row using its own date's weights.
///
/// Factors with a non-finite weight are skipped; a row whose date has no
/// finite weight (or no weight row at all) scores `NaN`.
///
/// # Errors
///
/// Returns an error if the weight table's factors differ from the ranks'.
pub fn score_from_weights(
    ranks: &RankPanel,
    weights: &FactorSeries,
) -> Result<Array1<f64>, ScoreError> {
    if weights.factors() != ranks.factor_names() {
        return Err(ScoreError::InvalidConfig(
            "weight table factors differ from ranked factors".to_string(),
        ));
    }
    let mut scores = Array1::from_elem(ranks.index().len(), f64::NAN);
    for slice in ranks.index().slices() {
        let Some(w) = weights.row_for(slice.date) else {
            continue;
        };
        if !w.iter().any(|v| v.is_finite()) {
            continue;
        }
        for row in slice.range() {
            scores[row] = ranks
                .ranks()
                .row(row)
                .iter()
                .zip(w.iter())
                .filter(|(_, w)| w.is_finite())
                .map(|(r, w)| r * w)
                .sum();
        }
    }
    Ok(scores)
}
