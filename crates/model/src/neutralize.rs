//! Column-wise neutralization of factor exposures.

use std::{collections::BTreeMap, sync::Arc};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use polars::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use segovia_math::{MathError, add_intercept, least_squares};
use segovia_primitives::{
    DATE_COL, Date, Panel, dates_from_column, floats_from_column, is_reserved,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ModelError;

/// Configuration for [`Neutralizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeutralizeConfig {
    /// Regressors every target is neutralized against (e.g. industry
    /// dummies). Empty means each column is regressed on all the others.
    pub explanatory: Vec<String>,
    /// Size of the worker pool fitting target columns.
    pub max_workers: usize,
}

impl Default for NeutralizeConfig {
    fn default() -> Self {
        Self { explanatory: Vec::new(), max_workers: 6 }
    }
}

/// Which columns a target is regressed on.
#[derive(Debug)]
enum Regressors {
    Fixed(Vec<usize>),
    AllOthers(usize),
}

#[derive(Debug)]
struct Plan {
    targets: Vec<usize>,
    regressors: Regressors,
}

impl Plan {
    fn regressors_for(&self, target: usize) -> Vec<usize> {
        match &self.regressors {
            Regressors::Fixed(columns) => columns.clone(),
            Regressors::AllOthers(n) => (0..*n).filter(|&j| j != target).collect(),
        }
    }
}

/// Replaces factor columns by their residuals against explanatory columns.
///
/// Every target column gets its own OLS (with intercept) over the rows where
/// it is present; missing regressor values on those rows count as 0. Rows
/// where the target is missing stay missing, an all-missing target passes
/// through, and a target whose fit fails keeps its original values.
/// Reserved columns are never touched.
#[derive(Debug, Clone)]
pub struct Neutralizer {
    config: NeutralizeConfig,
    pool: Arc<ThreadPool>,
}

impl Neutralizer {
    /// Create a neutralizer with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be started.
    pub fn new() -> Result<Self, ModelError> {
        Self::with_config(NeutralizeConfig::default())
    }

    /// Create a neutralizer with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_workers` is zero or the pool cannot be started.
    pub fn with_config(config: NeutralizeConfig) -> Result<Self, ModelError> {
        if config.max_workers == 0 {
            return Err(ModelError::InvalidConfig("max_workers must be at least 1".to_string()));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .thread_name(|i| format!("neutralize-{i}"))
            .build()?;
        Ok(Self { config, pool: Arc::new(pool) })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &NeutralizeConfig {
        &self.config
    }

    /// Neutralize one cross-section held in a frame.
    ///
    /// Numeric, non-reserved columns take part; other columns are copied.
    ///
    /// # Errors
    ///
    /// Returns an error if an explanatory column is missing or polars fails.
    pub fn neutralize(&self, df: &DataFrame) -> Result<DataFrame, ModelError> {
        let (names, data) = numeric_block(df)?;
        let plan = self.plan(&names)?;
        let out = self.residualize_block(&names, data.view(), &plan);
        replace_columns(df, &names, &plan.targets, &out)
    }

    /// Neutralize every date's cross-section of a frame independently.
    ///
    /// Row order is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame has no `date` column, an explanatory
    /// column is missing or polars fails.
    pub fn neutralize_by_date(&self, df: &DataFrame) -> Result<DataFrame, ModelError> {
        let date_column =
            df.column(DATE_COL).map_err(|_| ModelError::MissingColumn(DATE_COL.to_string()))?;
        let mut by_date: BTreeMap<Date, Vec<usize>> = BTreeMap::new();
        for (row, date) in dates_from_column(date_column)?.into_iter().enumerate() {
            by_date.entry(date).or_default().push(row);
        }

        let (names, data) = numeric_block(df)?;
        let plan = self.plan(&names)?;
        let mut out = data.clone();
        for rows in by_date.values() {
            let block = self.residualize_block(&names, data.select(Axis(0), rows).view(), &plan);
            for (i, &row) in rows.iter().enumerate() {
                out.row_mut(row).assign(&block.row(i));
            }
        }
        replace_columns(df, &names, &plan.targets, &out)
    }

    /// Neutralize the factor columns of a panel, date by date.
    ///
    /// Explanatory names refer to factor columns (e.g. industry dummies
    /// appended to the panel).
    ///
    /// # Errors
    ///
    /// Returns an error if an explanatory column is not a factor of the panel.
    pub fn neutralize_panel(&self, panel: &Panel) -> Result<Panel, ModelError> {
        let names: Vec<String> = panel.factor_names().iter().map(|f| f.to_string()).collect();
        let plan = self.plan(&names)?;
        let factors = panel.factors();
        let mut out = factors.clone();
        for slice in panel.date_slices() {
            let rows: Vec<usize> = slice.range().collect();
            let block = self.residualize_block(&names, factors.select(Axis(0), &rows).view(), &plan);
            out.slice_mut(ndarray::s![slice.start..slice.end, ..]).assign(&block);
        }
        Ok(panel.with_factor_values(out)?)
    }

    fn plan(&self, names: &[String]) -> Result<Plan, ModelError> {
        if self.config.explanatory.is_empty() {
            return Ok(Plan {
                targets: (0..names.len()).collect(),
                regressors: Regressors::AllOthers(names.len()),
            });
        }
        let explanatory = self
            .config
            .explanatory
            .iter()
            .map(|name| {
                names
                    .iter()
                    .position(|n| n == name)
                    .ok_or_else(|| ModelError::MissingColumn(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let targets = (0..names.len()).filter(|j| !explanatory.contains(j)).collect();
        Ok(Plan { targets, regressors: Regressors::Fixed(explanatory) })
    }

    fn residualize_block(
        &self,
        names: &[String],
        data: ArrayView2<'_, f64>,
        plan: &Plan,
    ) -> Array2<f64> {
        let results: Vec<(usize, Array1<f64>)> = self.pool.install(|| {
            plan.targets
                .par_iter()
                .map(|&target| {
                    let column = data.column(target);
                    let residuals = residualize(column, data, &plan.regressors_for(target))
                        .unwrap_or_else(|err| {
                            warn!(column = %names[target], %err, "neutralization failed, keeping original values");
                            column.to_owned()
                        });
                    (target, residuals)
                })
                .collect()
        });

        let mut out = data.to_owned();
        for (target, residuals) in results {
            out.column_mut(target).assign(&residuals);
        }
        out
    }
}

/// Residuals of `target` on `regressors` (plus intercept), `NaN` where the
/// target is missing.
fn residualize(
    target: ArrayView1<'_, f64>,
    data: ArrayView2<'_, f64>,
    regressors: &[usize],
) -> Result<Array1<f64>, MathError> {
    let rows: Vec<usize> = (0..target.len()).filter(|&i| !target[i].is_nan()).collect();
    if rows.is_empty() {
        return Ok(target.to_owned());
    }
    let x = Array2::from_shape_fn((rows.len(), regressors.len()), |(i, j)| {
        let v = data[[rows[i], regressors[j]]];
        if v.is_nan() { 0.0 } else { v }
    });
    let fit = least_squares(target.select(Axis(0), &rows).view(), add_intercept(x.view()).view())?;

    let mut out = Array1::from_elem(target.len(), f64::NAN);
    for (&row, r) in rows.iter().zip(fit.residuals) {
        out[row] = r;
    }
    Ok(out)
}

/// Numeric, non-reserved columns of a frame as a `rows x columns` matrix.
fn numeric_block(df: &DataFrame) -> Result<(Vec<String>, Array2<f64>), ModelError> {
    let columns: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|c| !is_reserved(c.name().as_str()))
        .filter(|c| {
            let dtype = c.dtype();
            dtype.is_float() || dtype.is_integer() || matches!(dtype, DataType::Boolean)
        })
        .collect();

    let mut data = Array2::from_elem((df.height(), columns.len()), f64::NAN);
    for (j, column) in columns.iter().enumerate() {
        data.column_mut(j).assign(&Array1::from(floats_from_column(column)?));
    }
    let names = columns.iter().map(|c| c.name().to_string()).collect();
    Ok((names, data))
}

fn replace_columns(
    df: &DataFrame,
    names: &[String],
    targets: &[usize],
    data: &Array2<f64>,
) -> Result<DataFrame, ModelError> {
    let mut out = df.clone();
    for &j in targets {
        out.with_column(Column::new(names[j].as_str().into(), data.column(j).to_vec()))?;
    }
    Ok(out)
}
