//! Cross-sectional regression of returns on factor exposures.

use std::{collections::HashMap, fmt, str::FromStr};

use ndarray::{Array1, Array2, Axis, s};
use rayon::prelude::*;
use segovia_math::{add_intercept, least_squares};
use segovia_primitives::{Date, FactorName, FactorSeries, Panel, ScoredPanel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ModelError;

/// Column holding the reconstructed return.
pub const MODELED_RET_COL: &str = "modeled_ret";

/// Coefficient label of the regression constant.
pub const INTERCEPT: &str = "intercept";

/// How modeled returns are rebuilt from the per-date fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressMethod {
    /// Previous fit's coefficients applied to current exposures, plus the
    /// current residual.
    #[default]
    CommonRegress,
}

impl RegressMethod {
    /// Every method.
    pub const ALL: [Self; 1] = [Self::CommonRegress];

    /// Method name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommonRegress => "common_regress",
        }
    }
}

impl fmt::Display for RegressMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegressMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|m| m.as_str() == s).ok_or_else(|| {
            ModelError::UnsupportedMethod {
                method: s.to_string(),
                valid: Self::ALL.map(Self::as_str).join(", "),
            }
        })
    }
}

/// Configuration for [`Regressor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegressionConfig {
    /// Reconstruction method.
    pub method: RegressMethod,
}

/// Per-date OLS fits of `ret` on every factor.
#[derive(Debug, Clone)]
pub struct CrossSectionFits {
    coefficients: FactorSeries,
    residuals: Array1<f64>,
}

impl CrossSectionFits {
    /// `dates x (intercept, factors...)` coefficients; `NaN` rows for dates
    /// that could not be fitted.
    #[must_use]
    pub const fn coefficients(&self) -> &FactorSeries {
        &self.coefficients
    }

    /// Residual of every panel row; `NaN` for rows outside a fit.
    #[must_use]
    pub const fn residuals(&self) -> &Array1<f64> {
        &self.residuals
    }
}

/// Fit one OLS per date.
///
/// A row enters its date's fit when `ret` and every factor are finite. Dates
/// with fewer usable rows than coefficients are left unfitted.
///
/// # Errors
///
/// Returns an error if the panel has no factors.
pub fn fit_cross_sections(panel: &Panel) -> Result<CrossSectionFits, ModelError> {
    let k = panel.n_factors();
    if k == 0 {
        return Err(ModelError::NoFactors);
    }
    let factors = panel.factors();
    let ret = panel.ret();

    let fits: Vec<Option<(Array1<f64>, Vec<usize>, Array1<f64>)>> = panel
        .date_slices()
        .par_iter()
        .map(|slice| {
            let rows: Vec<usize> = slice
                .range()
                .filter(|&i| ret[i].is_finite() && factors.row(i).iter().all(|v| v.is_finite()))
                .collect();
            if rows.len() < k + 1 {
                debug!(date = %slice.date, rows = rows.len(), "not enough observations to fit");
                return Ok(None);
            }
            let x = add_intercept(factors.select(Axis(0), &rows).view());
            let y = ret.select(Axis(0), &rows);
            let fit = least_squares(y.view(), x.view())?;
            if fit.rank < x.ncols() {
                debug!(date = %slice.date, rank = fit.rank, "collinear factors, dependent coefficients set to 0");
            }
            Ok(Some((fit.coefficients, rows, fit.residuals)))
        })
        .collect::<Result<_, ModelError>>()?;

    let mut coefficients = Array2::from_elem((fits.len(), k + 1), f64::NAN);
    let mut residuals = Array1::from_elem(panel.len(), f64::NAN);
    for (i, fit) in fits.into_iter().enumerate() {
        let Some((beta, rows, resid)) = fit else {
            continue;
        };
        coefficients.row_mut(i).assign(&beta);
        for (row, r) in rows.into_iter().zip(resid) {
            residuals[row] = r;
        }
    }

    let labels = std::iter::once(FactorName::from(INTERCEPT))
        .chain(panel.factor_names().iter().cloned())
        .collect();
    let dates = panel.index().unique_dates().collect();
    Ok(CrossSectionFits { coefficients: FactorSeries::new(dates, labels, coefficients)?, residuals })
}

/// Cross-sectional return model.
#[derive(Debug, Clone, Default)]
pub struct Regressor {
    config: RegressionConfig,
}

impl Regressor {
    /// Create a regressor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a regressor with custom configuration.
    #[must_use]
    pub const fn with_config(config: RegressionConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &RegressionConfig {
        &self.config
    }

    /// Per-date fits.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel has no factors.
    pub fn fit(&self, panel: &Panel) -> Result<CrossSectionFits, ModelError> {
        fit_cross_sections(panel)
    }

    /// Modeled return of every row that has a prior fit, under
    /// [`MODELED_RET_COL`].
    ///
    /// Rows are kept when they entered their own date's fit and the same
    /// security entered an earlier one; all other rows are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel has no factors.
    pub fn regress(&self, panel: &Panel) -> Result<ScoredPanel, ModelError> {
        let fits = self.fit(panel)?;
        let (rows, values) = match self.config.method {
            RegressMethod::CommonRegress => common_regress(panel, &fits),
        };
        Ok(ScoredPanel::new(panel.select_rows(&rows), MODELED_RET_COL, Array1::from(values))?)
    }
}

/// `intercept[prev] + x[cur] . beta[prev] + resid[cur]` for every security,
/// where `prev` is the security's last fitted date.
fn common_regress(panel: &Panel, fits: &CrossSectionFits) -> (Vec<usize>, Vec<f64>) {
    let index = panel.index();
    let factors = panel.factors();
    let mut last_fit: HashMap<&str, Date> = HashMap::new();
    let mut rows = Vec::new();
    let mut values = Vec::new();

    for row in 0..panel.len() {
        let resid = fits.residuals[row];
        if resid.is_nan() {
            continue;
        }
        let date = index.dates()[row];
        let Some(prev) = last_fit.insert(index.symbols()[row].as_str(), date) else {
            continue;
        };
        let Some(beta) = fits.coefficients.row_for(prev) else {
            continue;
        };
        let exposure = factors.row(row).dot(&beta.slice(s![1..]));
        rows.push(row);
        values.push(beta[0] + exposure + resid);
    }
    (rows, values)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    fn d(month: u32) -> Date {
        Date::from_ymd_opt(2024, month, 1).unwrap()
    }

    /// `ret = a + b * x` exactly on each date, with date-specific a, b.
    fn linear_panel(params: &[(f64, f64)], ret_noise: &[f64]) -> Panel {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let mut dates = Vec::new();
        let mut symbols = Vec::new();
        let mut x = Vec::new();
        let mut ret = Vec::new();
        for (t, &(a, b)) in params.iter().enumerate() {
            for (i, &xi) in xs.iter().enumerate() {
                dates.push(d(t as u32 + 1));
                symbols.push(format!("S{i}").into());
                x.push(xi);
                ret.push(a + b * xi + ret_noise.get(t * xs.len() + i).copied().unwrap_or(0.0));
            }
        }
        Panel::builder(dates, symbols).factor("x", x).ret(ret).build().unwrap()
    }

    #[test]
    fn fits_recover_coefficients() {
        let panel = linear_panel(&[(0.01, 0.5), (0.02, -0.25)], &[]);
        let fits = Regressor::new().fit(&panel).unwrap();
        let c = fits.coefficients();
        assert_relative_eq!(c.get(d(1), INTERCEPT).unwrap(), 0.01, epsilon = 1e-10);
        assert_relative_eq!(c.get(d(1), "x").unwrap(), 0.5, epsilon = 1e-10);
        assert_relative_eq!(c.get(d(2), "x").unwrap(), -0.25, epsilon = 1e-10);
        assert!(fits.residuals().iter().all(|r| r.abs() < 1e-10));
    }

    #[test]
    fn modeled_return_uses_previous_fit() {
        let panel = linear_panel(&[(0.01, 0.5), (0.02, -0.25), (0.0, 1.0)], &[]);
        let modeled = Regressor::new().regress(&panel).unwrap();
        // the first date has no prior fit
        assert_eq!(modeled.values().len(), 8);
        assert!(modeled.get(d(1), "S0").is_none());
        // date 2, S3: 0.01 + 0.5 * 4 + 0
        assert_relative_eq!(modeled.get(d(2), "S3").unwrap(), 2.01, epsilon = 1e-10);
        // date 3, S0: 0.02 - 0.25 * 1 + 0
        assert_relative_eq!(modeled.get(d(3), "S0").unwrap(), -0.23, epsilon = 1e-10);
        assert_eq!(modeled.name(), MODELED_RET_COL);
    }

    #[test]
    fn later_returns_never_change_earlier_modeled_returns() {
        let params = [(0.01, 0.5), (0.02, -0.25), (0.0, 1.0), (0.03, 0.1)];
        let noise: Vec<f64> = (0..16).map(|i| ((i * 7) % 5) as f64 * 0.001).collect();
        let base = Regressor::new().regress(&linear_panel(&params, &noise)).unwrap();

        let mut shocked_noise = noise.clone();
        shocked_noise[8] += 0.5;
        let shocked = Regressor::new().regress(&linear_panel(&params, &shocked_noise)).unwrap();

        for symbol in ["S0", "S1", "S2", "S3"] {
            assert_eq!(base.get(d(2), symbol), shocked.get(d(2), symbol));
            assert_ne!(base.get(d(3), symbol), shocked.get(d(3), symbol));
        }
    }

    #[test]
    fn rows_outside_a_fit_are_dropped() {
        let dates = vec![d(1), d(1), d(1), d(2), d(2), d(2)];
        let symbols = ["A", "B", "C", "A", "B", "C"].into_iter().map(Into::into).collect();
        let panel = Panel::builder(dates, symbols)
            .factor("x", vec![1.0, 2.0, 3.0, 1.0, f64::NAN, 3.0])
            .ret(vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3])
            .build()
            .unwrap();
        let modeled = Regressor::new().regress(&panel).unwrap();
        assert!(modeled.get(d(2), "A").is_some());
        assert!(modeled.get(d(2), "B").is_none());
    }

    #[test]
    fn thin_dates_are_not_fitted() {
        let panel = Panel::builder(vec![d(1)], vec!["A".into()])
            .factor("x", vec![1.0])
            .ret(vec![0.1])
            .build()
            .unwrap();
        let fits = fit_cross_sections(&panel).unwrap();
        assert!(fits.coefficients().values().iter().all(|v| v.is_nan()));
    }

    #[rstest]
    #[case("common_regress", true)]
    #[case("ridge", false)]
    fn parses_method_names(#[case] name: &str, #[case] ok: bool) {
        let parsed = name.parse::<RegressMethod>();
        assert_eq!(parsed.is_ok(), ok);
        if let Err(err) = parsed {
            assert!(err.to_string().contains("valid methods are: common_regress"));
        }
    }
}
