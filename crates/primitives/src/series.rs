//! Date-indexed factor tables (IC, weights, top-group returns).

use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};
use polars::prelude::*;

use crate::{DATE_COL, Date, FactorName, PanelError};

/// Dense `dates x factors` table of per-date statistics.
///
/// Dates are strictly increasing; rows are looked up by date, never by
/// position, when two tables are combined.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorSeries {
    dates: Vec<Date>,
    factors: Vec<FactorName>,
    values: Array2<f64>,
}

impl FactorSeries {
    /// Create a new table.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape does not match the labels or the dates
    /// are not strictly increasing.
    pub fn new(
        dates: Vec<Date>,
        factors: Vec<FactorName>,
        values: Array2<f64>,
    ) -> Result<Self, PanelError> {
        if values.nrows() != dates.len() {
            return Err(PanelError::LengthMismatch {
                column: DATE_COL.to_string(),
                expected: dates.len(),
                actual: values.nrows(),
            });
        }
        if values.ncols() != factors.len() {
            return Err(PanelError::LengthMismatch {
                column: "factors".to_string(),
                expected: factors.len(),
                actual: values.ncols(),
            });
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PanelError::UnsortedDates);
        }
        Ok(Self { dates, factors, values })
    }

    /// Table with every cell set to `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dates are not strictly increasing.
    pub fn filled(
        dates: Vec<Date>,
        factors: Vec<FactorName>,
        value: f64,
    ) -> Result<Self, PanelError> {
        let values = Array2::from_elem((dates.len(), factors.len()), value);
        Self::new(dates, factors, values)
    }

    /// Row dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Column labels.
    #[must_use]
    pub fn factors(&self) -> &[FactorName] {
        &self.factors
    }

    /// The underlying matrix.
    #[must_use]
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of dates.
    #[must_use]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Row for `date`, if present.
    #[must_use]
    pub fn row_for(&self, date: Date) -> Option<ArrayView1<'_, f64>> {
        self.dates.binary_search(&date).ok().map(|i| self.values.row(i))
    }

    /// Column for `factor`, if present.
    #[must_use]
    pub fn column(&self, factor: &str) -> Option<ArrayView1<'_, f64>> {
        self.factors.iter().position(|f| f.as_str() == factor).map(|j| self.values.column(j))
    }

    /// Value at (`date`, `factor`).
    #[must_use]
    pub fn get(&self, date: Date, factor: &str) -> Option<f64> {
        let j = self.factors.iter().position(|f| f.as_str() == factor)?;
        self.row_for(date).map(|row| row[j])
    }

    /// Element-wise absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        self.with_values(self.values.mapv(f64::abs))
    }

    /// Apply `f` to every factor column (a series over dates).
    #[must_use]
    pub fn map_columns<F>(&self, f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
    {
        self.map_lanes(Axis(0), f)
    }

    /// Apply `f` to every date row (a cross-section over factors).
    #[must_use]
    pub fn map_rows<F>(&self, f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
    {
        self.map_lanes(Axis(1), f)
    }

    /// Combine two tables with identical labels cell by cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the dates or factors differ.
    pub fn zip_map<F>(&self, other: &Self, f: F) -> Result<Self, PanelError>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.dates != other.dates || self.factors != other.factors {
            return Err(PanelError::InvalidValue(
                "factor tables have different labels".to_string(),
            ));
        }
        let values = Zip::from(&self.values).and(&other.values).map_collect(|&a, &b| f(a, b));
        Ok(self.with_values(values))
    }

    /// Convert to a frame with a `date` column and one column per factor.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects a column.
    pub fn to_frame(&self) -> Result<DataFrame, PanelError> {
        let mut columns = vec![Column::new(DATE_COL.into(), self.dates.clone())];
        for (name, values) in self.factors.iter().zip(self.values.columns()) {
            columns.push(Column::new(name.as_str().into(), values.to_vec()));
        }
        Ok(DataFrame::new(columns)?)
    }

    fn map_lanes<F>(&self, axis: Axis, f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
    {
        let mut values = self.values.clone();
        for (mut out, lane) in values.lanes_mut(axis).into_iter().zip(self.values.lanes(axis)) {
            out.assign(&f(lane));
        }
        self.with_values(values)
    }

    fn with_values(&self, values: Array2<f64>) -> Self {
        Self { dates: self.dates.clone(), factors: self.factors.clone(), values }
    }
}
