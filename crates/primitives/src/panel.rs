//! The (date, symbol) indexed panel that every scoring operation consumes.

use std::ops::Range;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use polars::prelude::*;

use crate::{Date, FactorName, PanelError, Symbol};

/// Date column name.
pub const DATE_COL: &str = "date";
/// Security identifier column name.
pub const SYMBOL_COL: &str = "symbol";
/// Forward return column name.
pub const RET_COL: &str = "ret";
/// Market capitalization column name.
pub const CAP_COL: &str = "cap";
/// Benchmark return column name.
pub const BENCHMARK_COL: &str = "benchmark_returns";
/// Group label column name. Computed, never read as input.
pub const GROUP_COL: &str = "group";

/// Column names that are never treated as factors.
pub const RESERVED_COLUMNS: [&str; 6] =
    [DATE_COL, SYMBOL_COL, RET_COL, CAP_COL, BENCHMARK_COL, GROUP_COL];

/// Days between 0001-01-01 (CE day 1) and the unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Whether `name` is a reserved (non-factor) column.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_COLUMNS.contains(&name)
}

/// Contiguous block of rows sharing one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSlice {
    /// The date of every row in the block.
    pub date: Date,
    /// First row (inclusive).
    pub start: usize,
    /// Last row (exclusive).
    pub end: usize,
}

impl DateSlice {
    /// Row range of this cross-section.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of securities on this date.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the cross-section is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Two-level (date, symbol) row index.
///
/// Rows are sorted by date then symbol, and every pair is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelIndex {
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    slices: Vec<DateSlice>,
}

impl PanelIndex {
    /// Build an index from rows already sorted by (date, symbol).
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ, the rows are out of order, or a
    /// (date, symbol) pair repeats.
    pub fn from_sorted(dates: Vec<Date>, symbols: Vec<Symbol>) -> Result<Self, PanelError> {
        if dates.len() != symbols.len() {
            return Err(PanelError::LengthMismatch {
                column: SYMBOL_COL.to_string(),
                expected: dates.len(),
                actual: symbols.len(),
            });
        }
        for i in 1..dates.len() {
            let prev = (&dates[i - 1], &symbols[i - 1]);
            let cur = (&dates[i], &symbols[i]);
            if prev == cur {
                return Err(PanelError::DuplicateIndex {
                    date: dates[i].to_string(),
                    symbol: symbols[i].to_string(),
                });
            }
            if prev > cur {
                return Err(PanelError::UnsortedDates);
            }
        }
        Ok(Self::from_sorted_unchecked(dates, symbols))
    }

    fn from_sorted_unchecked(dates: Vec<Date>, symbols: Vec<Symbol>) -> Self {
        let mut slices: Vec<DateSlice> = Vec::new();
        for (i, date) in dates.iter().enumerate() {
            match slices.last_mut() {
                Some(last) if last.date == *date => last.end = i + 1,
                _ => slices.push(DateSlice { date: *date, start: i, end: i + 1 }),
            }
        }
        Self { dates, symbols, slices }
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the index has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Date of every row.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Symbol of every row.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// One slice per distinct date, in date order.
    #[must_use]
    pub fn slices(&self) -> &[DateSlice] {
        &self.slices
    }

    /// Distinct dates in order.
    pub fn unique_dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.slices.iter().map(|s| s.date)
    }

    /// Cross-section for `date`, if present.
    #[must_use]
    pub fn slice_for(&self, date: Date) -> Option<DateSlice> {
        self.slices.binary_search_by(|s| s.date.cmp(&date)).ok().map(|i| self.slices[i])
    }

    /// Row position of a (date, symbol) pair.
    #[must_use]
    pub fn position(&self, date: Date, symbol: &str) -> Option<usize> {
        let slice = self.slice_for(date)?;
        self.symbols[slice.range()]
            .binary_search_by(|s| s.as_str().cmp(symbol))
            .ok()
            .map(|offset| slice.start + offset)
    }

    fn select(&self, rows: &[usize]) -> Self {
        let dates = rows.iter().map(|&i| self.dates[i]).collect();
        let symbols = rows.iter().map(|&i| self.symbols[i].clone()).collect();
        Self::from_sorted_unchecked(dates, symbols)
    }
}

/// Typed factor panel keyed by (date, symbol).
///
/// Factor columns are every non-reserved column, held in name order as a
/// `rows x factors` matrix. Missing values are `NaN`.
#[derive(Debug, Clone)]
pub struct Panel {
    index: PanelIndex,
    factor_names: Vec<FactorName>,
    factors: Array2<f64>,
    ret: Array1<f64>,
    cap: Option<Array1<f64>>,
    benchmark: Option<Array1<f64>>,
    group: Option<Vec<String>>,
}

impl Panel {
    /// Start building a panel from per-row dates and symbols in any order.
    #[must_use]
    pub fn builder(dates: Vec<Date>, symbols: Vec<Symbol>) -> PanelBuilder {
        PanelBuilder::new(dates, symbols)
    }

    /// Build a panel from a long-format frame.
    ///
    /// The frame must carry `date`, `symbol` and `ret`; `cap` and
    /// `benchmark_returns` are optional and every other column is a factor.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is missing, a factor column is
    /// not numeric, or the index is invalid.
    pub fn from_frame(df: &DataFrame) -> Result<Self, PanelError> {
        let dates = dates_from_column(required_column(df, DATE_COL)?)?;
        let symbols = symbols_from_column(required_column(df, SYMBOL_COL)?)?;
        let mut builder = PanelBuilder::new(dates, symbols)
            .ret(floats_from_column(required_column(df, RET_COL)?)?);

        if let Ok(cap) = df.column(CAP_COL) {
            builder = builder.cap(floats_from_column(cap)?);
        }
        if let Ok(benchmark) = df.column(BENCHMARK_COL) {
            builder = builder.benchmark(floats_from_column(benchmark)?);
        }

        for column in df.get_columns() {
            let name = column.name().as_str();
            if is_reserved(name) {
                continue;
            }
            let dtype = column.dtype();
            if !(dtype.is_float() || dtype.is_integer() || matches!(dtype, DataType::Boolean)) {
                return Err(PanelError::NonNumericColumn {
                    name: name.to_string(),
                    dtype: dtype.to_string(),
                });
            }
            builder = builder.factor(name, floats_from_column(column)?);
        }

        builder.build()
    }

    /// The row index.
    #[must_use]
    pub const fn index(&self) -> &PanelIndex {
        &self.index
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the panel has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Per-date cross-sections.
    #[must_use]
    pub fn date_slices(&self) -> &[DateSlice] {
        self.index.slices()
    }

    /// Factor names in column order.
    #[must_use]
    pub fn factor_names(&self) -> &[FactorName] {
        &self.factor_names
    }

    /// Number of factor columns.
    #[must_use]
    pub fn n_factors(&self) -> usize {
        self.factor_names.len()
    }

    /// Column position of a factor.
    #[must_use]
    pub fn factor_position(&self, name: &str) -> Option<usize> {
        self.factor_names.binary_search_by(|f| f.as_str().cmp(name)).ok()
    }

    /// Values of one factor column.
    #[must_use]
    pub fn factor(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.factor_position(name).map(|j| self.factors.column(j))
    }

    /// Any numeric column by name: a factor, `ret`, `cap` or `benchmark_returns`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        match name {
            RET_COL => Some(self.ret()),
            CAP_COL => self.cap(),
            BENCHMARK_COL => self.benchmark(),
            _ => self.factor(name),
        }
    }

    /// Factor matrix (rows x factors).
    #[must_use]
    pub const fn factors(&self) -> &Array2<f64> {
        &self.factors
    }

    /// Forward returns.
    #[must_use]
    pub fn ret(&self) -> ArrayView1<'_, f64> {
        self.ret.view()
    }

    /// Market capitalization, if present.
    #[must_use]
    pub fn cap(&self) -> Option<ArrayView1<'_, f64>> {
        self.cap.as_ref().map(Array1::view)
    }

    /// Benchmark returns, if present.
    #[must_use]
    pub fn benchmark(&self) -> Option<ArrayView1<'_, f64>> {
        self.benchmark.as_ref().map(Array1::view)
    }

    /// Group labels, if computed.
    #[must_use]
    pub fn group(&self) -> Option<&[String]> {
        self.group.as_deref()
    }

    /// Copy of this panel with the factor matrix replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape differs from the current factor matrix.
    pub fn with_factor_values(&self, factors: Array2<f64>) -> Result<Self, PanelError> {
        if factors.dim() != self.factors.dim() {
            return Err(PanelError::LengthMismatch {
                column: "factors".to_string(),
                expected: self.factors.len(),
                actual: factors.len(),
            });
        }
        Ok(Self { factors, ..self.clone() })
    }

    /// Copy of this panel with extra factor columns appended.
    ///
    /// # Errors
    ///
    /// Returns an error on a length mismatch or a name collision.
    pub fn with_factor_columns(
        &self,
        columns: Vec<(FactorName, Vec<f64>)>,
    ) -> Result<Self, PanelError> {
        let mut named: Vec<(FactorName, Vec<f64>)> = self
            .factor_names
            .iter()
            .zip(self.factors.columns())
            .map(|(name, col)| (name.clone(), col.to_vec()))
            .collect();
        for (name, values) in columns {
            validate_factor_name(&name, &named)?;
            check_len(name.as_str(), self.len(), values.len())?;
            named.push((name, values));
        }
        let (factor_names, factors) = assemble_factors(named, self.len());
        Ok(Self { factor_names, factors, ..self.clone() })
    }

    /// Copy of this panel carrying a `group` label per row.
    ///
    /// # Errors
    ///
    /// Returns an error if the label count differs from the row count.
    pub fn with_group(&self, labels: Vec<String>) -> Result<Self, PanelError> {
        check_len(GROUP_COL, self.len(), labels.len())?;
        Ok(Self { group: Some(labels), ..self.clone() })
    }

    /// Sub-panel made of the given rows, which must be increasing.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let take = |a: &Array1<f64>| rows.iter().map(|&i| a[i]).collect::<Array1<f64>>();
        Self {
            index: self.index.select(rows),
            factor_names: self.factor_names.clone(),
            factors: self.factors.select(Axis(0), rows),
            ret: take(&self.ret),
            cap: self.cap.as_ref().map(take),
            benchmark: self.benchmark.as_ref().map(take),
            group: self.group.as_ref().map(|g| rows.iter().map(|&i| g[i].clone()).collect()),
        }
    }

    /// Convert back to a long-format frame.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects a column.
    pub fn to_frame(&self) -> Result<DataFrame, PanelError> {
        self.to_frame_with(Vec::new())
    }

    /// Convert to a frame and append extra per-row columns.
    ///
    /// # Errors
    ///
    /// Returns an error if an extra column has the wrong length.
    pub fn to_frame_with(&self, extra: Vec<Column>) -> Result<DataFrame, PanelError> {
        let mut columns = vec![
            Column::new(DATE_COL.into(), self.index.dates().to_vec()),
            Column::new(
                SYMBOL_COL.into(),
                self.index.symbols().iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            ),
        ];
        for (name, values) in self.factor_names.iter().zip(self.factors.columns()) {
            columns.push(Column::new(name.as_str().into(), values.to_vec()));
        }
        columns.push(Column::new(RET_COL.into(), self.ret.to_vec()));
        if let Some(cap) = &self.cap {
            columns.push(Column::new(CAP_COL.into(), cap.to_vec()));
        }
        if let Some(benchmark) = &self.benchmark {
            columns.push(Column::new(BENCHMARK_COL.into(), benchmark.to_vec()));
        }
        if let Some(group) = &self.group {
            columns.push(Column::new(GROUP_COL.into(), group.clone()));
        }
        for column in extra {
            check_len(column.name().as_str(), self.len(), column.len())?;
            columns.push(column);
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Builder for [`Panel`].
#[derive(Debug, Clone)]
pub struct PanelBuilder {
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    factors: Vec<(FactorName, Vec<f64>)>,
    ret: Option<Vec<f64>>,
    cap: Option<Vec<f64>>,
    benchmark: Option<Vec<f64>>,
}

impl PanelBuilder {
    fn new(dates: Vec<Date>, symbols: Vec<Symbol>) -> Self {
        Self { dates, symbols, factors: Vec::new(), ret: None, cap: None, benchmark: None }
    }

    /// Add a factor column.
    #[must_use]
    pub fn factor(mut self, name: impl Into<FactorName>, values: Vec<f64>) -> Self {
        self.factors.push((name.into(), values));
        self
    }

    /// Set the forward return column.
    #[must_use]
    pub fn ret(mut self, values: Vec<f64>) -> Self {
        self.ret = Some(values);
        self
    }

    /// Set the market capitalization column.
    #[must_use]
    pub fn cap(mut self, values: Vec<f64>) -> Self {
        self.cap = Some(values);
        self
    }

    /// Set the benchmark return column.
    #[must_use]
    pub fn benchmark(mut self, values: Vec<f64>) -> Self {
        self.benchmark = Some(values);
        self
    }

    /// Validate, sort rows by (date, symbol) and factors by name.
    ///
    /// # Errors
    ///
    /// Returns an error if no factor is given, `ret` is missing, a column
    /// length differs from the index, a factor name is reserved or repeated,
    /// or a (date, symbol) pair repeats.
    pub fn build(self) -> Result<Panel, PanelError> {
        let n = self.dates.len();
        check_len(SYMBOL_COL, n, self.symbols.len())?;
        if self.factors.is_empty() {
            return Err(PanelError::NoFactors);
        }
        let ret = self.ret.ok_or_else(|| PanelError::MissingColumn(RET_COL.to_string()))?;
        check_len(RET_COL, n, ret.len())?;
        if let Some(cap) = &self.cap {
            check_len(CAP_COL, n, cap.len())?;
        }
        if let Some(benchmark) = &self.benchmark {
            check_len(BENCHMARK_COL, n, benchmark.len())?;
        }
        let mut seen: Vec<(FactorName, Vec<f64>)> = Vec::with_capacity(self.factors.len());
        for (name, values) in self.factors {
            validate_factor_name(&name, &seen)?;
            check_len(name.as_str(), n, values.len())?;
            seen.push((name, values));
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            self.dates[a].cmp(&self.dates[b]).then_with(|| self.symbols[a].cmp(&self.symbols[b]))
        });
        let permute = |values: &[f64]| order.iter().map(|&i| values[i]).collect::<Vec<f64>>();

        let index = PanelIndex::from_sorted(
            order.iter().map(|&i| self.dates[i]).collect(),
            order.iter().map(|&i| self.symbols[i].clone()).collect(),
        )?;
        let permuted = seen.into_iter().map(|(name, values)| (name, permute(&values))).collect();
        let (factor_names, factors) = assemble_factors(permuted, n);

        Ok(Panel {
            index,
            factor_names,
            factors,
            ret: Array1::from(permute(&ret)),
            cap: self.cap.as_deref().map(|c| Array1::from(permute(c))),
            benchmark: self.benchmark.as_deref().map(|b| Array1::from(permute(b))),
            group: None,
        })
    }
}

fn validate_factor_name(
    name: &FactorName,
    existing: &[(FactorName, Vec<f64>)],
) -> Result<(), PanelError> {
    if is_reserved(name.as_str()) {
        return Err(PanelError::InvalidFactor(format!("{name} is a reserved column")));
    }
    if existing.iter().any(|(n, _)| n == name) {
        return Err(PanelError::InvalidFactor(format!("{name} is declared twice")));
    }
    Ok(())
}

fn check_len(column: &str, expected: usize, actual: usize) -> Result<(), PanelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(PanelError::LengthMismatch { column: column.to_string(), expected, actual })
    }
}

fn assemble_factors(
    mut columns: Vec<(FactorName, Vec<f64>)>,
    n_rows: usize,
) -> (Vec<FactorName>, Array2<f64>) {
    columns.sort_by(|a, b| a.0.cmp(&b.0));
    let mut factors = Array2::from_elem((n_rows, columns.len()), f64::NAN);
    for (j, (_, values)) in columns.iter().enumerate() {
        factors.column_mut(j).assign(&ArrayView1::from(values.as_slice()));
    }
    (columns.into_iter().map(|(name, _)| name).collect(), factors)
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, PanelError> {
    df.column(name).map_err(|_| PanelError::MissingColumn(name.to_string()))
}

/// Read a numeric column as `f64`, nulls as `NaN`.
///
/// # Errors
///
/// Returns an error if the column cannot be cast to `Float64`.
pub fn floats_from_column(column: &Column) -> Result<Vec<f64>, PanelError> {
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Read a column of security codes; numeric codes are cast to strings.
///
/// # Errors
///
/// Returns an error if the column cannot be cast or contains nulls.
pub fn symbols_from_column(column: &Column) -> Result<Vec<Symbol>, PanelError> {
    let cast = column.cast(&DataType::String)?;
    cast.str()?
        .into_iter()
        .map(|v| {
            v.map(Symbol::from)
                .ok_or_else(|| PanelError::InvalidValue(format!("null in {SYMBOL_COL}")))
        })
        .collect()
}

/// Read a date column stored as `Date`, `Datetime` or `%Y-%m-%d` strings.
///
/// # Errors
///
/// Returns an error if the column cannot be converted or contains nulls.
pub fn dates_from_column(column: &Column) -> Result<Vec<Date>, PanelError> {
    if matches!(column.dtype(), DataType::String) {
        return column
            .str()?
            .into_iter()
            .map(|v| {
                let raw = v.ok_or_else(|| PanelError::InvalidValue(format!("null in {DATE_COL}")))?;
                Date::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|e| PanelError::InvalidValue(format!("{raw}: {e}")))
            })
            .collect();
    }
    let days = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;
    days.i32()?
        .into_iter()
        .map(|v| {
            v.and_then(|d| Date::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
                .ok_or_else(|| PanelError::InvalidValue(format!("invalid value in {DATE_COL}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample() -> Panel {
        Panel::builder(
            vec![d(2), d(1), d(1), d(2)],
            vec!["B".into(), "B".into(), "A".into(), "A".into()],
        )
        .factor("value", vec![4.0, 2.0, 1.0, 3.0])
        .factor("momentum", vec![0.4, 0.2, 0.1, 0.3])
        .ret(vec![0.04, 0.02, 0.01, 0.03])
        .cap(vec![40.0, 20.0, 10.0, 30.0])
        .build()
        .unwrap()
    }

    #[test]
    fn builder_sorts_rows_and_factors() {
        let panel = sample();
        assert_eq!(panel.index().dates(), &[d(1), d(1), d(2), d(2)]);
        let symbols: Vec<&str> = panel.index().symbols().iter().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["A", "B", "A", "B"]);
        assert_eq!(panel.factor_names()[0].as_str(), "momentum");
        assert_eq!(panel.factor("value").unwrap().to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(panel.ret().to_vec(), vec![0.01, 0.02, 0.03, 0.04]);
    }

    #[test]
    fn date_slices_cover_rows() {
        let panel = sample();
        let slices = panel.date_slices();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].range(), 0..2);
        assert_eq!(slices[1].range(), 2..4);
        assert_eq!(panel.index().position(d(2), "B"), Some(3));
        assert_eq!(panel.index().position(d(3), "B"), None);
    }

    #[test]
    fn builder_rejects_empty_factor_set() {
        let err = Panel::builder(vec![d(1)], vec!["A".into()]).ret(vec![0.0]).build().unwrap_err();
        assert!(matches!(err, PanelError::NoFactors));
    }

    #[test]
    fn builder_rejects_duplicates_and_reserved() {
        let err = Panel::builder(vec![d(1), d(1)], vec!["A".into(), "A".into()])
            .factor("x", vec![1.0, 2.0])
            .ret(vec![0.0, 0.0])
            .build()
            .unwrap_err();
        assert!(matches!(err, PanelError::DuplicateIndex { .. }));

        let err = Panel::builder(vec![d(1)], vec!["A".into()])
            .factor("cap", vec![1.0])
            .ret(vec![0.0])
            .build()
            .unwrap_err();
        assert!(matches!(err, PanelError::InvalidFactor(_)));
    }

    #[test]
    fn builder_rejects_length_mismatch() {
        let err = Panel::builder(vec![d(1), d(2)], vec!["A".into(), "A".into()])
            .factor("x", vec![1.0])
            .ret(vec![0.0, 0.0])
            .build()
            .unwrap_err();
        assert!(matches!(err, PanelError::LengthMismatch { ref column, .. } if column == "x"));
    }

    #[test]
    fn frame_round_trip_keeps_schema() {
        let panel = sample();
        let df = panel.to_frame().unwrap();
        assert_eq!(df.height(), 4);
        assert!(df.column(CAP_COL).is_ok());

        let back = Panel::from_frame(&df).unwrap();
        assert_eq!(back.factor_names(), panel.factor_names());
        assert_eq!(back.index(), panel.index());
        assert_eq!(back.cap().unwrap().to_vec(), panel.cap().unwrap().to_vec());
    }

    #[test]
    fn from_frame_requires_ret_and_numeric_factors() {
        let df = df! {
            "date" => &["2024-01-01"],
            "symbol" => &["A"],
            "x" => &[1.0],
        }
        .unwrap();
        assert!(matches!(Panel::from_frame(&df), Err(PanelError::MissingColumn(_))));

        let df = df! {
            "date" => &["2024-01-01"],
            "symbol" => &["A"],
            "ret" => &[0.1],
            "name" => &["alpha"],
        }
        .unwrap();
        assert!(matches!(Panel::from_frame(&df), Err(PanelError::NonNumericColumn { .. })));
    }

    #[test]
    fn select_rows_rebuilds_slices() {
        let panel = sample().select_rows(&[1, 3]);
        assert_eq!(panel.len(), 2);
        assert_eq!(panel.date_slices().len(), 2);
        assert_eq!(panel.ret().to_vec(), vec![0.02, 0.04]);
    }

    #[test]
    fn with_factor_columns_keeps_name_order() {
        let panel = sample()
            .with_factor_columns(vec![("beta".into(), vec![1.0, 1.0, 0.0, 0.0])])
            .unwrap();
        let names: Vec<&str> = panel.factor_names().iter().map(FactorName::as_str).collect();
        assert_eq!(names, vec!["beta", "momentum", "value"]);
        assert!(sample().with_factor_columns(vec![("value".into(), vec![0.0; 4])]).is_err());
    }
}
