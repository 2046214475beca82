//! In-memory reference tables built from polars frames.

use std::collections::HashMap;

use polars::prelude::*;
use segovia_primitives::{
    Direction, FactorName, PanelError, Stratum, StratifiedIcRecord, Symbol, dates_from_column,
    floats_from_column, symbols_from_column,
};
use segovia_traits::{DirectionSource, IndustrySource, SourceError, StratifiedIcSource};

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, SourceError> {
    df.column(name).map_err(|_| SourceError::Malformed(format!("missing column {name}")))
}

fn strings(column: &Column) -> Result<Vec<String>, SourceError> {
    let cast = column.cast(&DataType::String)?;
    cast.str()?
        .into_iter()
        .map(|v| {
            v.map(str::to_string)
                .ok_or_else(|| SourceError::Malformed(format!("null in {}", column.name())))
        })
        .collect()
}

fn malformed(err: PanelError) -> SourceError {
    SourceError::Malformed(err.to_string())
}

/// Factor code to direction, read from a `code` / `ascend` frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionTable {
    directions: HashMap<FactorName, Direction>,
}

impl DirectionTable {
    /// Create a table from explicit entries.
    #[must_use]
    pub const fn new(directions: HashMap<FactorName, Direction>) -> Self {
        Self { directions }
    }

    /// Read a frame with a `code` column and a boolean (or 0/1) `ascend` column.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or holds nulls.
    pub fn from_frame(df: &DataFrame) -> Result<Self, SourceError> {
        let codes = strings(column(df, "code")?)?;
        let ascend = column(df, "ascend")?.cast(&DataType::Boolean)?;
        let directions = codes
            .into_iter()
            .zip(ascend.bool()?)
            .map(|(code, flag)| {
                let flag = flag
                    .ok_or_else(|| SourceError::Malformed(format!("null ascend flag for {code}")))?;
                Ok((FactorName::new(code), Direction::from_ascend_flag(flag)))
            })
            .collect::<Result<_, SourceError>>()?;
        Ok(Self { directions })
    }

    /// Number of codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

impl FromIterator<(FactorName, Direction)> for DirectionTable {
    fn from_iter<I: IntoIterator<Item = (FactorName, Direction)>>(iter: I) -> Self {
        Self { directions: iter.into_iter().collect() }
    }
}

impl DirectionSource for DirectionTable {
    fn direction(&self, factor: &FactorName) -> Result<Option<Direction>, SourceError> {
        Ok(self.directions.get(factor).copied())
    }
}

/// Stratified IC history for one stratifying factor.
#[derive(Debug, Clone, PartialEq)]
pub struct StratifiedIcTable {
    stratum_factor: String,
    records: Vec<StratifiedIcRecord>,
}

impl StratifiedIcTable {
    /// Create a table from records measured under `stratum_factor`.
    #[must_use]
    pub fn new(stratum_factor: impl Into<String>, records: Vec<StratifiedIcRecord>) -> Self {
        Self { stratum_factor: stratum_factor.into(), records }
    }

    /// Read a long frame with `date`, `stratum`, `factor` and `ic` columns.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or a stratum label is unknown.
    pub fn from_frame(
        stratum_factor: impl Into<String>,
        df: &DataFrame,
    ) -> Result<Self, SourceError> {
        let dates = dates_from_column(column(df, "date")?).map_err(malformed)?;
        let strata = strings(column(df, "stratum")?)?;
        let factors = strings(column(df, "factor")?)?;
        let ic = floats_from_column(column(df, "ic")?).map_err(malformed)?;

        let records = dates
            .into_iter()
            .zip(strata)
            .zip(factors.into_iter().zip(ic))
            .map(|((date, stratum), (factor, ic))| {
                Ok(StratifiedIcRecord {
                    date,
                    stratum: stratum.parse().map_err(malformed)?,
                    factor: FactorName::new(factor),
                    ic,
                })
            })
            .collect::<Result<_, SourceError>>()?;
        Ok(Self::new(stratum_factor, records))
    }

    /// Read a wide frame: one row per (`date`, stratum label), one column per
    /// factor. Rows whose label is not a stratum (such as `all`) are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the date or label column is missing.
    pub fn from_wide_frame(
        stratum_factor: impl Into<String>,
        df: &DataFrame,
        label_col: &str,
    ) -> Result<Self, SourceError> {
        let dates = dates_from_column(column(df, "date")?).map_err(malformed)?;
        let labels = strings(column(df, label_col)?)?;
        let strata: Vec<Option<Stratum>> = labels.iter().map(|l| l.parse().ok()).collect();

        let mut records = Vec::new();
        for factor_col in df.get_columns() {
            let name = factor_col.name().as_str();
            if name == "date" || name == label_col {
                continue;
            }
            let ic = floats_from_column(factor_col).map_err(malformed)?;
            for ((date, stratum), ic) in dates.iter().zip(&strata).zip(ic) {
                if let Some(stratum) = stratum {
                    records.push(StratifiedIcRecord {
                        date: *date,
                        stratum: *stratum,
                        factor: FactorName::new(name),
                        ic,
                    });
                }
            }
        }
        Ok(Self::new(stratum_factor, records))
    }

    /// Stratifying factor these ICs were measured under.
    #[must_use]
    pub fn stratum_factor(&self) -> &str {
        &self.stratum_factor
    }

    /// All records.
    #[must_use]
    pub fn records(&self) -> &[StratifiedIcRecord] {
        &self.records
    }
}

impl StratifiedIcSource for StratifiedIcTable {
    fn stratified_ic(
        &self,
        stratum_factor: &str,
        factors: &[FactorName],
    ) -> Result<Vec<StratifiedIcRecord>, SourceError> {
        if stratum_factor != self.stratum_factor {
            return Err(SourceError::Unavailable(format!(
                "no stratified IC for {stratum_factor}, table holds {}",
                self.stratum_factor
            )));
        }
        Ok(self.records.iter().filter(|r| factors.contains(&r.factor)).cloned().collect())
    }
}

/// Security to industry label, read from a `symbol` / `industry` frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndustryTable {
    industries: HashMap<Symbol, String>,
}

impl IndustryTable {
    /// Create a table from explicit entries.
    #[must_use]
    pub const fn new(industries: HashMap<Symbol, String>) -> Self {
        Self { industries }
    }

    /// Read a frame with `symbol` and `industry` columns. Null industries are
    /// treated as unclassified.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing.
    pub fn from_frame(df: &DataFrame) -> Result<Self, SourceError> {
        let symbols = symbols_from_column(column(df, "symbol")?).map_err(malformed)?;
        let industry = column(df, "industry")?.cast(&DataType::String)?;
        let industries = symbols
            .into_iter()
            .zip(industry.str()?)
            .filter_map(|(symbol, label)| label.map(|l| (symbol, l.to_string())))
            .collect();
        Ok(Self { industries })
    }
}

impl IndustrySource for IndustryTable {
    fn industries(&self, batch: &[Symbol]) -> Result<HashMap<Symbol, String>, SourceError> {
        Ok(batch
            .iter()
            .filter_map(|s| self.industries.get(s).map(|l| (s.clone(), l.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_table_from_frame() {
        let df = df! {
            "code" => &["M001", "M002"],
            "ascend" => &[true, false],
        }
        .unwrap();
        let table = DirectionTable::from_frame(&df).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.direction(&"M001".into()).unwrap(), Some(Direction::LowerIsBetter));
        assert_eq!(table.direction(&"M002".into()).unwrap(), Some(Direction::HigherIsBetter));
        assert_eq!(table.direction(&"M003".into()).unwrap(), None);
    }

    #[test]
    fn direction_table_accepts_integer_flags() {
        let df = df! {
            "code" => &["M001"],
            "ascend" => &[1i32],
        }
        .unwrap();
        let table = DirectionTable::from_frame(&df).unwrap();
        assert_eq!(table.direction(&"M001".into()).unwrap(), Some(Direction::LowerIsBetter));
    }

    #[test]
    fn stratified_table_from_long_frame() {
        let df = df! {
            "date" => &["2024-01-31", "2024-01-31", "2024-01-31"],
            "stratum" => &["cap_high", "cap_low", "cap_high"],
            "factor" => &["M001", "M001", "M002"],
            "ic" => &[0.1, -0.05, 0.02],
        }
        .unwrap();
        let table = StratifiedIcTable::from_frame("M004023", &df).unwrap();
        let records = table.stratified_ic("M004023", &["M001".into()]).unwrap();
        assert_eq!(records.len(), 2);
        assert!(table.stratified_ic("M000001", &["M001".into()]).is_err());
    }

    #[test]
    fn stratified_table_from_wide_frame_skips_all_rows() {
        let df = df! {
            "date" => &["2024-01-31", "2024-01-31", "2024-01-31"],
            "label" => &["high", "low", "all"],
            "M001" => &[0.1, 0.2, 0.15],
            "M002" => &[-0.1, 0.0, -0.05],
        }
        .unwrap();
        let table = StratifiedIcTable::from_wide_frame("M004023", &df, "label").unwrap();
        assert_eq!(table.records().len(), 4);
        assert!(table.records().iter().all(|r| r.date.to_string() == "2024-01-31"));
    }

    #[test]
    fn industry_table_lookup() {
        let df = df! {
            "symbol" => &["A", "B"],
            "industry" => &[Some("banks"), None],
        }
        .unwrap();
        let table = IndustryTable::from_frame(&df).unwrap();
        let found = table.industries(&["A".into(), "B".into(), "C".into()]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[&Symbol::new("A")], "banks");
    }
}
