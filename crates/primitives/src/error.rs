//! Error types for panel construction.

/// Errors that can occur while building or reshaping panels and tables.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// The panel has no factor columns.
    #[error("panel must have at least 1 factor, got 0")]
    NoFactors,

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// A column cannot be used as a numeric factor.
    #[error("column {name} is not numeric (dtype {dtype})")]
    NonNumericColumn {
        /// Column name.
        name: String,
        /// Offending dtype.
        dtype: String,
    },

    /// A factor is declared twice or collides with a reserved name.
    #[error("invalid factor column: {0}")]
    InvalidFactor(String),

    /// Column length does not match the index length.
    #[error("column {column} has {actual} rows, expected {expected}")]
    LengthMismatch {
        /// Column name.
        column: String,
        /// Expected number of rows.
        expected: usize,
        /// Actual number of rows.
        actual: usize,
    },

    /// The same (date, symbol) pair appears more than once.
    #[error("duplicate index entry: ({date}, {symbol})")]
    DuplicateIndex {
        /// Date of the duplicated row.
        date: String,
        /// Symbol of the duplicated row.
        symbol: String,
    },

    /// Dates of a date-indexed table are not strictly increasing.
    #[error("dates must be strictly increasing")]
    UnsortedDates,

    /// A value could not be parsed.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
