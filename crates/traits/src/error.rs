//! Error types for reference-data sources.

use polars::prelude::PolarsError;

/// Errors that can occur while reading reference data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The reference cannot be reached or is not configured.
    #[error("reference data unavailable: {0}")]
    Unavailable(String),

    /// The reference returned data in an unexpected shape.
    #[error("malformed reference data: {0}")]
    Malformed(String),

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}
