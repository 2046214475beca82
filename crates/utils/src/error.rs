//! Error types for utility functions.

use segovia_math::MathError;
use segovia_primitives::PanelError;
use segovia_traits::SourceError;

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Invalid parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Reference source failure.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Panel construction failure.
    #[error(transparent)]
    Panel(#[from] PanelError),

    /// Numerical failure.
    #[error(transparent)]
    Math(#[from] MathError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UtilsError::InvalidParameter("bad value".to_string());
        assert!(err.to_string().contains("bad value"));

        let err: UtilsError = PanelError::NoFactors.into();
        assert!(err.to_string().contains("at least 1 factor"));
    }
}
