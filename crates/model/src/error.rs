//! Error types for cross-sectional models.

use segovia_math::MathError;
use segovia_primitives::PanelError;

/// Errors that can occur while fitting cross-sectional models.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Unknown method name.
    #[error("{method} is not a valid method, valid methods are: {valid}")]
    UnsupportedMethod {
        /// Requested name.
        method: String,
        /// Comma-separated accepted names.
        valid: String,
    },

    /// The panel has no factor columns.
    #[error("panel must have at least 1 factor, got 0")]
    NoFactors,

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be started.
    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Panel error.
    #[error(transparent)]
    Panel(#[from] PanelError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ModelError {
    /// Returns whether the error comes from caller configuration rather than data.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMethod { .. } | Self::NoFactors | Self::InvalidConfig(_)
        )
    }
}
