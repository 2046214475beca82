//! Error types for scoring.

use segovia_math::MathError;
use segovia_primitives::PanelError;
use segovia_traits::SourceError;
use segovia_utils::UtilsError;

/// Errors that can occur while ranking or scoring a panel.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    /// Unknown method name.
    #[error("{method} is not supported, valid methods are: {valid}")]
    UnsupportedMethod {
        /// Requested name.
        method: String,
        /// Comma-separated accepted names.
        valid: String,
    },

    /// The panel has no factor columns.
    #[error("panel must have at least 1 factor, got 0")]
    NoFactors,

    /// A reference source the method needs was not injected.
    #[error("no {0} source configured")]
    MissingSource(&'static str),

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Panel error.
    #[error(transparent)]
    Panel(#[from] PanelError),

    /// Numerical error.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Reference source error.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Utility error.
    #[error(transparent)]
    Utils(#[from] UtilsError),
}

impl ScoreError {
    /// Returns whether the error comes from caller configuration rather than data.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMethod { .. }
                | Self::NoFactors
                | Self::MissingSource(_)
                | Self::InvalidConfig(_)
        )
    }
}
