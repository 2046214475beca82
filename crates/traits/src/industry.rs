//! Industry classification reference.

use std::collections::HashMap;

use segovia_primitives::Symbol;

use crate::SourceError;

/// Security to industry label lookup.
///
/// Callers query in bounded batches; implementations may assume a batch is
/// small enough for a single request.
pub trait IndustrySource: Send + Sync + std::fmt::Debug {
    /// Industry of each symbol in `batch`. Unclassified symbols are absent.
    ///
    /// # Errors
    /// Returns `SourceError` if the reference cannot be read.
    fn industries(&self, batch: &[Symbol]) -> Result<HashMap<Symbol, String>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Unavailable;

    impl IndustrySource for Unavailable {
        fn industries(&self, _batch: &[Symbol]) -> Result<HashMap<Symbol, String>, SourceError> {
            Err(SourceError::Unavailable("industry service".to_string()))
        }
    }

    #[test]
    fn unavailable_source_reports_error() {
        let err = Unavailable.industries(&[Symbol::new("A")]).unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
