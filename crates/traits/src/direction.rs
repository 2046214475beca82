//! Factor direction reference.

use std::collections::HashMap;

use segovia_primitives::{Direction, FactorName};

use crate::SourceError;

/// Lookup of the preferred direction of each factor code.
///
/// Consulted only when the caller does not state directions explicitly.
pub trait DirectionSource: Send + Sync + std::fmt::Debug {
    /// Direction recorded for `factor`, or `None` if the code is unknown.
    ///
    /// # Errors
    /// Returns `SourceError` if the reference cannot be read.
    fn direction(&self, factor: &FactorName) -> Result<Option<Direction>, SourceError>;

    /// Directions for every known code among `factors`.
    ///
    /// Unknown codes are absent from the map.
    ///
    /// # Errors
    /// Returns `SourceError` if the reference cannot be read.
    fn directions(
        &self,
        factors: &[FactorName],
    ) -> Result<HashMap<FactorName, Direction>, SourceError> {
        let mut found = HashMap::with_capacity(factors.len());
        for factor in factors {
            if let Some(direction) = self.direction(factor)? {
                found.insert(factor.clone(), direction);
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct OnlyValue;

    impl DirectionSource for OnlyValue {
        fn direction(&self, factor: &FactorName) -> Result<Option<Direction>, SourceError> {
            Ok((factor.as_str() == "pe").then_some(Direction::LowerIsBetter))
        }
    }

    #[test]
    fn directions_skip_unknown_codes() {
        let found = OnlyValue.directions(&["pe".into(), "roe".into()]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[&FactorName::from("pe")], Direction::LowerIsBetter);
    }
}
