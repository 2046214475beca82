//! Resolving the direction of every factor.

use std::collections::HashMap;

use segovia_primitives::{Direction, FactorName};
use segovia_traits::DirectionSource;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ScoreError;

/// How factor directions are chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionSpec {
    /// Look each factor up in the direction reference; unknown codes take the default.
    #[default]
    FromReference,
    /// One direction for every factor.
    Uniform(Direction),
    /// Explicit per-factor directions; unlisted factors take the default.
    PerFactor(HashMap<FactorName, Direction>),
}

impl DirectionSpec {
    /// Direction of each factor, in the order of `factors`.
    ///
    /// A per-factor mapping whose keys differ from `factors` is accepted with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is needed but missing or unreadable.
    pub fn resolve(
        &self,
        factors: &[FactorName],
        source: Option<&dyn DirectionSource>,
    ) -> Result<Vec<Direction>, ScoreError> {
        match self {
            Self::Uniform(direction) => Ok(vec![*direction; factors.len()]),
            Self::PerFactor(map) => {
                let missing: Vec<&str> = factors
                    .iter()
                    .filter(|f| !map.contains_key(*f))
                    .map(FactorName::as_str)
                    .collect();
                let mut unknown: Vec<&str> = map
                    .keys()
                    .filter(|k| !factors.contains(k))
                    .map(FactorName::as_str)
                    .collect();
                unknown.sort_unstable();
                if !missing.is_empty() || !unknown.is_empty() {
                    warn!(
                        ?missing,
                        ?unknown,
                        "direction mapping does not match the factor set, unlisted factors use the default direction"
                    );
                }
                Ok(factors.iter().map(|f| map.get(f).copied().unwrap_or_default()).collect())
            }
            Self::FromReference => {
                let source = source.ok_or(ScoreError::MissingSource("direction"))?;
                let found = source.directions(factors)?;
                Ok(factors.iter().map(|f| found.get(f).copied().unwrap_or_default()).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use segovia_traits::SourceError;

    use super::*;

    #[derive(Debug)]
    struct Reference;

    impl DirectionSource for Reference {
        fn direction(&self, factor: &FactorName) -> Result<Option<Direction>, SourceError> {
            Ok((factor.as_str() == "pe").then_some(Direction::LowerIsBetter))
        }
    }

    fn factors() -> Vec<FactorName> {
        vec!["pe".into(), "roe".into()]
    }

    #[test]
    fn uniform_applies_to_all() {
        let dirs = DirectionSpec::Uniform(Direction::LowerIsBetter).resolve(&factors(), None).unwrap();
        assert_eq!(dirs, vec![Direction::LowerIsBetter; 2]);
    }

    #[test]
    fn per_factor_fills_missing_with_default() {
        let map = HashMap::from([(FactorName::from("roe"), Direction::LowerIsBetter)]);
        let dirs = DirectionSpec::PerFactor(map).resolve(&factors(), None).unwrap();
        assert_eq!(dirs, vec![Direction::HigherIsBetter, Direction::LowerIsBetter]);
    }

    #[test]
    fn per_factor_ignores_unknown_keys() {
        let map = HashMap::from([
            (FactorName::from("pe"), Direction::LowerIsBetter),
            (FactorName::from("roe"), Direction::HigherIsBetter),
            (FactorName::from("beta"), Direction::LowerIsBetter),
        ]);
        let dirs = DirectionSpec::PerFactor(map).resolve(&factors(), None).unwrap();
        assert_eq!(dirs, vec![Direction::LowerIsBetter, Direction::HigherIsBetter]);
    }

    #[test]
    fn reference_lookup() {
        let dirs = DirectionSpec::FromReference.resolve(&factors(), Some(&Reference)).unwrap();
        assert_eq!(dirs, vec![Direction::LowerIsBetter, Direction::HigherIsBetter]);
    }

    #[test]
    fn reference_required() {
        let err = DirectionSpec::FromReference.resolve(&factors(), None).unwrap_err();
        assert!(matches!(err, ScoreError::MissingSource("direction")));
    }
}
