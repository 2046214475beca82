//! Factor-related type definitions.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{Date, PanelError};

/// Name (code) of a factor column.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
pub struct FactorName(pub String);

impl FactorName {
    /// Create a new factor name.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the factor name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactorName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FactorName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which end of a factor's raw values is considered good.
///
/// Ranks are assigned so that the best security always receives the highest
/// rank; missing values rank 0, below every valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Larger raw values are better: the largest value receives rank N.
    #[default]
    HigherIsBetter,
    /// Smaller raw values are better: the smallest value receives rank N.
    LowerIsBetter,
}

impl Direction {
    /// Map the `ascend` flag of the factor reference table.
    ///
    /// `ascend = true` marks a factor whose smaller values score higher.
    #[must_use]
    pub const fn from_ascend_flag(ascend: bool) -> Self {
        if ascend { Self::LowerIsBetter } else { Self::HigherIsBetter }
    }

    /// Multiplier that turns the factor into a larger-is-better factor.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::HigherIsBetter => 1.0,
            Self::LowerIsBetter => -1.0,
        }
    }

    /// Whether raw values are ranked in ascending order (smallest gets rank 1).
    #[must_use]
    pub const fn ranks_ascending(self) -> bool {
        matches!(self, Self::HigherIsBetter)
    }
}

/// Market-cap scenario used by the contextual scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stratum {
    /// Large-cap scenario: weight grows with the security's cap decile.
    High,
    /// Small-cap scenario: weight shrinks with the security's cap decile.
    Low,
}

impl Stratum {
    /// All strata in matrix column order.
    pub const ALL: [Self; 2] = [Self::High, Self::Low];

    /// Column position of this stratum in weight matrices.
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::High => 0,
            Self::Low => 1,
        }
    }

    /// Short label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

impl FromStr for Stratum {
    type Err = PanelError;

    /// Accepts `high`/`low`, optionally prefixed by the stratifying factor
    /// (e.g. `cap_high`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.rsplit('_').next().unwrap_or(s).to_ascii_lowercase();
        match label.as_str() {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            _ => Err(PanelError::InvalidValue(format!("unknown stratum label: {s}"))),
        }
    }
}

/// One entry of the stratified IC reference: the IC of `factor` measured
/// inside the `stratum` scenario on `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratifiedIcRecord {
    /// Observation date.
    pub date: Date,
    /// Cap scenario.
    pub stratum: Stratum,
    /// Factor code.
    pub factor: FactorName,
    /// Information coefficient (NaN when unavailable).
    pub ic: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_from_ascend_flag() {
        assert_eq!(Direction::from_ascend_flag(false), Direction::HigherIsBetter);
        assert_eq!(Direction::from_ascend_flag(true), Direction::LowerIsBetter);
        assert_eq!(Direction::default(), Direction::HigherIsBetter);
    }

    #[test]
    fn factor_name_displays_code() {
        assert_eq!(FactorName::from("M004023").to_string(), "M004023");
        assert_eq!(format!("{}", FactorName::new("pe")), "pe");
    }

    #[test]
    fn direction_sign() {
        assert_eq!(Direction::HigherIsBetter.sign(), 1.0);
        assert_eq!(Direction::LowerIsBetter.sign(), -1.0);
    }

    #[test]
    fn stratum_parses_prefixed_labels() {
        assert_eq!("cap_high".parse::<Stratum>().unwrap(), Stratum::High);
        assert_eq!("LOW".parse::<Stratum>().unwrap(), Stratum::Low);
        assert!("all".parse::<Stratum>().is_err());
    }

    #[test]
    fn stratum_positions_match_order() {
        for (i, s) in Stratum::ALL.iter().enumerate() {
            assert_eq!(s.position(), i);
        }
    }
}
