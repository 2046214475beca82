//! Scoring method dispatch.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EqualWeight, IcWeight, IcirWeight, ReturnWeight, ScoreError, WeightScheme};

/// How factor ranks are combined into one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    /// Every factor weighs `1/K`.
    #[default]
    EqualWeighted,
    /// Rolling mean of `|IC|`.
    IcWeighted,
    /// Rolling information ratio of `|IC|`.
    IcirWeighted,
    /// Rolling mean of the top group's forward return.
    RetWeighted,
    /// Cap-scenario weights from the stratified IC reference.
    ContextWeighted,
}

impl ScoreMethod {
    /// Every method, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::EqualWeighted,
        Self::IcWeighted,
        Self::IcirWeighted,
        Self::RetWeighted,
        Self::ContextWeighted,
    ];

    /// Method name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EqualWeighted => "equal_weighted",
            Self::IcWeighted => "ic_weighted",
            Self::IcirWeighted => "icir_weighted",
            Self::RetWeighted => "ret_weighted",
            Self::ContextWeighted => "context_weighted",
        }
    }

    /// Comma-separated list of accepted names.
    #[must_use]
    pub fn valid_names() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }

    /// Rank-weighting scheme behind this method; `None` for the contextual scorer.
    #[must_use]
    pub fn scheme(self) -> Option<Box<dyn WeightScheme>> {
        match self {
            Self::EqualWeighted => Some(Box::new(EqualWeight)),
            Self::IcWeighted => Some(Box::new(IcWeight)),
            Self::IcirWeighted => Some(Box::new(IcirWeight)),
            Self::RetWeighted => Some(Box::new(ReturnWeight)),
            Self::ContextWeighted => None,
        }
    }
}

impl fmt::Display for ScoreMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreMethod {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|m| m.as_str() == s).ok_or_else(|| {
            ScoreError::UnsupportedMethod { method: s.to_string(), valid: Self::valid_names() }
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("equal_weighted", ScoreMethod::EqualWeighted)]
    #[case("ic_weighted", ScoreMethod::IcWeighted)]
    #[case("icir_weighted", ScoreMethod::IcirWeighted)]
    #[case("ret_weighted", ScoreMethod::RetWeighted)]
    #[case("context_weighted", ScoreMethod::ContextWeighted)]
    fn parses_known_names(#[case] name: &str, #[case] expected: ScoreMethod) {
        let method: ScoreMethod = name.parse().unwrap();
        assert_eq!(method, expected);
        assert_eq!(method.to_string(), name);
    }

    #[test]
    fn rejects_unknown_name_with_valid_list() {
        let err = "magic".parse::<ScoreMethod>().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("magic is not supported"));
        for method in ScoreMethod::ALL {
            assert!(message.contains(method.as_str()));
        }
        assert!(err.is_configuration());
    }

    #[test]
    fn scheme_names_match_methods() {
        for method in ScoreMethod::ALL {
            match method.scheme() {
                Some(scheme) => assert_eq!(scheme.name(), method.as_str()),
                None => assert_eq!(method, ScoreMethod::ContextWeighted),
            }
        }
    }

    #[test]
    fn ic_schemes_need_ic() {
        assert!(ScoreMethod::IcWeighted.scheme().unwrap().needs_ic());
        assert!(ScoreMethod::IcirWeighted.scheme().unwrap().needs_ic());
        assert!(!ScoreMethod::RetWeighted.scheme().unwrap().needs_ic());
    }
}
