//! Scorer configuration.

use segovia_math::CorrelationMethod;
use serde::{Deserialize, Serialize};

use crate::{ContextConfig, DirectionSpec, ScoreError, ScoreMethod};

/// Configuration for [`crate::Scorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Combination method.
    pub method: ScoreMethod,
    /// Factor directions.
    pub direction: DirectionSpec,
    /// Rolling window (in dates) for IC- and return-based weights.
    pub window: usize,
    /// Number of groups for return-based weights.
    pub num_group: usize,
    /// Correlation used for the IC.
    pub ic_method: CorrelationMethod,
    /// Contextual scorer settings.
    pub context: ContextConfig,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            method: ScoreMethod::default(),
            direction: DirectionSpec::default(),
            window: 12,
            num_group: 5,
            ic_method: CorrelationMethod::default(),
            context: ContextConfig::default(),
        }
    }
}

impl ScoreConfig {
    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::InvalidConfig` for a zero window, group count,
    /// IR window or bin count.
    pub fn validate(&self) -> Result<(), ScoreError> {
        let checks = [
            ("window", self.window),
            ("num_group", self.num_group),
            ("context.ir_window", self.context.ir_window),
            ("context.num_bins", self.context.num_bins),
        ];
        if let Some((name, _)) = checks.iter().find(|(_, v)| *v == 0) {
            return Err(ScoreError::InvalidConfig(format!("{name} must be at least 1")));
        }
        Ok(())
    }
}
