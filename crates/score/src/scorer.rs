//! End-to-end scoring driven by a [`ScoreConfig`].

use std::sync::Arc;

use segovia_primitives::{Direction, FactorSeries, Panel, ScoredPanel};
use segovia_traits::{DirectionSource, StratifiedIcSource};
use tracing::debug;

use crate::{
    DecileWeights, RankPanel, ScoreConfig, ScoreError, ScoreMethod, WeightInputs, compute_ic,
    context_score, rank_factors, score_from_weights,
};

/// Combines a panel's factors into one score per row.
///
/// Reference data is injected: a [`DirectionSource`] for
/// [`crate::DirectionSpec::FromReference`] and a [`StratifiedIcSource`] for
/// [`ScoreMethod::ContextWeighted`].
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoreConfig,
    directions: Option<Arc<dyn DirectionSource>>,
    stratified_ic: Option<Arc<dyn StratifiedIcSource>>,
}

impl Scorer {
    /// Create a scorer with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with custom configuration.
    #[must_use]
    pub fn with_config(config: ScoreConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Attach the factor direction reference.
    #[must_use]
    pub fn with_direction_source(mut self, source: Arc<dyn DirectionSource>) -> Self {
        self.directions = Some(source);
        self
    }

    /// Attach the stratified IC reference.
    #[must_use]
    pub fn with_stratified_ic_source(mut self, source: Arc<dyn StratifiedIcSource>) -> Self {
        self.stratified_ic = Some(source);
        self
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Resolved direction of every panel factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction reference is needed and unavailable.
    pub fn directions(&self, panel: &Panel) -> Result<Vec<Direction>, ScoreError> {
        self.config.direction.resolve(panel.factor_names(), self.directions.as_deref())
    }

    /// Per-date ranks of every factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel has no factors or directions cannot be
    /// resolved.
    pub fn rank(&self, panel: &Panel) -> Result<RankPanel, ScoreError> {
        rank_factors(panel, &self.directions(panel)?)
    }

    /// Per-date IC of every factor, using the configured correlation.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel has no factors.
    pub fn compute_ic(&self, panel: &Panel) -> Result<FactorSeries, ScoreError> {
        compute_ic(panel, self.config.ic_method)
    }

    /// Factor weights of the configured rank-weighting method.
    ///
    /// The IC table is computed only when the method needs it.
    ///
    /// # Errors
    ///
    /// Returns an error for the contextual method, which has no per-date
    /// weight vector, or if an input cannot be computed.
    pub fn weights(&self, panel: &Panel, ranks: &RankPanel) -> Result<FactorSeries, ScoreError> {
        let method = self.config.method;
        let scheme = method.scheme().ok_or_else(|| {
            ScoreError::InvalidConfig(format!("{method} has no per-date weight vector"))
        })?;
        let ic = if scheme.needs_ic() { Some(self.compute_ic(panel)?) } else { None };
        scheme.weights(&WeightInputs {
            panel,
            ranks,
            ic: ic.as_ref(),
            window: self.config.window,
            num_group: self.config.num_group,
        })
    }

    /// Scenario weights from the stratified IC reference.
    ///
    /// # Errors
    ///
    /// Returns an error if no stratified IC source is attached or it fails.
    pub fn decile_weights(&self, panel: &Panel) -> Result<DecileWeights, ScoreError> {
        let source = self.stratified_ic.as_deref().ok_or(ScoreError::MissingSource("stratified IC"))?;
        let context = &self.config.context;
        let records = source.stratified_ic(&context.stratum_factor, panel.factor_names())?;
        DecileWeights::from_records(&records, panel.factor_names(), context.ir_window)
    }

    /// Score every panel row under [`ScoredPanel::SCORE_COL`].
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration, a panel without
    /// factors, or a missing reference source.
    pub fn score(&self, panel: &Panel) -> Result<ScoredPanel, ScoreError> {
        self.score_with(panel, ScoredPanel::SCORE_COL)
    }

    /// Score every panel row under a custom column name.
    ///
    /// # Errors
    ///
    /// See [`Self::score`].
    pub fn score_with(&self, panel: &Panel, name: &str) -> Result<ScoredPanel, ScoreError> {
        self.config.validate()?;
        if panel.n_factors() == 0 {
            return Err(ScoreError::NoFactors);
        }
        let method = self.config.method;
        debug!(%method, factors = panel.n_factors(), rows = panel.len(), "scoring panel");

        let values = match method {
            ScoreMethod::ContextWeighted => {
                let weights = self.decile_weights(panel)?;
                context_score(panel, &self.directions(panel)?, &weights, &self.config.context)?
            }
            _ => {
                let ranks = self.rank(panel)?;
                let weights = self.weights(panel, &ranks)?;
                score_from_weights(&ranks, &weights)?
            }
        };
        Ok(ScoredPanel::new(panel.clone(), name, values)?)
    }
}
