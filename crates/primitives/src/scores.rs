//! Score column attached to a panel.

use ndarray::Array1;
use polars::prelude::*;

use crate::{Date, Panel, PanelError};

/// A panel together with one derived per-row value (a score or a modeled
/// return).
#[derive(Debug, Clone)]
pub struct ScoredPanel {
    panel: Panel,
    name: String,
    values: Array1<f64>,
}

impl ScoredPanel {
    /// Column name used for combined factor scores.
    pub const SCORE_COL: &'static str = "score";

    /// Attach `values` to `panel` under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value count differs from the row count.
    pub fn new(
        panel: Panel,
        name: impl Into<String>,
        values: Array1<f64>,
    ) -> Result<Self, PanelError> {
        let name = name.into();
        if values.len() != panel.len() {
            return Err(PanelError::LengthMismatch {
                column: name,
                expected: panel.len(),
                actual: values.len(),
            });
        }
        Ok(Self { panel, name, values })
    }

    /// The underlying panel.
    #[must_use]
    pub const fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Name of the derived column.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derived values, aligned with the panel rows.
    #[must_use]
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Value for a (date, symbol) pair.
    #[must_use]
    pub fn get(&self, date: Date, symbol: &str) -> Option<f64> {
        self.panel.index().position(date, symbol).map(|i| self.values[i])
    }

    /// Panel frame with the derived column appended.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects a column.
    pub fn to_frame(&self) -> Result<DataFrame, PanelError> {
        self.panel.to_frame_with(vec![Column::new(self.name.as_str().into(), self.values.to_vec())])
    }
}
