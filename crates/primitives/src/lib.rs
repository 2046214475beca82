#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/segovia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod asset;
pub use asset::Symbol;

mod factor;
pub use factor::{Direction, FactorName, Stratum, StratifiedIcRecord};

mod panel;
pub use panel::{
    BENCHMARK_COL, CAP_COL, DATE_COL, DateSlice, GROUP_COL, Panel, PanelBuilder, PanelIndex,
    RESERVED_COLUMNS, RET_COL, SYMBOL_COL, dates_from_column, floats_from_column, is_reserved,
    symbols_from_column,
};

mod series;
pub use series::FactorSeries;

mod scores;
pub use scores::ScoredPanel;

mod error;
pub use error::PanelError;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
