#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/segovia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod regression;
pub use regression::{
    CrossSectionFits, INTERCEPT, MODELED_RET_COL, RegressMethod, RegressionConfig, Regressor,
    fit_cross_sections,
};

mod neutralize;
pub use neutralize::{NeutralizeConfig, Neutralizer};

mod error;
pub use error::ModelError;
