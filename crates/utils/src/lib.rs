#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/segovia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod group;
pub use group::{GroupConfig, add_group};

mod industry;
pub use industry::{INDUSTRY_BATCH_SIZE, add_industry};

mod preprocess;
pub use preprocess::{de_extreme, standardize_panel};

mod reference;
pub use reference::{DirectionTable, IndustryTable, StratifiedIcTable};

mod error;
pub use error::UtilsError;
