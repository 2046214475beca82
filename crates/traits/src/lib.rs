#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/segovia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod direction;
pub use direction::DirectionSource;

mod stratified;
pub use stratified::StratifiedIcSource;

mod industry;
pub use industry::IndustrySource;

mod error;
pub use error::SourceError;
