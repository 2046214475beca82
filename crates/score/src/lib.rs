#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/segovia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod direction;
pub use direction::DirectionSpec;

mod ranking;
pub use ranking::{RankPanel, rank_factors};

mod ic;
pub use ic::compute_ic;

mod weights;
pub use weights::{
    EqualWeight, IcWeight, IcirWeight, ReturnWeight, WeightInputs, WeightScheme,
    score_from_weights, top_group_returns,
};

mod context;
pub use context::{ContextConfig, DecileWeights, cap_shares, context_score};

mod method;
pub use method::ScoreMethod;

mod config;
pub use config::ScoreConfig;

mod scorer;
pub use scorer::Scorer;

mod error;
pub use error::ScoreError;

