#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/segovia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod rank;
pub use rank::{TieBreak, rank};

mod stats;
pub use stats::{finite_mean, finite_std, mean_abs_deviation};

mod correlation;
pub use correlation::{CorrelationMethod, pearson, spearman};

mod rolling;
pub use rolling::{rolling_mean, rolling_std};

mod normalize;
pub use normalize::normalize_row;

mod buckets;
pub use buckets::{GroupLabel, assign_groups, equal_width_bins};

mod clip;
pub use clip::{ExtremeClipper, ExtremeMethod, clip_extremes};

mod standardize;
pub use standardize::{ScaleMethod, cap_weighted_mean, standardize};

mod least_squares;
pub use least_squares::{LstsqResult, add_intercept, least_squares};

mod error;
pub use error::MathError;
