//! # segovia
//!
//! Multi-factor scoring and cross-sectional return modeling for equity
//! panels keyed by (date, symbol).
//!
//! This crate re-exports the segovia workspace. Individual components can be
//! enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Panel, factor and score types
//! - `traits`: Reference-data source traits
//! - `math`: Ranking, correlation, rolling statistics and least squares
//! - `utils`: Grouping, industry enrichment, preprocessing and in-memory references
//! - `score`: Ranking, IC and weighting schemes, contextual scoring
//! - `model`: Cross-sectional regression and neutralization
//!
//! ## Example
//!
//! ```rust,ignore
//! use segovia::score::{DirectionSpec, ScoreConfig, ScoreMethod, Scorer};
//!
//! let scorer = Scorer::with_config(ScoreConfig {
//!     method: ScoreMethod::IcWeighted,
//!     direction: DirectionSpec::Uniform(segovia::primitives::Direction::HigherIsBetter),
//!     ..Default::default()
//! });
//! let scored = scorer.score(&panel)?;
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use segovia_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use segovia_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use segovia_math as math;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use segovia_utils as utils;
#[cfg(feature = "score")]
#[doc(inline)]
pub use segovia_score as score;
#[cfg(feature = "model")]
#[doc(inline)]
pub use segovia_model as model;
