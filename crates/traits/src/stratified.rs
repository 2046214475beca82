//! Cap-stratified IC reference.

use segovia_primitives::{FactorName, StratifiedIcRecord};

use crate::SourceError;

/// Historical IC of factors measured separately in the high and low scenarios
/// of a stratifying factor (market cap by default).
pub trait StratifiedIcSource: Send + Sync + std::fmt::Debug {
    /// All records for `factors` under the `stratum_factor` split, in any order.
    ///
    /// Factors without history are simply absent from the result.
    ///
    /// # Errors
    /// Returns `SourceError` if the reference cannot be read.
    fn stratified_ic(
        &self,
        stratum_factor: &str,
        factors: &[FactorName],
    ) -> Result<Vec<StratifiedIcRecord>, SourceError>;
}
