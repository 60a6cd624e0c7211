//! Typed engine errors.
//!
//! Propagation policy: configuration and empty-input problems abort a run
//! before simulation starts; per-bar problems (warm-up gaps, degenerate
//! stop distances) are absorbed locally — the scan skips the bar and
//! continues, and the skip is counted on the run result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected before simulation starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Empty bar series, rejected before simulation starts.
    #[error("no bar data available")]
    NoData,

    /// Fewer bars than an indicator's warm-up period. The scan absorbs
    /// warm-up per bar, so a short series completes with zero trades;
    /// this variant is for callers that require warm data up front.
    #[error("insufficient data: needed {needed} bars, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Non-positive stop distance or degenerate level. Absorbed per bar:
    /// the signal is skipped and the scan continues.
    #[error("invalid risk parameters: {0}")]
    InvalidRiskParameters(String),

    /// Malformed bar series (NaN bar or non-increasing timestamp).
    #[error("malformed bar series at index {0}")]
    MalformedSeries(usize),
}
