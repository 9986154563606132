use std::time::Duration;

use crate::errors::SiftResult;

/// External cross-encoder scoring service.
pub trait IRerankScorer: Send + Sync {
    /// One score per passage, same order as `passages`. Higher is more relevant.
    fn score(&self, query: &str, passages: &[String], timeout: Duration) -> SiftResult<Vec<f64>>;

    /// Human-readable scorer name.
    fn name(&self) -> &str;
}
