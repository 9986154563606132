use std::sync::Arc;

use moka::sync::Cache;
use sift_core::errors::{ConfigError, SiftResult};
use sift_core::traits::ITokenEstimator;
use tiktoken_rs::CoreBPE;

/// Accurate token counter wrapping tiktoken's cl100k_base tokenizer.
/// Caches results per blake3 content hash for performance.
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    /// Create a new TokenCounter with the given cache capacity.
    pub fn new(cache_capacity: u64) -> SiftResult<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| {
            ConfigError::invalid("tokens.estimator", format!("failed to load cl100k_base: {e}"))
        })?;
        Ok(Self {
            bpe: Arc::new(bpe),
            cache: Cache::new(cache_capacity),
        })
    }

    /// Count tokens in the given text (uncached).
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Count tokens with blake3 content-hash caching.
    /// Repeated calls with the same text return the cached result.
    pub fn count_cached(&self, text: &str) -> usize {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        self.cache.get_with(hash, || self.count(text))
    }
}

impl ITokenEstimator for TokenCounter {
    fn estimate(&self, text: &str) -> usize {
        self.count_cached(text)
    }

    fn name(&self) -> &str {
        "tiktoken-cl100k"
    }

    fn is_exact(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_empty_string_is_zero() {
        let counter = TokenCounter::new(100).unwrap();
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn estimate_matches_uncached_count() {
        let counter = TokenCounter::new(100).unwrap();
        let text = "The quick brown fox jumps over the lazy dog";
        assert_eq!(counter.estimate(text), counter.count(text));
        assert!(counter.is_exact());
    }
}
