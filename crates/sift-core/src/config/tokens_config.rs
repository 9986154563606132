use serde::{Deserialize, Serialize};

use super::defaults;

/// Which token estimator to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    /// Exact if the tokenizer is available, heuristic otherwise.
    #[default]
    Auto,
    /// Exact or fail at startup.
    Exact,
    /// Always `chars / 4`.
    Heuristic,
}

/// Token estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokensConfig {
    pub estimator: EstimatorKind,
    /// Entries in the exact counter's content-hash cache.
    pub cache_capacity: u64,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorKind::default(),
            cache_capacity: defaults::DEFAULT_TOKEN_CACHE_CAPACITY,
        }
    }
}
