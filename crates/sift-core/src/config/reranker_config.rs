use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// External cross-encoder service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankerConfig {
    pub enabled: bool,
    /// Scoring endpoint, e.g. `http://reranker:8080/score`.
    pub endpoint: Option<String>,
    /// Model name forwarded to the service.
    pub model: Option<String>,
    pub timeout_ms: u64,
}

impl RerankerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_RERANKER_ENABLED,
            endpoint: None,
            model: None,
            timeout_ms: defaults::DEFAULT_RERANKER_TIMEOUT_MS,
        }
    }
}
