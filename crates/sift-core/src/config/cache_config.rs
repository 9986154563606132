use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Document chunk cache bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached documents in TTL mode. Must be positive.
    pub cache_maxsize: i64,
    /// Entry lifetime in TTL mode. Must be positive.
    pub cache_ttl_seconds: u64,
}

impl CacheConfig {
    pub fn max_entries(&self) -> u64 {
        u64::try_from(self.cache_maxsize).unwrap_or(0)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_maxsize: defaults::DEFAULT_CACHE_MAXSIZE,
            cache_ttl_seconds: defaults::DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}
