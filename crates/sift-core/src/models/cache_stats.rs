use serde::{Deserialize, Serialize};

/// Which chunk cache implementation is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Bounded by entry count and TTL.
    Ttl,
    /// Unbounded, no expiry. Needs an operator `clear()` to release memory.
    Degraded,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub mode: CacheMode,
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
    pub fetches: u64,
}
