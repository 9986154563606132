//! Construction-time choice of cache mode.

use std::sync::Arc;

use sift_core::config::CacheConfig;
use sift_core::models::{DegradationEvent, DegradationKind};
use sift_core::traits::{IChunkCache, IChunkFetcher};

use crate::clock::{Clock, SystemClock};

/// Build the preferred chunk cache for `config`.
///
/// TTL mode when the `ttl-cache` feature is compiled in; otherwise the
/// unbounded map, with a one-time warning at construction.
pub fn build_chunk_cache(
    config: &CacheConfig,
    fetcher: Arc<dyn IChunkFetcher>,
) -> Arc<dyn IChunkCache> {
    build_chunk_cache_with_clock(config, fetcher, Arc::new(SystemClock))
}

#[cfg(feature = "ttl-cache")]
pub fn build_chunk_cache_with_clock(
    config: &CacheConfig,
    fetcher: Arc<dyn IChunkFetcher>,
    clock: Arc<dyn Clock>,
) -> Arc<dyn IChunkCache> {
    tracing::info!(
        mode = "ttl",
        maxsize = config.max_entries(),
        ttl_secs = config.cache_ttl_seconds,
        "chunk cache initialized"
    );
    Arc::new(crate::TtlChunkCache::with_clock(
        config.max_entries(),
        config.ttl(),
        fetcher,
        clock,
    ))
}

#[cfg(not(feature = "ttl-cache"))]
pub fn build_chunk_cache_with_clock(
    config: &CacheConfig,
    fetcher: Arc<dyn IChunkFetcher>,
    clock: Arc<dyn Clock>,
) -> Arc<dyn IChunkCache> {
    tracing::warn!(
        mode = "degraded",
        ignored_maxsize = config.max_entries(),
        ignored_ttl_secs = config.cache_ttl_seconds,
        "bounded chunk cache unavailable; cache is unbounded until clear() is invoked"
    );
    Arc::new(crate::UnboundedChunkCache::with_clock(fetcher, clock))
}

/// Startup event recorded whenever the unbounded cache is in use.
pub fn degraded_cache_event() -> DegradationEvent {
    DegradationEvent::new(
        "chunk_cache",
        DegradationKind::CacheDegraded,
        "bounded cache facility unavailable",
        "unbounded map with manual clear()",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::errors::SiftResult;
    use sift_core::models::{CacheMode, Chunk};

    #[test]
    fn default_build_selects_compiled_mode() {
        let fetcher = Arc::new(|_: &str| -> SiftResult<Vec<Chunk>> { Ok(Vec::new()) });
        let cache = build_chunk_cache(&CacheConfig::default(), fetcher);
        let expected = if cfg!(feature = "ttl-cache") {
            CacheMode::Ttl
        } else {
            CacheMode::Degraded
        };
        assert_eq!(cache.mode(), expected);
    }

    #[test]
    fn degraded_event_kind() {
        assert_eq!(degraded_cache_event().kind, DegradationKind::CacheDegraded);
    }
}
