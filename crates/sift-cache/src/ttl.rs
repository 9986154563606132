//! TTL mode: moka cache bounded by entry count and time-to-live.
//!
//! Expiry is checked against `CacheEntry::expires_at` using the injected
//! clock; moka's own `time_to_live` is a wall-clock backstop that reclaims
//! memory for entries nobody asks for again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::ops::compute::Op;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use sift_core::errors::{CacheError, SiftError, SiftResult};
use sift_core::models::{CacheMode, CacheStats, Chunk};
use sift_core::traits::{IChunkCache, IChunkFetcher};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::entry::CacheEntry;

/// Bounded chunk cache. Concurrent misses on one document share a single fetch.
pub struct TtlChunkCache {
    cache: Cache<String, Arc<CacheEntry>>,
    fetcher: Arc<dyn IChunkFetcher>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
}

impl TtlChunkCache {
    pub fn new(max_entries: u64, ttl: Duration, fetcher: Arc<dyn IChunkFetcher>) -> Self {
        Self::with_clock(max_entries, ttl, fetcher, Arc::new(SystemClock))
    }

    pub fn with_clock(
        max_entries: u64,
        ttl: Duration,
        fetcher: Arc<dyn IChunkFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self {
            cache,
            fetcher,
            clock,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
        }
    }

    fn load(&self, doc_id: &str) -> SiftResult<Arc<CacheEntry>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let chunks = self.fetcher.fetch(doc_id)?;
        let entry = CacheEntry::from_fetch(doc_id, chunks, self.clock.now(), Some(self.ttl))?;
        debug!(doc_id, chunks = entry.chunks.len(), "chunk cache filled");
        Ok(Arc::new(entry))
    }

    /// Drop `stale` only if it is still the stored entry, so a concurrent
    /// refill is never discarded.
    fn evict_if_current(&self, doc_id: &str, stale: &Arc<CacheEntry>) {
        self.cache
            .entry_by_ref(doc_id)
            .and_compute_with(|current| match current {
                Some(current) if Arc::ptr_eq(current.value(), stale) => Op::Remove,
                _ => Op::Nop,
            });
    }

    /// Number of entries (after flushing moka's pending maintenance).
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IChunkCache for TtlChunkCache {
    fn get(&self, doc_id: &str) -> SiftResult<Arc<Vec<Chunk>>> {
        if let Some(entry) = self.cache.get(doc_id) {
            if !entry.is_expired(self.clock.now()) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(&entry.chunks));
            }
            debug!(doc_id, fetched_at = %entry.fetched_at, "chunk cache entry is cold");
            self.evict_if_current(doc_id, &entry);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let entry = self
            .cache
            .try_get_with(doc_id.to_string(), || self.load(doc_id))
            .map_err(|e| unshare(doc_id, e))?;
        Ok(Arc::clone(&entry.chunks))
    }

    fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }

    fn mode(&self) -> CacheMode {
        CacheMode::Ttl
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            mode: CacheMode::Ttl,
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
        }
    }
}

/// moka shares the init error between every waiter.
fn unshare(doc_id: &str, e: Arc<SiftError>) -> SiftError {
    match Arc::unwrap_or_clone(e) {
        err @ (SiftError::Cache(_) | SiftError::Upstream(_)) => err,
        other => CacheError::FetchFailed {
            doc_id: doc_id.to_string(),
            reason: other.to_string(),
        }
        .into(),
    }
}
