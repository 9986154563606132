//! Degraded mode: an unbounded concurrent map with no expiry.
//!
//! Used when the bounded cache is not compiled in. Nothing is ever evicted;
//! operators must call `clear()` to release memory.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use sift_core::errors::SiftResult;
use sift_core::models::{CacheMode, CacheStats, Chunk};
use sift_core::traits::{IChunkCache, IChunkFetcher};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::entry::CacheEntry;

/// Unbounded chunk cache. The first fetch for a key wins; concurrent callers
/// for the same key wait on a per-key lock and reuse its result.
pub struct UnboundedChunkCache {
    entries: DashMap<String, Arc<CacheEntry>>,
    inflight: DashMap<String, Arc<Mutex<()>>>,
    fetcher: Arc<dyn IChunkFetcher>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
}

impl UnboundedChunkCache {
    pub fn new(fetcher: Arc<dyn IChunkFetcher>) -> Self {
        Self::with_clock(fetcher, Arc::new(SystemClock))
    }

    pub fn with_clock(fetcher: Arc<dyn IChunkFetcher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            inflight: DashMap::new(),
            fetcher,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
        }
    }

    fn lookup(&self, doc_id: &str) -> Option<Arc<Vec<Chunk>>> {
        self.entries
            .get(doc_id)
            .map(|entry| Arc::clone(&entry.chunks))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IChunkCache for UnboundedChunkCache {
    fn get(&self, doc_id: &str) -> SiftResult<Arc<Vec<Chunk>>> {
        if let Some(chunks) = self.lookup(doc_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(chunks);
        }

        let lock = Arc::clone(
            self.inflight
                .entry(doc_id.to_string())
                .or_default()
                .value(),
        );
        let _guard = lock.lock().unwrap_or_else(|p| p.into_inner());

        // Another caller may have filled the entry while we waited.
        if let Some(chunks) = self.lookup(doc_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(chunks);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let result = self
            .fetcher
            .fetch(doc_id)
            .and_then(|chunks| CacheEntry::from_fetch(doc_id, chunks, self.clock.now(), None));
        let entry = match result {
            Ok(entry) => Arc::new(entry),
            Err(e) => {
                self.inflight.remove(doc_id);
                return Err(e);
            }
        };

        // Publish before releasing the key so late arrivals see a hit.
        let chunks = Arc::clone(&entry.chunks);
        self.entries.insert(doc_id.to_string(), entry);
        self.inflight.remove(doc_id);
        debug!(doc_id, chunks = chunks.len(), "unbounded chunk cache filled");
        Ok(chunks)
    }

    fn clear(&self) {
        let dropped = self.entries.len();
        self.entries.clear();
        info!(dropped, "unbounded chunk cache cleared");
    }

    fn mode(&self) -> CacheMode {
        CacheMode::Degraded
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            mode: CacheMode::Degraded,
            entries: self.entries.len() as u64,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
        }
    }
}
