use std::sync::Arc;

use crate::errors::SiftResult;
use crate::models::{CacheMode, CacheStats, Chunk};

/// Loads the full chunk list of a document on a cache miss.
pub trait IChunkFetcher: Send + Sync {
    fn fetch(&self, doc_id: &str) -> SiftResult<Vec<Chunk>>;
}

impl<F> IChunkFetcher for F
where
    F: Fn(&str) -> SiftResult<Vec<Chunk>> + Send + Sync,
{
    fn fetch(&self, doc_id: &str) -> SiftResult<Vec<Chunk>> {
        self(doc_id)
    }
}

/// Document id → ordered chunk list, shared across concurrent queries.
///
/// Returned lists are read-only snapshots sorted by `Chunk::index`.
pub trait IChunkCache: Send + Sync {
    /// Chunks of `doc_id`, fetching on a miss or a cold entry.
    fn get(&self, doc_id: &str) -> SiftResult<Arc<Vec<Chunk>>>;

    /// Drop every entry.
    fn clear(&self);

    /// Which implementation is active.
    fn mode(&self) -> CacheMode;

    /// Current counters.
    fn stats(&self) -> CacheStats;
}
