use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sift_core::errors::{CacheError, SiftResult};
use sift_core::models::Chunk;

/// A cached document. Immutable once stored; callers share the `Arc`.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub doc_id: String,
    pub chunks: Arc<Vec<Chunk>>,
    pub fetched_at: DateTime<Utc>,
    /// `None` in degraded mode.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Build an entry from a fresh fetch. Sorts by `index`; an empty list is
    /// `DocumentNotFound`.
    pub fn from_fetch(
        doc_id: &str,
        mut chunks: Vec<Chunk>,
        fetched_at: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> SiftResult<Self> {
        if chunks.is_empty() {
            return Err(CacheError::DocumentNotFound {
                doc_id: doc_id.to_string(),
            }
            .into());
        }
        chunks.sort_by_key(|c| c.index);
        chunks.dedup_by(|a, b| a.chunk_id == b.chunk_id);
        let expires_at = ttl.and_then(|ttl| {
            chrono::Duration::from_std(ttl)
                .ok()
                .and_then(|ttl| fetched_at.checked_add_signed(ttl))
        });
        Ok(Self {
            doc_id: doc_id.to_string(),
            chunks: Arc::new(chunks),
            fetched_at,
            expires_at,
        })
    }

    /// Cold entries must be refetched before use.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}
