use std::sync::Arc;
use std::time::Duration;

use sift_core::errors::SiftResult;
use sift_core::models::Chunk;
use sift_core::traits::{IChunkFetcher, IVectorIndex};

/// `fetch_fn` backed by the vector index's batched document fetch.
pub struct IndexChunkFetcher {
    index: Arc<dyn IVectorIndex>,
    batch_size: usize,
    timeout: Duration,
}

impl IndexChunkFetcher {
    pub fn new(index: Arc<dyn IVectorIndex>, batch_size: usize, timeout: Duration) -> Self {
        Self {
            index,
            batch_size,
            timeout,
        }
    }
}

impl IChunkFetcher for IndexChunkFetcher {
    fn fetch(&self, doc_id: &str) -> SiftResult<Vec<Chunk>> {
        self.index
            .fetch_by_doc_id(doc_id, self.batch_size, self.timeout)
    }
}
