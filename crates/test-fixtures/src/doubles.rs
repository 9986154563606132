//! In-memory stand-ins for the external collaborators.
//!
//! Each double counts its calls and can be told to fail or to run slow, so
//! tests can drive the degradation paths without a network.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use sift_core::errors::{CacheError, SiftResult, UpstreamError};
use sift_core::models::{Chunk, PipelineStage, SearchHit, SparseVector};
use sift_core::traits::{IChunkFetcher, IRerankScorer, IVectorIndex};

use crate::corpus::CorpusFixture;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

/// Sleep for `latency`, or fail with a timeout if it exceeds `timeout`.
fn simulate_latency(
    latency: Option<Duration>,
    timeout: Duration,
    stage: PipelineStage,
) -> Result<(), UpstreamError> {
    match latency {
        Some(l) if l > timeout => Err(UpstreamError::Timeout {
            stage,
            timeout_ms: timeout.as_millis() as u64,
        }),
        Some(l) => {
            std::thread::sleep(l);
            Ok(())
        }
        None => Ok(()),
    }
}

#[derive(Debug, Clone)]
struct IndexedChunk {
    chunk: Chunk,
    dense: Vec<f32>,
    sparse: SparseVector,
}

#[derive(Debug, Default)]
struct IndexFaults {
    dense_error: Option<UpstreamError>,
    sparse_error: Option<UpstreamError>,
    fetch_error: Option<UpstreamError>,
    dense_latency: Option<Duration>,
    sparse_latency: Option<Duration>,
    fetch_latency: Option<Duration>,
    hidden_from_fetch: HashSet<String>,
}

/// Vector index over a fixed set of chunks.
///
/// Dense scores are dot products, sparse scores are weighted term overlap.
/// Explicit rankings, when set, replace vector scoring for that side.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    chunks: Vec<IndexedChunk>,
    dense_ranking: Option<Vec<(String, f64)>>,
    sparse_ranking: Option<Vec<(String, f64)>>,
    faults: Mutex<IndexFaults>,
    dense_calls: AtomicUsize,
    sparse_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_corpus(corpus: &CorpusFixture) -> Self {
        let mut index = Self::new();
        for doc in &corpus.documents {
            for (chunk, dense, sparse) in doc.to_chunks() {
                index = index.with_vectors(chunk, dense, sparse);
            }
        }
        index
    }

    /// Chunks without vectors; pair with explicit rankings.
    pub fn with_chunks(mut self, chunks: impl IntoIterator<Item = Chunk>) -> Self {
        for chunk in chunks {
            self.chunks.push(IndexedChunk {
                chunk,
                dense: Vec::new(),
                sparse: SparseVector::default(),
            });
        }
        self
    }

    pub fn with_vectors(mut self, chunk: Chunk, dense: Vec<f32>, sparse: SparseVector) -> Self {
        self.chunks.push(IndexedChunk {
            chunk,
            dense,
            sparse,
        });
        self
    }

    /// Fix the dense result list to these `(chunk_id, score)` pairs.
    pub fn with_dense_ranking(mut self, ranking: &[(&str, f64)]) -> Self {
        self.dense_ranking = Some(ranking.iter().map(|(id, s)| (id.to_string(), *s)).collect());
        self
    }

    /// Fix the sparse result list to these `(chunk_id, score)` pairs.
    pub fn with_sparse_ranking(mut self, ranking: &[(&str, f64)]) -> Self {
        self.sparse_ranking = Some(ranking.iter().map(|(id, s)| (id.to_string(), *s)).collect());
        self
    }

    pub fn fail_dense(&self, error: UpstreamError) {
        lock(&self.faults).dense_error = Some(error);
    }

    pub fn fail_sparse(&self, error: UpstreamError) {
        lock(&self.faults).sparse_error = Some(error);
    }

    pub fn fail_fetch(&self, error: UpstreamError) {
        lock(&self.faults).fetch_error = Some(error);
    }

    pub fn set_dense_latency(&self, latency: Duration) {
        lock(&self.faults).dense_latency = Some(latency);
    }

    pub fn set_sparse_latency(&self, latency: Duration) {
        lock(&self.faults).sparse_latency = Some(latency);
    }

    pub fn set_fetch_latency(&self, latency: Duration) {
        lock(&self.faults).fetch_latency = Some(latency);
    }

    /// Search can still return the chunk, but fetching its document omits it.
    pub fn hide_from_fetch(&self, chunk_id: &str) {
        lock(&self.faults).hidden_from_fetch.insert(chunk_id.to_string());
    }

    pub fn clear_faults(&self) {
        *lock(&self.faults) = IndexFaults::default();
    }

    pub fn dense_calls(&self) -> usize {
        self.dense_calls.load(Ordering::SeqCst)
    }

    pub fn sparse_calls(&self) -> usize {
        self.sparse_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn chunk_by_id(&self, chunk_id: &str) -> Option<&Chunk> {
        self.chunks
            .iter()
            .find(|c| c.chunk.chunk_id == chunk_id)
            .map(|c| &c.chunk)
    }

    fn ranked(&self, ranking: &[(String, f64)], k: usize) -> Vec<SearchHit> {
        ranking
            .iter()
            .filter_map(|(id, score)| self.chunk_by_id(id).map(|c| SearchHit::new(c.clone(), *score)))
            .take(k)
            .collect()
    }

    fn top_k(&self, mut scored: Vec<(f64, &Chunk)>, k: usize) -> Vec<SearchHit> {
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.chunk_id.cmp(&b.1.chunk_id))
        });
        scored
            .into_iter()
            .take(k)
            .map(|(score, chunk)| SearchHit::new(chunk.clone(), score))
            .collect()
    }
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum()
}

fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let weights: HashMap<u32, f32> = b.indices.iter().copied().zip(b.values.iter().copied()).collect();
    a.indices
        .iter()
        .zip(&a.values)
        .filter_map(|(i, v)| weights.get(i).map(|w| f64::from(*v) * f64::from(*w)))
        .sum()
}

impl IVectorIndex for InMemoryIndex {
    fn dense_search(&self, vector: &[f32], k: usize, timeout: Duration) -> SiftResult<Vec<SearchHit>> {
        self.dense_calls.fetch_add(1, Ordering::SeqCst);
        let (error, latency) = {
            let faults = lock(&self.faults);
            (faults.dense_error.clone(), faults.dense_latency)
        };
        if let Some(e) = error {
            return Err(e.into());
        }
        simulate_latency(latency, timeout, PipelineStage::DenseSearch)?;

        if let Some(ranking) = &self.dense_ranking {
            return Ok(self.ranked(ranking, k));
        }
        let scored = self
            .chunks
            .iter()
            .filter(|c| !c.dense.is_empty())
            .map(|c| (dot(vector, &c.dense), &c.chunk))
            .collect();
        Ok(self.top_k(scored, k))
    }

    fn sparse_search(
        &self,
        vector: &SparseVector,
        k: usize,
        timeout: Duration,
    ) -> SiftResult<Vec<SearchHit>> {
        self.sparse_calls.fetch_add(1, Ordering::SeqCst);
        let (error, latency) = {
            let faults = lock(&self.faults);
            (faults.sparse_error.clone(), faults.sparse_latency)
        };
        if let Some(e) = error {
            return Err(e.into());
        }
        simulate_latency(latency, timeout, PipelineStage::SparseSearch)?;

        if let Some(ranking) = &self.sparse_ranking {
            return Ok(self.ranked(ranking, k));
        }
        let scored = self
            .chunks
            .iter()
            .map(|c| (sparse_dot(vector, &c.sparse), &c.chunk))
            .filter(|(score, _)| *score > 0.0)
            .collect();
        Ok(self.top_k(scored, k))
    }

    fn fetch_by_doc_id(
        &self,
        doc_id: &str,
        _batch_size: usize,
        timeout: Duration,
    ) -> SiftResult<Vec<Chunk>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let (error, latency, hidden) = {
            let faults = lock(&self.faults);
            (
                faults.fetch_error.clone(),
                faults.fetch_latency,
                faults.hidden_from_fetch.clone(),
            )
        };
        if let Some(e) = error {
            return Err(e.into());
        }
        simulate_latency(latency, timeout, PipelineStage::ChunkFetch)?;

        let mut chunks: Vec<Chunk> = self
            .chunks
            .iter()
            .filter(|c| c.chunk.doc_id == doc_id && !hidden.contains(&c.chunk.chunk_id))
            .map(|c| c.chunk.clone())
            .collect();
        chunks.sort_by_key(|c| c.index);
        Ok(chunks)
    }
}

/// Chunk fetcher over a fixed document map that counts every call.
#[derive(Debug, Default)]
pub struct CountingFetcher {
    documents: BTreeMap<String, Vec<Chunk>>,
    latency: Option<Duration>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, doc_id: &str, chunks: Vec<Chunk>) -> Self {
        self.documents.insert(doc_id.to_string(), chunks);
        self
    }

    /// Every fetch sleeps this long before returning.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn failing_for(mut self, doc_id: &str) -> Self {
        self.failing.insert(doc_id.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IChunkFetcher for CountingFetcher {
    fn fetch(&self, doc_id: &str) -> SiftResult<Vec<Chunk>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        if self.failing.contains(doc_id) {
            return Err(CacheError::FetchFailed {
                doc_id: doc_id.to_string(),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        Ok(self.documents.get(doc_id).cloned().unwrap_or_default())
    }
}

/// Scores a passage by the fraction of query terms it contains.
#[derive(Debug, Default)]
pub struct KeywordScorer {
    calls: AtomicUsize,
}

impl KeywordScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IRerankScorer for KeywordScorer {
    fn score(&self, query: &str, passages: &[String], _timeout: Duration) -> SiftResult<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Ok(vec![0.0; passages.len()]);
        }
        Ok(passages
            .iter()
            .map(|p| {
                let lower = p.to_lowercase();
                let hits = terms.iter().filter(|t| lower.contains(t.as_str())).count();
                hits as f64 / terms.len() as f64
            })
            .collect())
    }

    fn name(&self) -> &str {
        "keyword-overlap"
    }
}

/// Always fails with the configured error.
#[derive(Debug)]
pub struct FailingScorer {
    error: UpstreamError,
}

impl FailingScorer {
    pub fn new(error: UpstreamError) -> Self {
        Self { error }
    }

    pub fn timeout() -> Self {
        Self::new(UpstreamError::Timeout {
            stage: PipelineStage::Rerank,
            timeout_ms: 2000,
        })
    }
}

impl IRerankScorer for FailingScorer {
    fn score(&self, _query: &str, _passages: &[String], _timeout: Duration) -> SiftResult<Vec<f64>> {
        Err(self.error.clone().into())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Returns one score fewer than asked for.
#[derive(Debug, Default)]
pub struct ShortScorer;

impl IRerankScorer for ShortScorer {
    fn score(&self, _query: &str, passages: &[String], _timeout: Duration) -> SiftResult<Vec<f64>> {
        Ok(vec![1.0; passages.len().saturating_sub(1)])
    }

    fn name(&self) -> &str {
        "short"
    }
}
