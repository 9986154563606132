//! Per-anchor window expansion under a token budget.
//!
//! Each candidate runs `Init → Expand → Finalize`. Expansion alternates
//! right then left, one neighbor at a time, and a direction closes at the
//! document boundary or at its first rejected neighbor. The budget is checked
//! against the estimate of the joined prospective window text.

use std::sync::Arc;

use rayon::prelude::*;
use sift_core::constants::DEFAULT_WINDOW_SEPARATOR;
use sift_core::models::{
    Chunk, ChunkSpan, DegradationEvent, DegradationKind, MergedWindow, PipelineStage,
    RerankedCandidate,
};
use sift_core::traits::{IChunkCache, ITokenEstimator};
use sift_observability::merge_span;
use tracing::{debug, warn};

use crate::degradation;

/// Windows in rank order, plus the orphan and fetch-failure events.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub windows: Vec<MergedWindow>,
    pub degradations: Vec<DegradationEvent>,
}

/// Contiguous run `[lo, hi]` of a document's sorted chunks being grown.
struct Expansion {
    chunks: Arc<Vec<Chunk>>,
    lo: usize,
    hi: usize,
    tokens: usize,
    right_open: bool,
    left_open: bool,
}

enum MergeState {
    Init,
    Expand(Expansion),
    Finalize(Expansion),
    /// Emit the anchor as-is.
    Passthrough(Option<DegradationEvent>),
}

pub struct AutoMergeEngine {
    cache: Arc<dyn IChunkCache>,
    estimator: Arc<dyn ITokenEstimator>,
    separator: String,
}

impl AutoMergeEngine {
    pub fn new(cache: Arc<dyn IChunkCache>, estimator: Arc<dyn ITokenEstimator>) -> Self {
        Self {
            cache,
            estimator,
            separator: DEFAULT_WINDOW_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// One window per candidate, in the candidates' order.
    ///
    /// Windows are built in parallel. Overlap between windows is left for
    /// the assembler.
    pub fn merge(&self, reranked: &[RerankedCandidate], max_window_tokens: usize) -> MergeOutcome {
        let _span = merge_span!(reranked.len(), max_window_tokens).entered();

        let results: Vec<(MergedWindow, Option<DegradationEvent>)> = reranked
            .par_iter()
            .enumerate()
            .map(|(rank, candidate)| self.merge_one(candidate, rank, max_window_tokens))
            .collect();

        let mut outcome = MergeOutcome::default();
        for (window, event) in results {
            outcome.windows.push(window);
            outcome.degradations.extend(event);
        }
        debug!(
            windows = outcome.windows.len(),
            merged = outcome.windows.iter().filter(|w| w.auto_merged).count(),
            "auto-merge complete"
        );
        outcome
    }

    /// Build the window for a single anchor at rerank position `rank`.
    pub fn merge_one(
        &self,
        candidate: &RerankedCandidate,
        rank: usize,
        max_window_tokens: usize,
    ) -> (MergedWindow, Option<DegradationEvent>) {
        let mut state = MergeState::Init;
        loop {
            state = match state {
                MergeState::Init => self.init(candidate, max_window_tokens),
                MergeState::Expand(exp) => self.expand_round(exp, max_window_tokens),
                MergeState::Finalize(exp) => {
                    return (self.finalize(candidate, rank, &exp), None);
                }
                MergeState::Passthrough(event) => {
                    return (self.passthrough(candidate, rank), event);
                }
            };
        }
    }

    fn init(&self, candidate: &RerankedCandidate, max_window_tokens: usize) -> MergeState {
        if max_window_tokens == 0 {
            return MergeState::Passthrough(None);
        }

        let anchor = candidate.chunk();
        let chunks = match self.cache.get(&anchor.doc_id) {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!(doc_id = %anchor.doc_id, error = %e, "chunk fetch failed, emitting anchor unmerged");
                return MergeState::Passthrough(Some(degradation::stage_failed(
                    PipelineStage::ChunkFetch,
                    &e,
                    "anchor emitted unmerged",
                )));
            }
        };

        let Some(pos) = chunks.iter().position(|c| c.chunk_id == anchor.chunk_id) else {
            warn!(chunk_id = %anchor.chunk_id, doc_id = %anchor.doc_id, "anchor not in its document");
            return MergeState::Passthrough(Some(DegradationEvent::new(
                PipelineStage::AutoMerge.as_str(),
                DegradationKind::OrphanChunk,
                format!("chunk {} not found in document {}", anchor.chunk_id, anchor.doc_id),
                "anchor emitted unmerged",
            )));
        };

        let tokens = self.estimator.estimate(&chunks[pos].text);
        if tokens > max_window_tokens {
            return MergeState::Passthrough(None);
        }

        MergeState::Expand(Expansion {
            chunks,
            lo: pos,
            hi: pos,
            tokens,
            right_open: true,
            left_open: true,
        })
    }

    /// One round: try right, then left.
    fn expand_round(&self, mut exp: Expansion, budget: usize) -> MergeState {
        if exp.right_open {
            if exp.hi + 1 >= exp.chunks.len() {
                exp.right_open = false;
            } else {
                match self.fits(&exp.chunks[exp.lo..=exp.hi + 1], budget) {
                    Some(tokens) => {
                        exp.hi += 1;
                        exp.tokens = tokens;
                    }
                    None => exp.right_open = false,
                }
            }
        }

        if exp.left_open {
            if exp.lo == 0 {
                exp.left_open = false;
            } else {
                match self.fits(&exp.chunks[exp.lo - 1..=exp.hi], budget) {
                    Some(tokens) => {
                        exp.lo -= 1;
                        exp.tokens = tokens;
                    }
                    None => exp.left_open = false,
                }
            }
        }

        if exp.right_open || exp.left_open {
            MergeState::Expand(exp)
        } else {
            MergeState::Finalize(exp)
        }
    }

    /// Token count of `span` joined, if it is within `budget`.
    fn fits(&self, span: &[Chunk], budget: usize) -> Option<usize> {
        let tokens = self.estimator.estimate(&self.join(span));
        (tokens <= budget).then_some(tokens)
    }

    fn join(&self, span: &[Chunk]) -> String {
        span.iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    fn finalize(&self, candidate: &RerankedCandidate, rank: usize, exp: &Expansion) -> MergedWindow {
        let span = &exp.chunks[exp.lo..=exp.hi];
        let text = self.join(span);
        window(candidate, rank, span, text, exp.tokens)
    }

    fn passthrough(&self, candidate: &RerankedCandidate, rank: usize) -> MergedWindow {
        let anchor = candidate.chunk();
        let tokens = self.estimator.estimate(&anchor.text);
        window(
            candidate,
            rank,
            std::slice::from_ref(anchor),
            anchor.text.clone(),
            tokens,
        )
    }
}

fn window(
    candidate: &RerankedCandidate,
    rank: usize,
    span: &[Chunk],
    text: String,
    token_count: usize,
) -> MergedWindow {
    let anchor = candidate.chunk();
    let chunk_indices: Vec<u32> = span.iter().map(|c| c.index).collect();
    let chunk_span = ChunkSpan {
        start: chunk_indices.first().copied().unwrap_or(anchor.index),
        end: chunk_indices.last().copied().unwrap_or(anchor.index),
    };
    MergedWindow {
        anchor_chunk_id: anchor.chunk_id.clone(),
        doc_id: anchor.doc_id.clone(),
        url: anchor.url.clone(),
        title: anchor.title.clone(),
        merged_chunk_ids: span.iter().map(|c| c.chunk_id.clone()).collect(),
        chunk_span,
        content_length: text.chars().count(),
        text,
        token_count,
        auto_merged: span.len() > 1,
        merged_chunk_count: span.len(),
        chunk_indices,
        rank,
        boosted_score: candidate.candidate.boosted_score,
        rerank_score: candidate.rerank_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_cache::UnboundedChunkCache;
    use sift_core::errors::SiftResult;
    use sift_tokens::HeuristicEstimator;
    use test_fixtures::{make_document, make_reranked, CountingFetcher};

    fn engine(chunks: Vec<Chunk>) -> AutoMergeEngine {
        let fetcher = Arc::new(CountingFetcher::new().with_document("d", chunks));
        AutoMergeEngine::new(
            Arc::new(UnboundedChunkCache::new(fetcher)),
            Arc::new(HeuristicEstimator),
        )
    }

    fn anchor(chunks: &[Chunk], index: u32) -> RerankedCandidate {
        let chunk = chunks.iter().find(|c| c.index == index).cloned().unwrap();
        make_reranked(chunk, 1.0, Some(0.9))
    }

    #[test]
    fn right_is_tried_before_left() {
        let doc = make_document("d", &[0, 1, 2, 3, 4], 100);
        let (w, event) = engine(doc.clone()).merge_one(&anchor(&doc, 2), 0, 250);
        assert!(event.is_none());
        assert_eq!(w.chunk_indices, vec![2, 3]);
        assert_eq!(w.chunk_span, ChunkSpan { start: 2, end: 3 });
        assert!(w.auto_merged);
        assert!(w.token_count <= 250);
    }

    #[test]
    fn expands_both_ways_with_room() {
        let doc = make_document("d", &[0, 1, 2, 3, 4], 100);
        let (w, _) = engine(doc.clone()).merge_one(&anchor(&doc, 2), 0, 1000);
        assert_eq!(w.chunk_indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(w.merged_chunk_count, 5);
        assert_eq!(w.merged_chunk_ids.first().map(String::as_str), Some("d#0"));
    }

    #[test]
    fn closed_right_keeps_growing_left() {
        let mut doc = make_document("d", &[0, 1, 2], 50);
        doc.extend(make_document("d", &[3], 500));
        let (w, _) = engine(doc.clone()).merge_one(&anchor(&doc, 2), 0, 160);
        assert_eq!(w.chunk_indices, vec![0, 1, 2]);
    }

    #[test]
    fn gaps_are_neighbors() {
        let doc = make_document("d", &[0, 5, 9], 10);
        let (w, _) = engine(doc.clone()).merge_one(&anchor(&doc, 5), 0, 1000);
        assert_eq!(w.chunk_indices, vec![0, 5, 9]);
        assert_eq!(w.chunk_span, ChunkSpan { start: 0, end: 9 });
    }

    #[test]
    fn oversized_anchor_is_emitted_alone() {
        let doc = make_document("d", &[0, 1, 2], 300);
        let (w, event) = engine(doc.clone()).merge_one(&anchor(&doc, 1), 0, 250);
        assert!(event.is_none());
        assert_eq!(w.chunk_indices, vec![1]);
        assert!(!w.auto_merged);
        assert_eq!(w.token_count, 300);
    }

    #[test]
    fn zero_budget_passes_through_without_fetching() {
        let doc = make_document("d", &[0, 1], 10);
        let fetcher = Arc::new(CountingFetcher::new().with_document("d", doc.clone()));
        let engine = AutoMergeEngine::new(
            Arc::new(UnboundedChunkCache::new(fetcher.clone())),
            Arc::new(HeuristicEstimator),
        );
        let (w, event) = engine.merge_one(&anchor(&doc, 0), 3, 0);
        assert!(!w.auto_merged);
        assert_eq!(w.rank, 3);
        assert!(event.is_none());
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn anchor_missing_from_document_is_orphan() {
        let doc = make_document("d", &[0, 1, 2], 10);
        let stale = make_document("d", &[7], 10).remove(0);
        let (w, event) =
            engine(doc).merge_one(&make_reranked(stale, 1.0, None), 0, 500);
        assert_eq!(w.chunk_indices, vec![7]);
        assert!(!w.auto_merged);
        assert_eq!(event.unwrap().kind, DegradationKind::OrphanChunk);
    }

    #[test]
    fn fetch_failure_is_orphan_not_error() {
        let failing = Arc::new(|doc_id: &str| -> SiftResult<Vec<Chunk>> {
            Err(sift_core::errors::CacheError::FetchFailed {
                doc_id: doc_id.to_string(),
                reason: "index down".into(),
            }
            .into())
        });
        let engine = AutoMergeEngine::new(
            Arc::new(UnboundedChunkCache::new(failing)),
            Arc::new(HeuristicEstimator),
        );
        let doc = make_document("d", &[0], 10);
        let (w, event) = engine.merge_one(&anchor(&doc, 0), 0, 500);
        assert_eq!(w.merged_chunk_count, 1);
        assert_eq!(event.unwrap().kind, DegradationKind::UpstreamFailure);
    }

    #[test]
    fn merge_keeps_rank_order() {
        let doc = make_document("d", &[0, 1, 2, 3], 10);
        let candidates: Vec<RerankedCandidate> =
            [3, 0, 2].iter().map(|&i| anchor(&doc, i)).collect();
        let out = engine(doc).merge(&candidates, 15);
        let anchors: Vec<&str> = out.windows.iter().map(|w| w.anchor_chunk_id.as_str()).collect();
        assert_eq!(anchors, vec!["d#3", "d#0", "d#2"]);
        let ranks: Vec<usize> = out.windows.iter().map(|w| w.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn custom_separator_is_used() {
        let doc = make_document("d", &[0, 1], 10);
        let (w, _) = engine(doc.clone())
            .with_separator(" | ")
            .merge_one(&anchor(&doc, 0), 0, 100);
        assert!(w.text.contains(" | "));
        assert_eq!(w.content_length, w.text.chars().count());
    }
}
