//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines the dense and sparse ranked lists into a single fused ranking
//! without requiring score normalization across the two retrieval methods.

use std::collections::HashMap;

use sift_core::models::{SearchCandidate, SearchHit};

/// Which input list a hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Dense,
    Sparse,
}

/// Fuse dense and sparse hits using Reciprocal Rank Fusion.
///
/// Ranks are 1-based positions in each list. A chunk absent from a list
/// contributes nothing for it; a chunk repeated within one list counts only
/// at its first (best) position. Output is sorted by fused score descending,
/// ties broken by `chunk_id` ascending, with `boosted_score == rrf_score`.
pub fn fuse(dense: &[SearchHit], sparse: &[SearchHit], k: u32) -> Vec<SearchCandidate> {
    let mut candidates: Vec<SearchCandidate> = Vec::with_capacity(dense.len() + sparse.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (source, hits) in [(Source::Dense, dense), (Source::Sparse, sparse)] {
        for (i, hit) in hits.iter().enumerate() {
            let rank = i + 1;
            let pos = *positions
                .entry(hit.chunk.chunk_id.clone())
                .or_insert_with(|| {
                    candidates.push(empty_candidate(hit));
                    candidates.len() - 1
                });
            let candidate = &mut candidates[pos];

            let slot = match source {
                Source::Dense => (&mut candidate.dense_rank, &mut candidate.dense_score),
                Source::Sparse => (&mut candidate.sparse_rank, &mut candidate.sparse_score),
            };
            if slot.0.is_some() {
                continue;
            }
            *slot.0 = Some(rank);
            *slot.1 = Some(hit.score);
            candidate.rrf_score += 1.0 / (k as f64 + rank as f64);
        }
    }

    for c in &mut candidates {
        c.boosted_score = c.rrf_score;
    }
    sort_by_score(&mut candidates, |c| c.rrf_score);
    candidates
}

fn empty_candidate(hit: &SearchHit) -> SearchCandidate {
    SearchCandidate {
        chunk: hit.chunk.clone(),
        dense_score: None,
        sparse_score: None,
        dense_rank: None,
        sparse_rank: None,
        rrf_score: 0.0,
        boosted_score: 0.0,
        applied_boosts: Vec::new(),
    }
}

/// Sort descending by `score`, ties broken by `chunk_id` ascending.
pub(crate) fn sort_by_score(candidates: &mut [SearchCandidate], score: impl Fn(&SearchCandidate) -> f64) {
    candidates.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk.chunk_id.cmp(&b.chunk.chunk_id))
    });
}
