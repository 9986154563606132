//! Synthetic chunk and candidate builders.

use sift_core::models::{Chunk, RerankedCandidate, SearchCandidate};

/// Text the heuristic estimator (`chars / 4`) counts as exactly `tokens`.
pub fn text_of_tokens(label: &str, tokens: usize) -> String {
    let target = tokens * 4;
    let mut text = String::with_capacity(target);
    text.push_str(label);
    while text.len() < target {
        text.push('.');
    }
    text.truncate(target);
    text
}

pub fn make_chunk(doc_id: &str, index: u32, text: impl Into<String>) -> Chunk {
    Chunk {
        chunk_id: Chunk::make_id(doc_id, index),
        doc_id: doc_id.to_string(),
        index,
        text: text.into(),
        url: format!("https://docs.example.com/{doc_id}"),
        title: format!("Document {doc_id}"),
        metadata: Default::default(),
    }
}

/// A document whose chunks at `indices` each estimate to `tokens_each`.
pub fn make_document(doc_id: &str, indices: &[u32], tokens_each: usize) -> Vec<Chunk> {
    indices
        .iter()
        .map(|&i| make_chunk(doc_id, i, text_of_tokens(&format!("{doc_id}:{i}"), tokens_each)))
        .collect()
}

/// A reranked candidate wrapping `chunk` with the given scores.
pub fn make_reranked(chunk: Chunk, boosted_score: f64, rerank_score: Option<f64>) -> RerankedCandidate {
    RerankedCandidate {
        candidate: SearchCandidate {
            chunk,
            dense_score: None,
            sparse_score: None,
            dense_rank: None,
            sparse_rank: None,
            rrf_score: boosted_score,
            boosted_score,
            applied_boosts: Vec::new(),
        },
        rerank_score,
    }
}
