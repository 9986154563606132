//! Walk windows in rank order, drop overlaps, stop at the global budget.

use std::collections::HashSet;

use sift_core::config::ContextConfig;
use sift_core::models::{ContextEntry, MergedWindow};
use sift_tokens::TokenBudget;
use tracing::debug;

/// Ordered context entries and how the walk ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledContext {
    pub entries: Vec<ContextEntry>,
    pub total_tokens: usize,
    /// Windows dropped because one of their chunks was already emitted.
    pub dropped_overlaps: usize,
    /// Whether the walk stopped on a window that did not fit.
    pub truncated: bool,
}

/// Tokens available to passages after holding back `reserve_for_response`.
pub fn global_budget(max_context_tokens: usize, reserve_for_response: f64) -> usize {
    ContextConfig {
        max_context_tokens,
        reserve_for_response,
    }
    .global_budget()
}

#[derive(Debug, Clone, Copy)]
pub struct ContextAssembler {
    budget: usize,
}

impl ContextAssembler {
    pub fn new(global_budget: usize) -> Self {
        Self {
            budget: global_budget,
        }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Windows must arrive in rank order. A window sharing any chunk with an
    /// earlier accepted window is dropped whole; the first window that does
    /// not fit ends the walk. Windows are never split.
    pub fn assemble(&self, windows: Vec<MergedWindow>) -> AssembledContext {
        let mut budget = TokenBudget::new(self.budget);
        let mut emitted: HashSet<String> = HashSet::new();
        let mut out = AssembledContext::default();

        for window in windows {
            if window.merged_chunk_ids.iter().any(|id| emitted.contains(id)) {
                debug!(anchor = %window.anchor_chunk_id, "window overlaps an earlier one, dropped");
                out.dropped_overlaps += 1;
                continue;
            }
            if !budget.try_consume(window.token_count) {
                debug!(
                    anchor = %window.anchor_chunk_id,
                    tokens = window.token_count,
                    remaining = budget.remaining(),
                    "global budget reached"
                );
                out.truncated = true;
                break;
            }
            emitted.extend(window.merged_chunk_ids.iter().cloned());
            out.entries.push(ContextEntry::from(window));
        }

        out.total_tokens = budget.used();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::models::ChunkSpan;

    fn window(anchor: &str, ids: &[&str], tokens: usize, rank: usize) -> MergedWindow {
        MergedWindow {
            anchor_chunk_id: anchor.to_string(),
            doc_id: "d".to_string(),
            url: String::new(),
            title: String::new(),
            chunk_indices: (0..ids.len() as u32).collect(),
            merged_chunk_ids: ids.iter().map(|s| s.to_string()).collect(),
            chunk_span: ChunkSpan::single(0),
            text: anchor.to_string(),
            token_count: tokens,
            auto_merged: ids.len() > 1,
            merged_chunk_count: ids.len(),
            content_length: anchor.len(),
            rank,
            boosted_score: 1.0,
            rerank_score: None,
        }
    }

    #[test]
    fn overlapping_lower_rank_window_is_dropped_whole() {
        let out = ContextAssembler::new(1000).assemble(vec![
            window("d#2", &["d#2", "d#3"], 100, 0),
            window("d#4", &["d#3", "d#4"], 100, 1),
            window("e#0", &["e#0"], 50, 2),
        ]);
        let ranks: Vec<usize> = out.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![0, 2]);
        assert_eq!(out.dropped_overlaps, 1);
        assert_eq!(out.total_tokens, 150);
        assert!(!out.truncated);
    }

    #[test]
    fn stops_at_first_window_that_does_not_fit() {
        let out = ContextAssembler::new(250).assemble(vec![
            window("a", &["a"], 200, 0),
            window("b", &["b"], 100, 1),
            window("c", &["c"], 10, 2),
        ]);
        assert_eq!(out.entries.len(), 1);
        assert!(out.truncated);
        assert_eq!(out.total_tokens, 200);
    }

    #[test]
    fn exact_fit_is_accepted() {
        let out = ContextAssembler::new(300)
            .assemble(vec![window("a", &["a"], 200, 0), window("b", &["b"], 100, 1)]);
        assert_eq!(out.entries.len(), 2);
        assert!(!out.truncated);
    }

    #[test]
    fn budget_formula() {
        assert_eq!(global_budget(6000, 0.25), 4500);
        assert_eq!(global_budget(1001, 0.5), 500);
        assert_eq!(global_budget(100, 0.0), 100);
    }
}
