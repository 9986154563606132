//! Property tests for fusion, boosting, window expansion, and assembly.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use sift_cache::UnboundedChunkCache;
use sift_core::config::BoostTableConfig;
use sift_core::models::{Chunk, ChunkSpan, MergedWindow, SearchHit};
use sift_retrieval::search::rrf_fusion::fuse;
use sift_retrieval::{boost, global_budget, AutoMergeEngine, BoostTable, ContextAssembler};
use sift_tokens::HeuristicEstimator;
use test_fixtures::{make_chunk, make_reranked, text_of_tokens, CountingFetcher};

fn hits(prefix: &str, n: usize) -> Vec<SearchHit> {
    (0..n)
        .map(|i| SearchHit::new(make_chunk(prefix, i as u32, ""), (n - i) as f64))
        .collect()
}

fn doc(sizes: &[usize]) -> Vec<Chunk> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &tokens)| make_chunk("d", i as u32, text_of_tokens(&format!("d:{i}"), tokens)))
        .collect()
}

fn merger(chunks: Vec<Chunk>) -> AutoMergeEngine {
    let fetcher = Arc::new(CountingFetcher::new().with_document("d", chunks));
    AutoMergeEngine::new(
        Arc::new(UnboundedChunkCache::new(fetcher)),
        Arc::new(HeuristicEstimator),
    )
}

fn window(ids: Vec<String>, tokens: usize, rank: usize) -> MergedWindow {
    MergedWindow {
        anchor_chunk_id: ids[0].clone(),
        doc_id: "d".to_string(),
        url: String::new(),
        title: String::new(),
        chunk_indices: Vec::new(),
        merged_chunk_count: ids.len(),
        merged_chunk_ids: ids,
        chunk_span: ChunkSpan::single(0),
        text: String::new(),
        token_count: tokens,
        auto_merged: false,
        content_length: 0,
        rank,
        boosted_score: 0.0,
        rerank_score: None,
    }
}

proptest! {
    #[test]
    fn rrf_disjoint_lists_keep_every_hit(n in 0usize..40, k in 1u32..200) {
        let fused = fuse(&hits("a", n), &hits("b", n), k);
        prop_assert_eq!(fused.len(), 2 * n);
        for pair in fused.windows(2) {
            prop_assert!(pair[0].rrf_score >= pair[1].rrf_score);
        }
    }

    #[test]
    fn rrf_identical_lists_keep_order(n in 1usize..40, k in 1u32..200) {
        let list = hits("a", n);
        let fused = fuse(&list, &list, k);
        let ids: Vec<&str> = fused.iter().map(|c| c.chunk_id()).collect();
        let expected: Vec<&str> = list.iter().map(|h| h.chunk_id()).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn unmatched_boosts_are_neutral(n in 1usize..30, factor in 0.1f64..10.0) {
        let mut config = BoostTableConfig::default();
        config.page_type.insert("no-such-type".into(), factor);
        config.section.insert("no-such-section".into(), factor);
        let table = BoostTable::compile(&config).unwrap();

        let candidates = fuse(&hits("a", n), &hits("b", n), 60);
        for c in boost(candidates, &table) {
            prop_assert_eq!(c.boosted_score, c.rrf_score);
            prop_assert!(c.applied_boosts.is_empty());
        }
    }

    #[test]
    fn window_respects_budget(
        sizes in prop::collection::vec(1usize..200, 1..12),
        anchor_seed in any::<prop::sample::Index>(),
        budget in 1usize..600,
    ) {
        let chunks = doc(&sizes);
        let anchor = anchor_seed.index(chunks.len());
        let engine = merger(chunks.clone());
        let (w, event) = engine.merge_one(&make_reranked(chunks[anchor].clone(), 1.0, None), 0, budget);

        prop_assert!(event.is_none());
        prop_assert!(w.chunk_indices.contains(&(anchor as u32)));
        if w.token_count > budget {
            prop_assert_eq!(w.merged_chunk_count, 1);
            prop_assert!(!w.auto_merged);
        }
        for pair in w.chunk_indices.windows(2) {
            prop_assert_eq!(pair[1], pair[0] + 1);
        }
        prop_assert_eq!(w.auto_merged, w.merged_chunk_count > 1);
    }

    #[test]
    fn maximal_window_is_a_fixed_point(
        sizes in prop::collection::vec(1usize..200, 1..12),
        anchor_seed in any::<prop::sample::Index>(),
        budget in 1usize..600,
    ) {
        let chunks = doc(&sizes);
        let anchor = make_reranked(chunks[anchor_seed.index(chunks.len())].clone(), 1.0, None);
        let engine = merger(chunks);

        let (first, _) = engine.merge_one(&anchor, 0, budget);
        prop_assume!(first.token_count <= budget);
        let (again, _) = engine.merge_one(&anchor, 0, first.token_count);
        prop_assert_eq!(&again.chunk_indices, &first.chunk_indices);
        prop_assert_eq!(again.token_count, first.token_count);
    }

    #[test]
    fn assembly_dedups_and_fits_budget(
        layouts in prop::collection::vec((0u32..30, 1usize..4, 1usize..400), 0..20),
        budget in 0usize..2000,
    ) {
        let windows: Vec<MergedWindow> = layouts
            .iter()
            .enumerate()
            .map(|(rank, &(start, len, tokens))| {
                let ids = (start..start + len as u32).map(|i| format!("d#{i}")).collect();
                window(ids, tokens, rank)
            })
            .collect();

        let out = ContextAssembler::new(budget).assemble(windows);
        let total: usize = out.entries.iter().map(|e| e.token_count).sum();
        prop_assert!(total <= budget);
        prop_assert_eq!(total, out.total_tokens);

        let mut seen = HashSet::new();
        for e in &out.entries {
            for id in &e.merged_chunk_ids {
                prop_assert!(seen.insert(id.clone()));
            }
        }
        for pair in out.entries.windows(2) {
            prop_assert!(pair[0].rank < pair[1].rank);
        }
    }

    #[test]
    fn global_budget_is_floor(max in 0usize..100_000, reserve in 0.0f64..0.99) {
        let b = global_budget(max, reserve);
        prop_assert!(b <= max);
        prop_assert_eq!(b, (max as f64 * (1.0 - reserve)).floor() as usize);
    }
}
