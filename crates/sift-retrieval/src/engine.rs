//! RetrievalEngine: implements IRetriever and runs the whole pipeline.
//!
//! search (dense ‖ sparse → RRF) → boost → rerank (top N in, top K out)
//! → auto-merge → assemble.
//!
//! Every external failure is recovered inside its stage and surfaces as a
//! `DegradationEvent` on the outcome; a query never fails because a
//! collaborator did.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Instant;

use sift_cache::{build_chunk_cache, degraded_cache_event, IndexChunkFetcher};
use sift_core::config::{BoostTableConfig, SiftConfig};
use sift_core::errors::SiftResult;
use sift_core::models::{
    CacheMode, CacheStats, ContextEntry, DegradationEvent, DegradationKind, QueryStats,
    QueryVectors, RetrievalOutcome,
};
use sift_core::traits::{IChunkCache, IRerankScorer, IRetriever, ITokenEstimator, IVectorIndex};
use sift_observability::tracing_setup::events;
use sift_observability::{retrieval_span, DegradationTracker, QueryLog, QueryLogEntry, TrackedDegradation};
use sift_tokens::select_estimator;
use tracing::{debug, info};
use uuid::Uuid;

use crate::assembly::ContextAssembler;
use crate::boost::{boost_with_routing, BoostTable, ThemeRouting};
use crate::merge::AutoMergeEngine;
use crate::rerank::RerankAdapter;
use crate::search::HybridSearcher;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

/// The main retrieval engine. Shared across concurrent queries.
pub struct RetrievalEngine {
    config: SiftConfig,
    searcher: HybridSearcher,
    boost_table: RwLock<Arc<BoostTable>>,
    reranker: RerankAdapter,
    merger: AutoMergeEngine,
    assembler: ContextAssembler,
    cache: Arc<dyn IChunkCache>,
    tracker: Mutex<DegradationTracker>,
    query_log: Mutex<QueryLog>,
}

impl RetrievalEngine {
    /// Build from validated config and injected collaborators.
    ///
    /// `scorer = None` disables reranking; candidates keep their boosted order.
    pub fn new(
        config: SiftConfig,
        index: Arc<dyn IVectorIndex>,
        scorer: Option<Arc<dyn IRerankScorer>>,
        estimator: Arc<dyn ITokenEstimator>,
        cache: Arc<dyn IChunkCache>,
    ) -> SiftResult<Self> {
        config.validate()?;
        let table = BoostTable::compile(&config.boost_table)?;

        let reranker = match scorer {
            Some(scorer) => RerankAdapter::new(scorer, config.reranker.timeout()),
            None => RerankAdapter::passthrough(),
        };
        let merger = AutoMergeEngine::new(Arc::clone(&cache), estimator)
            .with_separator(config.merge.separator.clone());

        let mut tracker = DegradationTracker::new();
        events::cache_mode_selected(cache.mode());
        if cache.mode() == CacheMode::Degraded {
            tracker.record(degraded_cache_event());
        }

        info!(
            top_k = config.retrieval.top_k,
            max_candidates_n = config.retrieval.max_candidates_n,
            max_window_tokens = config.merge.effective_window_tokens(),
            global_budget = config.context.global_budget(),
            boost_rules = table.rule_count(),
            reranker = reranker.is_enabled(),
            "retrieval engine initialized"
        );

        Ok(Self {
            searcher: HybridSearcher::new(index, config.retrieval.clone()),
            boost_table: RwLock::new(Arc::new(table)),
            reranker,
            merger,
            assembler: ContextAssembler::new(config.context.global_budget()),
            cache,
            tracker: Mutex::new(tracker),
            query_log: Mutex::new(QueryLog::new()),
            config,
        })
    }

    /// Build the estimator, chunk cache, and HTTP scorer from `config`.
    pub fn from_config(config: SiftConfig, index: Arc<dyn IVectorIndex>) -> SiftResult<Self> {
        config.validate()?;
        let estimator = select_estimator(&config.tokens)?;
        let fetcher = Arc::new(IndexChunkFetcher::new(
            Arc::clone(&index),
            config.merge.fetch_batch_size,
            config.merge.fetch_timeout(),
        ));
        let cache = build_chunk_cache(&config.cache, fetcher);
        let scorer = http_scorer(&config)?;
        Self::new(config, index, scorer, estimator, cache)
    }

    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    /// Run the pipeline, scaling thematic boosts by `routing` when given.
    pub fn retrieve_with_routing(
        &self,
        query: &str,
        vectors: &QueryVectors,
        routing: Option<&ThemeRouting>,
    ) -> SiftResult<RetrievalOutcome> {
        let started = Instant::now();
        let query_id = Uuid::new_v4().to_string();
        let _span = retrieval_span!(query_id, query.len()).entered();

        let mut degradations = Vec::new();
        let mut stats = QueryStats {
            token_budget: self.assembler.budget(),
            ..Default::default()
        };

        let search = self.searcher.search(vectors);
        stats.dense_hits = search.dense_hits;
        stats.sparse_hits = search.sparse_hits;
        stats.fused = search.candidates.len();
        degradations.extend(search.degradations);

        // Snapshot: a concurrent reload does not affect this request.
        let table = self.boost_table();
        let mut candidates = boost_with_routing(search.candidates, &table, routing);
        candidates.truncate(self.config.retrieval.max_candidates_n);

        if candidates.is_empty() {
            debug!("no candidates found");
            degradations.push(DegradationEvent::new(
                "retrieval",
                DegradationKind::EmptyCandidateSet,
                "search returned no candidates",
                "empty context",
            ));
            return Ok(self.finish(query_id, Vec::new(), degradations, stats, started));
        }

        let reranked = self
            .reranker
            .rerank(query, candidates, self.config.retrieval.top_k);
        stats.reranked = reranked.candidates.len();
        degradations.extend(reranked.degradation);

        let merged = self.merger.merge(
            &reranked.candidates,
            self.config.merge.effective_window_tokens(),
        );
        stats.windows = merged.windows.len();
        degradations.extend(merged.degradations);

        let assembled = self.assembler.assemble(merged.windows);
        stats.entries = assembled.entries.len();
        stats.dropped_overlaps = assembled.dropped_overlaps;
        stats.truncated = assembled.truncated;
        stats.tokens_used = assembled.total_tokens;

        Ok(self.finish(query_id, assembled.entries, degradations, stats, started))
    }

    fn finish(
        &self,
        query_id: String,
        entries: Vec<ContextEntry>,
        degradations: Vec<DegradationEvent>,
        mut stats: QueryStats,
        started: Instant,
    ) -> RetrievalOutcome {
        stats.latency_ms = started.elapsed().as_millis() as u64;
        {
            let mut tracker = lock(&self.tracker);
            for event in &degradations {
                tracker.record(event.clone());
            }
        }
        lock(&self.query_log).record(QueryLogEntry::new(
            query_id.clone(),
            stats.clone(),
            degradations.len(),
        ));
        events::retrieval_completed(&query_id, &stats);

        RetrievalOutcome {
            query_id,
            entries,
            degradations,
            stats,
        }
    }

    /// Current boost table.
    pub fn boost_table(&self) -> Arc<BoostTable> {
        Arc::clone(&self.boost_table.read().unwrap_or_else(|p| p.into_inner()))
    }

    /// Compile and swap in a new boost table. On error the old table stays.
    pub fn reload_boost_table(&self, config: &BoostTableConfig) -> SiftResult<()> {
        let table = Arc::new(BoostTable::compile(config)?);
        let rules = table.rule_count();
        *self.boost_table.write().unwrap_or_else(|p| p.into_inner()) = table;
        events::boost_table_reloaded(rules);
        Ok(())
    }

    /// Operator action: drop every cached document.
    pub fn clear_chunk_cache(&self) {
        let before = self.cache.stats().entries;
        self.cache.clear();
        events::chunk_cache_cleared(before);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Degradations not yet marked recovered.
    pub fn active_degradations(&self) -> Vec<TrackedDegradation> {
        lock(&self.tracker)
            .active_degradations()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Mark a component's degradations as recovered.
    pub fn mark_recovered(&self, component: &str) -> usize {
        lock(&self.tracker).mark_recovered(component)
    }

    /// Copy of the per-query log.
    pub fn query_log(&self) -> QueryLog {
        lock(&self.query_log).clone()
    }
}

impl IRetriever for RetrievalEngine {
    fn retrieve(&self, query: &str, vectors: &QueryVectors) -> SiftResult<RetrievalOutcome> {
        self.retrieve_with_routing(query, vectors, None)
    }
}

#[cfg(feature = "http-reranker")]
fn http_scorer(config: &SiftConfig) -> SiftResult<Option<Arc<dyn IRerankScorer>>> {
    Ok(crate::rerank::HttpRerankScorer::from_config(&config.reranker)?
        .map(|s| Arc::new(s) as Arc<dyn IRerankScorer>))
}

#[cfg(not(feature = "http-reranker"))]
fn http_scorer(config: &SiftConfig) -> SiftResult<Option<Arc<dyn IRerankScorer>>> {
    if config.reranker.enabled {
        return Err(sift_core::errors::ConfigError::invalid(
            "reranker.enabled",
            "built without the `http-reranker` feature",
        )
        .into());
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_cache::UnboundedChunkCache;
    use sift_core::models::SparseVector;
    use sift_tokens::HeuristicEstimator;
    use test_fixtures::{make_document, InMemoryIndex};

    fn engine_over(index: Arc<InMemoryIndex>, config: SiftConfig) -> RetrievalEngine {
        let fetcher = Arc::new(IndexChunkFetcher::new(
            index.clone(),
            256,
            std::time::Duration::from_secs(1),
        ));
        RetrievalEngine::new(
            config,
            index,
            None,
            Arc::new(HeuristicEstimator),
            Arc::new(UnboundedChunkCache::new(fetcher)),
        )
        .unwrap()
    }

    fn vectors() -> QueryVectors {
        QueryVectors {
            dense: Some(vec![1.0]),
            sparse: Some(SparseVector {
                indices: vec![1],
                values: vec![1.0],
            }),
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SiftConfig::default();
        config.cache.cache_maxsize = 0;
        let index = Arc::new(InMemoryIndex::new());
        let result = RetrievalEngine::new(
            config,
            index.clone(),
            None,
            Arc::new(HeuristicEstimator),
            Arc::new(UnboundedChunkCache::new(Arc::new(IndexChunkFetcher::new(
                index,
                1,
                std::time::Duration::from_secs(1),
            )))),
        );
        assert!(result.is_err());
    }

    #[test]
    fn degraded_cache_is_tracked_at_startup() {
        let engine = engine_over(Arc::new(InMemoryIndex::new()), SiftConfig::default());
        let active = engine.active_degradations();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].event.kind, DegradationKind::CacheDegraded);
        assert_eq!(engine.cache_stats().mode, CacheMode::Degraded);
    }

    #[test]
    fn empty_search_yields_empty_context() {
        let engine = engine_over(Arc::new(InMemoryIndex::new()), SiftConfig::default());
        let out = engine.retrieve("q", &vectors()).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.degradations.len(), 1);
        assert_eq!(out.degradations[0].kind, DegradationKind::EmptyCandidateSet);
        assert_eq!(engine.query_log().count(), 1);
    }

    #[test]
    fn stats_count_each_stage() {
        let index = Arc::new(
            InMemoryIndex::new()
                .with_chunks(make_document("d", &[0, 1, 2], 10))
                .with_dense_ranking(&[("d#0", 0.9), ("d#2", 0.5)])
                .with_sparse_ranking(&[("d#2", 3.0)]),
        );
        let engine = engine_over(index, SiftConfig::default());
        let out = engine.retrieve("q", &vectors()).unwrap();

        assert_eq!(out.stats.dense_hits, 2);
        assert_eq!(out.stats.sparse_hits, 1);
        assert_eq!(out.stats.fused, 2);
        assert_eq!(out.stats.reranked, 2);
        assert_eq!(out.stats.windows, 2);
        // Both anchors expand to the whole document, so the second overlaps.
        assert_eq!(out.stats.entries, 1);
        assert_eq!(out.stats.dropped_overlaps, 1);
        assert_eq!(out.entries[0].merged_chunk_ids, vec!["d#0", "d#1", "d#2"]);
        assert_eq!(out.stats.token_budget, 4500);
        assert!(!out.query_id.is_empty());
    }

    #[test]
    fn reload_keeps_old_table_on_error() {
        let engine = engine_over(Arc::new(InMemoryIndex::new()), SiftConfig::default());
        let mut bad = BoostTableConfig::default();
        bad.page_type.insert("guide".into(), -1.0);
        assert!(engine.reload_boost_table(&bad).is_err());
        assert!(engine.boost_table().is_empty());

        let mut good = BoostTableConfig::default();
        good.page_type.insert("guide".into(), 1.5);
        engine.reload_boost_table(&good).unwrap();
        assert_eq!(engine.boost_table().rule_count(), 1);
    }
}
