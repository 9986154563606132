//! Score the top-N candidates with a cross-encoder and keep the top-K.
//!
//! Any scorer failure falls back to the incoming `boosted_score` order with
//! `rerank_score` unset. The request carries on.

use std::sync::Arc;
use std::time::Duration;

use sift_core::errors::{SiftError, SiftResult, UpstreamError};
use sift_core::models::{DegradationEvent, PipelineStage, RerankedCandidate, SearchCandidate};
use sift_core::traits::IRerankScorer;
use sift_observability::rerank_span;
use tracing::{debug, warn};

use crate::degradation;

/// Reranked candidates, plus the degradation if the scorer failed.
#[derive(Debug, Clone, Default)]
pub struct RerankOutcome {
    pub candidates: Vec<RerankedCandidate>,
    pub degradation: Option<DegradationEvent>,
}

pub struct RerankAdapter {
    scorer: Option<Arc<dyn IRerankScorer>>,
    timeout: Duration,
}

impl RerankAdapter {
    pub fn new(scorer: Arc<dyn IRerankScorer>, timeout: Duration) -> Self {
        Self {
            scorer: Some(scorer),
            timeout,
        }
    }

    /// No scorer: candidates keep their boosted order and no event is raised.
    pub fn passthrough() -> Self {
        Self {
            scorer: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.scorer.is_some()
    }

    /// Rerank `candidates` (already in `boosted_score` order) and keep `top_k`.
    pub fn rerank(&self, query: &str, candidates: Vec<SearchCandidate>, top_k: usize) -> RerankOutcome {
        let Some(scorer) = self.scorer.as_ref() else {
            return RerankOutcome {
                candidates: fallback(candidates, top_k),
                degradation: None,
            };
        };
        if candidates.is_empty() {
            return RerankOutcome::default();
        }

        let _span = rerank_span!(scorer.name(), candidates.len()).entered();
        let passages: Vec<String> = candidates.iter().map(|c| c.chunk.text.clone()).collect();

        match self.scores(scorer.as_ref(), query, &passages) {
            Ok(scores) => {
                let mut reranked: Vec<RerankedCandidate> = candidates
                    .into_iter()
                    .zip(scores)
                    .map(|(candidate, score)| RerankedCandidate {
                        candidate,
                        rerank_score: Some(score),
                    })
                    .collect();
                // Stable: equal scores keep their boosted order.
                reranked.sort_by(|a, b| {
                    b.rerank_score
                        .partial_cmp(&a.rerank_score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                reranked.truncate(top_k);
                debug!(kept = reranked.len(), "rerank complete");
                RerankOutcome {
                    candidates: reranked,
                    degradation: None,
                }
            }
            Err(e) => {
                warn!(scorer = scorer.name(), error = %e, "rerank failed, keeping boosted order");
                RerankOutcome {
                    candidates: fallback(candidates, top_k),
                    degradation: Some(degradation::stage_failed(
                        PipelineStage::Rerank,
                        &e,
                        "boosted order",
                    )),
                }
            }
        }
    }

    fn scores(&self, scorer: &dyn IRerankScorer, query: &str, passages: &[String]) -> SiftResult<Vec<f64>> {
        let scores = scorer.score(query, passages, self.timeout)?;
        if scores.len() != passages.len() {
            return Err(invalid(format!(
                "expected {} scores, got {}",
                passages.len(),
                scores.len()
            )));
        }
        if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
            return Err(invalid(format!("score {i} is not finite")));
        }
        Ok(scores)
    }
}

fn invalid(reason: String) -> SiftError {
    UpstreamError::InvalidResponse {
        stage: PipelineStage::Rerank,
        reason,
    }
    .into()
}

fn fallback(candidates: Vec<SearchCandidate>, top_k: usize) -> Vec<RerankedCandidate> {
    candidates
        .into_iter()
        .take(top_k)
        .map(RerankedCandidate::unscored)
        .collect()
}
