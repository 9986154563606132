//! Cross-encoder scoring over HTTP.
//!
//! POSTs `{query, passages, model}` and expects `{scores: [f64]}` aligned
//! with `passages`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sift_core::config::RerankerConfig;
use sift_core::errors::{ConfigError, SiftError, SiftResult, UpstreamError};
use sift_core::models::PipelineStage;
use sift_core::traits::IRerankScorer;

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    passages: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    scores: Vec<f64>,
}

/// Blocking HTTP client for a remote reranker service.
#[derive(Debug)]
pub struct HttpRerankScorer {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: Option<String>,
}

impl HttpRerankScorer {
    pub fn new(endpoint: impl Into<String>, model: Option<String>) -> SiftResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .gzip(true)
            .build()
            .map_err(|e| ConfigError::invalid("reranker", e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model,
        })
    }

    /// Scorer for an enabled reranker section, `None` when disabled.
    pub fn from_config(config: &RerankerConfig) -> SiftResult<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| ConfigError::invalid("reranker.endpoint", "required when enabled"))?;
        Self::new(endpoint, config.model.clone()).map(Some)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl IRerankScorer for HttpRerankScorer {
    fn score(&self, query: &str, passages: &[String], timeout: Duration) -> SiftResult<Vec<f64>> {
        let body = RerankRequest {
            query,
            passages,
            model: self.model.as_deref(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .timeout(timeout)
            .json(&body)
            .send()
            .map_err(|e| transport_error(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Unavailable {
                stage: PipelineStage::Rerank,
                reason: format!("HTTP {status}"),
            }
            .into());
        }

        let parsed: RerankResponse = resp.json().map_err(|e| {
            if e.is_timeout() {
                transport_error(e, timeout)
            } else {
                UpstreamError::InvalidResponse {
                    stage: PipelineStage::Rerank,
                    reason: e.to_string(),
                }
                .into()
            }
        })?;
        Ok(parsed.scores)
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> SiftError {
    if e.is_timeout() {
        UpstreamError::Timeout {
            stage: PipelineStage::Rerank,
            timeout_ms: timeout.as_millis() as u64,
        }
        .into()
    } else {
        UpstreamError::Unavailable {
            stage: PipelineStage::Rerank,
            reason: e.to_string(),
        }
        .into()
    }
}
