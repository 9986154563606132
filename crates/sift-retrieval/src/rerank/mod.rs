//! Cross-encoder re-ranking of the fused, boosted candidates.
//!
//! The adapter talks to any `IRerankScorer`; `HttpRerankScorer` (feature
//! `http-reranker`) is the production scorer for a remote service.

pub mod adapter;
#[cfg(feature = "http-reranker")]
pub mod http;

pub use adapter::{RerankAdapter, RerankOutcome};
#[cfg(feature = "http-reranker")]
pub use http::HttpRerankScorer;
