//! # sift-observability
//!
//! Tracing subscriber setup, span macros and structured events for the
//! retrieval pipeline, a tracker for locally recovered failures, and a
//! bounded per-query log.

pub mod degradation;
pub mod query_log;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use query_log::{QueryLog, QueryLogEntry};
pub use tracing_setup::init_tracing;
