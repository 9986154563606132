//! Turning recovered stage failures into `DegradationEvent`s.

use sift_core::errors::{CacheError, SiftError};
use sift_core::models::{DegradationEvent, DegradationKind, PipelineStage};

/// Kind for a failed external call.
pub fn kind_of(error: &SiftError) -> DegradationKind {
    match error {
        e if e.is_timeout() => DegradationKind::UpstreamTimeout,
        SiftError::Cache(CacheError::DocumentNotFound { .. }) => DegradationKind::OrphanChunk,
        _ => DegradationKind::UpstreamFailure,
    }
}

/// Event for `stage` having failed with `error` and fallen back to `fallback`.
pub fn stage_failed(stage: PipelineStage, error: &SiftError, fallback: &str) -> DegradationEvent {
    DegradationEvent::new(stage.as_str(), kind_of(error), error.to_string(), fallback)
}
