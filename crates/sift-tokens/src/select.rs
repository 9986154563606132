//! Construction-time choice between exact and heuristic estimation.

use std::sync::Arc;

use sift_core::config::{EstimatorKind, TokensConfig};
use sift_core::errors::SiftResult;
use sift_core::traits::ITokenEstimator;
use tracing::{info, warn};

use crate::HeuristicEstimator;

/// Build the estimator requested by `config`.
///
/// `Auto` probes for the tokenizer and falls back to the heuristic;
/// `Exact` fails if the tokenizer is unavailable.
pub fn select_estimator(config: &TokensConfig) -> SiftResult<Arc<dyn ITokenEstimator>> {
    let estimator: Arc<dyn ITokenEstimator> = match config.estimator {
        EstimatorKind::Heuristic => Arc::new(HeuristicEstimator),
        EstimatorKind::Exact => exact(config.cache_capacity)?,
        EstimatorKind::Auto => match exact(config.cache_capacity) {
            Ok(estimator) => estimator,
            Err(e) => {
                warn!(error = %e, "exact tokenizer unavailable, using chars/4 heuristic");
                Arc::new(HeuristicEstimator)
            }
        },
    };
    info!(
        estimator = estimator.name(),
        exact = estimator.is_exact(),
        "token estimator selected"
    );
    Ok(estimator)
}

#[cfg(feature = "tiktoken")]
fn exact(cache_capacity: u64) -> SiftResult<Arc<dyn ITokenEstimator>> {
    Ok(Arc::new(crate::TokenCounter::new(cache_capacity)?))
}

#[cfg(not(feature = "tiktoken"))]
fn exact(_cache_capacity: u64) -> SiftResult<Arc<dyn ITokenEstimator>> {
    Err(sift_core::errors::ConfigError::invalid(
        "tokens.estimator",
        "built without the `tiktoken` feature",
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_is_never_exact() {
        let config = TokensConfig {
            estimator: EstimatorKind::Heuristic,
            ..Default::default()
        };
        let estimator = select_estimator(&config).unwrap();
        assert!(!estimator.is_exact());
    }

    #[test]
    fn auto_always_yields_an_estimator() {
        let estimator = select_estimator(&TokensConfig::default()).unwrap();
        assert!(estimator.estimate("hello world") > 0);
    }

    #[cfg(feature = "tiktoken")]
    #[test]
    fn exact_uses_tokenizer_when_compiled_in() {
        let config = TokensConfig {
            estimator: EstimatorKind::Exact,
            ..Default::default()
        };
        assert!(select_estimator(&config).unwrap().is_exact());
    }
}
