//! Top-level sift configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    BoostTableConfig, CacheConfig, ContextConfig, MergeConfig, ObservabilityConfig,
    RerankerConfig, RetrievalConfig, TokensConfig,
};
use crate::constants::ENV_PREFIX;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`SIFT_*`)
/// 2. TOML file
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiftConfig {
    pub retrieval: RetrievalConfig,
    pub merge: MergeConfig,
    pub context: ContextConfig,
    pub cache: CacheConfig,
    pub reranker: RerankerConfig,
    pub tokens: TokensConfig,
    pub observability: ObservabilityConfig,
    pub boost_table: BoostTableConfig,
}

impl SiftConfig {
    /// Load configuration: defaults, then `path` if given, then env overrides, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without env overrides or validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing). Validates.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SIFT_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env_value(&lookup, "RRF_K")? {
            self.retrieval.rrf_k = v;
        }
        if let Some(v) = env_value(&lookup, "TOP_K")? {
            self.retrieval.top_k = v;
        }
        if let Some(v) = env_value(&lookup, "MAX_CANDIDATES_N")? {
            self.retrieval.max_candidates_n = v;
        }
        if let Some(v) = env_value(&lookup, "MAX_WINDOW_TOKENS")? {
            self.merge.max_window_tokens = v;
        }
        if let Some(v) = env_value(&lookup, "MAX_CONTEXT_TOKENS")? {
            self.context.max_context_tokens = v;
        }
        if let Some(v) = env_value(&lookup, "CACHE_MAXSIZE")? {
            self.cache.cache_maxsize = v;
        }
        if let Some(v) = env_value(&lookup, "CACHE_TTL_SECONDS")? {
            self.cache.cache_ttl_seconds = v;
        }
        if let Some(v) = lookup(&format!("{ENV_PREFIX}LOG_LEVEL")) {
            self.observability.log_level = v;
        }
        Ok(())
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::invalid("retrieval.top_k", "must be at least 1"));
        }
        if self.retrieval.max_candidates_n < self.retrieval.top_k {
            return Err(ConfigError::invalid(
                "retrieval.max_candidates_n",
                format!(
                    "must be >= retrieval.top_k ({}), got {}",
                    self.retrieval.top_k, self.retrieval.max_candidates_n
                ),
            ));
        }
        if self.merge.max_window_tokens < 0 {
            return Err(ConfigError::invalid(
                "merge.max_window_tokens",
                format!("must be >= 0, got {}", self.merge.max_window_tokens),
            ));
        }
        if self.merge.fetch_batch_size == 0 {
            return Err(ConfigError::invalid("merge.fetch_batch_size", "must be at least 1"));
        }
        let reserve = self.context.reserve_for_response;
        if !(0.0..1.0).contains(&reserve) {
            return Err(ConfigError::invalid(
                "context.reserve_for_response",
                format!("must be in [0, 1), got {reserve}"),
            ));
        }
        if self.cache.cache_maxsize <= 0 {
            return Err(ConfigError::invalid(
                "cache.cache_maxsize",
                format!("must be > 0, got {}", self.cache.cache_maxsize),
            ));
        }
        if self.cache.cache_ttl_seconds == 0 {
            return Err(ConfigError::invalid("cache.cache_ttl_seconds", "must be > 0"));
        }
        if self.reranker.enabled
            && self
                .reranker
                .endpoint
                .as_deref()
                .map_or(true, |e| e.trim().is_empty())
        {
            return Err(ConfigError::invalid(
                "reranker.endpoint",
                "required when reranker.enabled = true",
            ));
        }
        self.boost_table.validate()
    }
}

fn env_value<T, F>(lookup: &F, suffix: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{ENV_PREFIX}{suffix}");
    match lookup(&key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::ParseError {
                path: format!("env:{key}"),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
