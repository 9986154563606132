//! Tracing setup: structured logging with span definitions and event types.

pub mod events;
pub mod spans;

use sift_core::config::ObservabilityConfig;
use sift_core::errors::ConfigError;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `observability.log_level`.
pub const LOG_ENV: &str = "SIFT_LOG";

/// Install the global subscriber.
///
/// `SIFT_LOG` takes precedence over the configured level. Returns `false`
/// when a subscriber was already installed (e.g. by the host process).
pub fn init_tracing(config: &ObservabilityConfig) -> Result<bool, ConfigError> {
    let filter = build_filter(config)?;

    let installed = if config.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok()
    };
    Ok(installed)
}

/// Filter from `SIFT_LOG` if set, else from the configured level.
pub fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|e| ConfigError::ValidationFailed {
        field: "observability.log_level".to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_parses() {
        let config = ObservabilityConfig {
            log_level: "sift_retrieval=debug,info".to_string(),
            ..Default::default()
        };
        assert!(build_filter(&config).is_ok());
    }
}
