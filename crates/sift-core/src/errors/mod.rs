//! Error handling for sift.
//! One error enum per concern, `thiserror` only.

pub mod cache_error;
pub mod config_error;
pub mod sift_error;
pub mod upstream_error;

pub use cache_error::CacheError;
pub use config_error::ConfigError;
pub use sift_error::{SiftError, SiftResult};
pub use upstream_error::UpstreamError;
