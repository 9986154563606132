//! # sift-cache
//!
//! Document id → ordered chunk list, shared by every in-flight query.
//!
//! Two interchangeable `IChunkCache` implementations:
//! - `TtlChunkCache` (feature `ttl-cache`, default): moka, bounded by entry
//!   count and TTL, single-flight fetches per key.
//! - `UnboundedChunkCache`: plain concurrent map, no expiry. Memory is only
//!   released by an explicit `clear()`.
//!
//! `build_chunk_cache` picks one at construction time.

pub mod clock;
pub mod entry;
pub mod fetcher;
pub mod select;
#[cfg(feature = "ttl-cache")]
pub mod ttl;
pub mod unbounded;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use fetcher::IndexChunkFetcher;
pub use select::{build_chunk_cache, build_chunk_cache_with_clock, degraded_cache_event};
#[cfg(feature = "ttl-cache")]
pub use ttl::TtlChunkCache;
pub use unbounded::UnboundedChunkCache;
