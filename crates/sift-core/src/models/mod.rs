mod cache_stats;
mod candidate;
mod chunk;
mod context_entry;
mod degradation_event;
mod outcome;
mod query;
mod stage;
mod window;

pub use cache_stats::{CacheMode, CacheStats};
pub use candidate::{AppliedBoost, BoostCategory, RerankedCandidate, SearchCandidate};
pub use chunk::{Chunk, Metadata, SearchHit};
pub use context_entry::ContextEntry;
pub use degradation_event::{DegradationEvent, DegradationKind};
pub use outcome::{QueryStats, RetrievalOutcome};
pub use query::{QueryVectors, SparseVector};
pub use stage::PipelineStage;
pub use window::{ChunkSpan, MergedWindow};
