//! Cache Module
//!
//! Cache-aside stores for registry metadata, each with its own staleness
//! policy.

mod metadata;
mod stats;
mod store;

// Re-export public types
pub use metadata::{MetadataCache, MetadataStats, DEFAULT_SEARCH_LIMIT, DEFAULT_VERSION_TTL};
pub use stats::{CacheStats, StoreStatsSnapshot};
pub use store::MetadataStore;
