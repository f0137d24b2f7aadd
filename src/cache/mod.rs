//! Cache Module
//!
//! Sliding-TTL eviction cache used to track idle shared resources.

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use stats::CacheStats;
pub use store::{EvictionCache, EvictionListener};
