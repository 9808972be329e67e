//! Cache Module
//!
//! In-memory response cache with a fixed expiration window and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default expiration window in seconds
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default maximum number of cached responses
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
