//! Cache Entry Module
//!
//! Defines a cached upstream payload together with the time it was fetched.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A successfully fetched upstream payload.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The parsed upstream response
    pub payload: Value,
    /// Fetch timestamp (Unix milliseconds)
    pub fetched_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            fetched_at: current_timestamp_ms(),
        }
    }

    // == Is Stale At ==
    /// Checks staleness against an explicit clock reading.
    ///
    /// Boundary condition: an entry is stale once `now - fetched_at >= ttl_ms`,
    /// so a payload is never served for the full window plus one tick.
    pub fn is_stale_at(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.fetched_at) >= ttl_ms
    }

    // == Is Stale ==
    /// Checks staleness against the system clock.
    pub fn is_stale(&self, ttl_ms: u64) -> bool {
        self.is_stale_at(current_timestamp_ms(), ttl_ms)
    }

    // == Age ==
    /// Returns how long ago the payload was fetched, in milliseconds.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.fetched_at)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
