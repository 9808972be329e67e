//! Cache Store Module
//!
//! Response cache combining HashMap storage with LRU tracking and a fixed
//! expiration window.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Bounded response cache keyed by logical request key.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-payload storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Expiration window in milliseconds
    ttl_ms: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries before LRU eviction kicks in
    /// * `ttl_secs` - Expiration window in seconds
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            ttl_ms: ttl_secs.saturating_mul(1000),
        }
    }

    // == Get Fresh ==
    /// Returns the cached payload for `key` if it is still inside the
    /// expiration window.
    ///
    /// Stale entries are dropped and counted as misses.
    pub fn get_fresh(&mut self, key: &str) -> Option<Value> {
        let now = current_timestamp_ms();
        let stale = match self.entries.get(key) {
            Some(entry) => entry.is_stale_at(now, self.ttl_ms),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if stale {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    // == Insert ==
    /// Stores a freshly fetched payload, overwriting any prior entry for the key.
    ///
    /// If the store is at capacity and the key is new, the least recently
    /// used entry is evicted first.
    pub fn insert(&mut self, key: impl Into<String>, payload: Value) {
        let key = key.into();
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(payload));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Peek ==
    /// Returns the raw entry without touching LRU order or statistics.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Purge Stale ==
    /// Removes all entries outside the expiration window.
    ///
    /// Returns the number of entries removed.
    pub fn purge_stale(&mut self) -> usize {
        let now = current_timestamp_ms();
        let ttl_ms = self.ttl_ms;
        let stale_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_stale_at(now, ttl_ms))
            .map(|(key, _)| key.clone())
            .collect();

        let count = stale_keys.len();

        for key in stale_keys {
            self.entries.remove(&key);
            self.lru.remove(&key);
        }

        self.stats.record_purged(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
