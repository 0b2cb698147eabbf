//! Cache Statistics Module
//!
//! Diagnostic snapshot of the store and running operation counters.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of the store.
///
/// `keys` may include entries that are expired but not yet purged by a
/// lookup; `get` never returns those.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of stored entries
    pub size: usize,
    /// Stored keys, in no particular order
    pub keys: Vec<String>,
}

// == Cache Metrics ==
/// Counters accumulated over the lifetime of a cache instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that found nothing, including expired entries
    pub misses: u64,
    /// Entries purged because a lookup found them expired
    pub expirations: u64,
    /// Calls to `set`
    pub sets: u64,
    /// Entries removed by `invalidate`
    pub invalidations: u64,
    /// Calls to `clear`
    pub clears: u64,
    /// Listener notifications that errored or panicked
    pub listener_failures: u64,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates metrics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts an expired entry purged on lookup (also a miss).
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_invalidations(&mut self, removed: usize) {
        self.invalidations += removed as u64;
    }

    pub fn record_clear(&mut self) {
        self.clears += 1;
    }

    pub fn record_listener_failures(&mut self, failures: usize) {
        self.listener_failures += failures as u64;
    }
}
