//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an absolute expiry.

use std::sync::Arc;
use std::time::Duration;

// == Cache Entry ==
/// A single cached value and its expiry metadata.
///
/// The payload is held behind an [`Arc`] so readers share the stored value
/// instead of copying it.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: Arc<V>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> Clone for CacheEntry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stored at `now` that lives for `ttl`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now` - Current Unix time in milliseconds
    /// * `ttl` - How long the entry stays readable; zero means never readable
    pub fn new(value: V, now: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);

        Self {
            value: Arc::new(value),
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// An entry is expired once `now >= expires_at`, so a zero TTL expires
    /// at the instant it is stored.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime in milliseconds at `now`, or 0 once expired.
    pub fn ttl_remaining_ms_at(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}
