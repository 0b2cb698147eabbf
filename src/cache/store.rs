//! Cache Store Module
//!
//! Keyed TTL store with lazy expiry, exact and pattern invalidation, and
//! synchronous change notification.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{
    CacheEntry, CacheMetrics, CacheStats, Clock, KeyMatcher, NotificationSink, SubscriberSet,
    Subscription, SystemClock, TracingSink, CLEAR_SENTINEL, MEDIUM_TTL,
};

// == Keyed TTL Cache ==
/// In-memory key/value store where every entry carries an expiry.
///
/// Operations take `&mut self` where they can mutate, so one instance is
/// confined to one owner at a time. Share it across threads by wrapping the
/// whole cache in a single lock.
///
/// Expired entries are removed only when a lookup finds them; there is no
/// background sweep.
pub struct KeyedTtlCache<V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Change listeners
    subscribers: SubscriberSet<V>,
    /// Operation counters
    metrics: CacheMetrics,
    /// Duration used when `set` is given none
    default_ttl: Duration,
    /// Time source for expiry
    clock: C,
}

impl<V: 'static> KeyedTtlCache<V, SystemClock> {
    // == Constructor ==
    /// Creates an empty cache on the system clock, defaulting to the
    /// medium duration and logging listener failures through `tracing`.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V: 'static> Default for KeyedTtlCache<V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: 'static, C: Clock> KeyedTtlCache<V, C> {
    /// Creates an empty cache using `clock` for expiry.
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            subscribers: SubscriberSet::new(Arc::new(TracingSink)),
            metrics: CacheMetrics::new(),
            default_ttl: MEDIUM_TTL,
            clock,
        }
    }

    /// Sets the duration used when `set` is called without one.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Routes listener failures to `sink` instead of the log.
    ///
    /// Existing subscriptions are kept.
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.subscribers.set_sink(sink);
        self
    }

    /// The duration used when `set` is called without one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get ==
    /// Returns the value stored under `key` if it has not expired.
    ///
    /// An expired entry is removed as a side effect. The returned value is
    /// shared with the cache, not copied.
    pub fn get(&mut self, key: &str) -> Option<Arc<V>> {
        self.get_entry(key).map(|entry| entry.value)
    }

    /// Like [`get`](Self::get), but returns the whole entry with its
    /// creation and expiry timestamps.
    pub fn get_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            None => {
                self.metrics.record_miss();
                return None;
            }
            Some(entry) if !entry.is_expired_at(now) => {
                self.metrics.record_hit();
                return Some(entry.clone());
            }
            Some(entry) => entry.expires_at,
        };

        self.entries.remove(key);
        self.metrics.record_expiration();
        debug!(key, expired_at = expired, now, "purged expired cache entry");
        None
    }

    /// Milliseconds `entry` has left according to this cache's clock.
    pub fn ttl_remaining_ms(&self, entry: &CacheEntry<V>) -> u64 {
        entry.ttl_remaining_ms_at(self.clock.now_ms())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing entry.
    ///
    /// `ttl` of `None` uses the default duration; a zero duration stores an
    /// entry no lookup will ever return. Subscribers receive `(key, value)`
    /// before this returns.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl.unwrap_or(self.default_ttl));
        let value = Arc::clone(&entry.value);

        self.entries.insert(key.clone(), entry);
        self.metrics.record_set();

        self.notify(&key, Some(value.as_ref()));
    }

    // == Invalidate ==
    /// Removes the exact key, or every key matching a pattern.
    ///
    /// Absent keys and patterns that fail to compile remove nothing.
    /// Subscribers receive the key or pattern text verbatim with no value,
    /// whatever was removed. Returns the number of entries removed.
    pub fn invalidate(&mut self, target: impl Into<KeyMatcher>) -> usize {
        let target = target.into();

        let removed = match &target {
            KeyMatcher::Exact(key) => usize::from(self.entries.remove(key).is_some()),
            KeyMatcher::Pattern(pattern) => {
                let before = self.entries.len();
                self.entries.retain(|key, _| !pattern.is_match(key));
                let removed = before - self.entries.len();
                debug!(pattern = pattern.as_str(), removed, "pattern invalidation");
                removed
            }
        };

        self.metrics.record_invalidations(removed);
        self.notify(target.as_str(), None);
        removed
    }

    // == Clear ==
    /// Removes every entry and notifies subscribers with `("*", None)`.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.metrics.record_clear();

        self.notify(CLEAR_SENTINEL, None);
        removed
    }

    // == Subscribe ==
    /// Registers a listener for every `set`, `invalidate` and `clear`.
    ///
    /// Listeners run synchronously in registration order. A listener that
    /// returns an error or panics is reported to the sink and does not stop
    /// the others.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&str, Option<&V>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // == Stats ==
    /// Returns the current entry count and keys.
    ///
    /// Entries that expired but have not been looked up since are included.
    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            keys: self.entries.keys().cloned().collect(),
        }
    }

    /// Returns a copy of the operation counters.
    pub fn metrics(&self) -> CacheMetrics {
        self.metrics.clone()
    }

    // == Length ==
    /// Returns the number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn notify(&mut self, key: &str, value: Option<&V>) {
        let failures = self.subscribers.notify(key, value);
        self.metrics.record_listener_failures(failures);
    }
}

impl<V, C> fmt::Debug for KeyedTtlCache<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedTtlCache")
            .field("entries", &self.entries.len())
            .field("default_ttl", &self.default_ttl)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
