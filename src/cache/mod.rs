//! Cache Module
//!
//! Provides an in-memory keyed cache with per-entry TTL, lazy expiry,
//! exact and pattern invalidation, and change notification.

mod clock;
mod entry;
mod key;
mod listeners;
mod matcher;
mod stats;
mod store;
mod ttl;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, MockClock, SystemClock};
pub use entry::CacheEntry;
pub use key::create_cache_key;
pub use listeners::{
    Listener, NotificationSink, SubscriberSet, Subscription, TracingSink, CLEAR_SENTINEL,
};
pub use matcher::{KeyMatcher, KeyPattern};
pub use stats::{CacheMetrics, CacheStats};
pub use store::KeyedTtlCache;
pub use ttl::{TtlPreset, LONG_TTL, MEDIUM_TTL, SHORT_TTL, VERY_LONG_TTL};
