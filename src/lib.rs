//! Keyed Cache - an in-process keyed TTL cache
//!
//! Entries expire lazily, can be invalidated by exact key or pattern, and
//! every mutation is broadcast to subscribers. An optional HTTP surface
//! serves one cache instance.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{create_cache_key, KeyMatcher, KeyedTtlCache, Subscription, TtlPreset};
pub use config::Config;
