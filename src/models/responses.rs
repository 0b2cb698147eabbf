//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheMetrics, CacheStats};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
    /// When the entry was written (Unix ms)
    pub stored_at: u64,
    /// Milliseconds until the entry expires
    pub ttl_remaining_ms: u64,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value, stored_at: u64, ttl_remaining_ms: u64) -> Self {
        Self {
            key: key.into(),
            value,
            stored_at,
            ttl_remaining_ms,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for invalidation (DELETE /del/:key, POST /invalidate)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// The key or pattern that was invalidated
    pub target: String,
    /// Number of entries removed
    pub removed: usize,
    /// False when the pattern did not compile and therefore matched nothing
    pub valid: bool,
}

impl InvalidateResponse {
    pub fn new(target: impl Into<String>, removed: usize, valid: bool) -> Self {
        Self {
            target: target.into(),
            removed,
            valid,
        }
    }
}

/// Response body for the clear operation (DELETE /clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Number of entries removed
    pub removed: usize,
}

/// Response body for key construction (POST /key)
#[derive(Debug, Clone, Serialize)]
pub struct CacheKeyResponse {
    pub key: String,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of entries, including unpurged expired ones
    pub size: usize,
    /// Current keys
    pub keys: Vec<String>,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries purged on lookup after expiring
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a snapshot and the counters
    pub fn new(stats: CacheStats, metrics: &CacheMetrics) -> Self {
        let mut keys = stats.keys;
        keys.sort();
        Self {
            size: stats.size,
            keys,
            hits: metrics.hits,
            misses: metrics.misses,
            expirations: metrics.expirations,
            hit_rate: metrics.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("employee:7", json!({"name": "Ada"}), 1_000, 250);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            json!({
                "key": "employee:7",
                "value": {"name": "Ada"},
                "stored_at": 1_000,
                "ttl_remaining_ms": 250
            })
        );
    }

    #[test]
    fn test_invalidate_response_serialize() {
        let resp = InvalidateResponse::new("user:(", 0, false);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, json!({"target": "user:(", "removed": 0, "valid": false}));
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("my_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_stats_response_sorts_keys() {
        let stats = CacheStats {
            size: 2,
            keys: vec!["b".to_string(), "a".to_string()],
        };
        let mut metrics = CacheMetrics::new();
        metrics.record_hit();
        metrics.record_miss();

        let resp = StatsResponse::new(stats, &metrics);
        assert_eq!(resp.keys, vec!["a", "b"]);
        assert!((resp.hit_rate - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
