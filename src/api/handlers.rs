//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{create_cache_key, KeyPattern, KeyedTtlCache};
use crate::error::{ApiError, Result};
use crate::models::{
    CacheKeyRequest, CacheKeyResponse, ClearResponse, GetResponse, HealthResponse,
    InvalidateRequest, InvalidateResponse, SetRequest, SetResponse, StatsResponse,
};

/// Cache type served over HTTP.
pub type JsonCache = KeyedTtlCache<Value>;

/// Application state shared across all handlers.
///
/// The whole cache sits behind one lock, so every operation is atomic with
/// respect to the others.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache
    pub cache: Arc<RwLock<JsonCache>>,
}

impl AppState {
    /// Creates a new AppState owning the given cache.
    pub fn new(cache: JsonCache) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(KeyedTtlCache::new().with_default_ttl(config.default_ttl()))
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value with an optional TTL or TTL preset.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    let mut cache = state.cache.write().await;
    cache.set(req.key.clone(), req.value, ttl);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Misses and expired entries are both 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: a lookup may purge an expired entry
    let mut cache = state.cache.write().await;
    let entry = cache
        .get_entry(&key)
        .ok_or_else(|| ApiError::NotFound(key.clone()))?;
    let ttl_remaining_ms = cache.ttl_remaining_ms(&entry);

    Ok(Json(GetResponse::new(
        key,
        Value::clone(&entry.value),
        entry.created_at,
        ttl_remaining_ms,
    )))
}

/// Handler for DELETE /del/:key
///
/// Absent keys are not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.invalidate(key.as_str());

    Json(InvalidateResponse::new(key, removed, true))
}

/// Handler for POST /invalidate
///
/// A pattern that does not compile removes nothing and is reported with
/// `valid: false`.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Json<InvalidateResponse> {
    let pattern = KeyPattern::new(req.pattern.as_str());
    let valid = pattern.is_valid();

    let mut cache = state.cache.write().await;
    let removed = cache.invalidate(pattern);

    Json(InvalidateResponse::new(req.pattern, removed, valid))
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.clear();

    Json(ClearResponse { removed })
}

/// Handler for POST /key
///
/// Builds the canonical cache key for an endpoint and its parameters.
pub async fn cache_key_handler(Json(req): Json<CacheKeyRequest>) -> Result<Json<CacheKeyResponse>> {
    let params = req.scalar_params().map_err(ApiError::InvalidRequest)?;
    let key = create_cache_key(&req.endpoint, params);

    Ok(Json(CacheKeyResponse { key }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(cache.get_stats(), &cache.metrics()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set_request(key: &str, value: Value) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value,
            ttl_ms: None,
            preset: None,
        }
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = AppState::new(KeyedTtlCache::new());

        let req = set_request("employee:1", json!({"name": "Ada", "dept": 3}));
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let result = get_handler(State(state.clone()), Path("employee:1".to_string())).await;
        let response = result.unwrap();
        assert_eq!(response.value, json!({"name": "Ada", "dept": 3}));
    }

    #[tokio::test]
    async fn test_get_handler_reports_remaining_ttl() {
        let state = AppState::new(KeyedTtlCache::new());

        let mut req = set_request("shift:today", json!(8));
        req.ttl_ms = Some(60_000);
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let response = get_handler(State(state), Path("shift:today".to_string()))
            .await
            .unwrap();
        assert!(response.ttl_remaining_ms > 0);
        assert!(response.ttl_remaining_ms <= 60_000);
        assert!(response.stored_at > 0);
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = AppState::new(KeyedTtlCache::new());

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_zero_ttl_is_not_readable() {
        let state = AppState::new(KeyedTtlCache::new());

        let mut req = set_request("flash", json!(1));
        req.ttl_ms = Some(0);
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let result = get_handler(State(state), Path("flash".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_handler_absent_key() {
        let state = AppState::new(KeyedTtlCache::new());

        let response = delete_handler(State(state), Path("missing".to_string())).await;
        assert_eq!(response.removed, 0);
        assert_eq!(response.target, "missing");
        assert!(response.valid);
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let state = AppState::new(KeyedTtlCache::new());
        for key in ["user:1", "user:2", "order:1"] {
            set_handler(State(state.clone()), Json(set_request(key, json!(key))))
                .await
                .unwrap();
        }

        let req = InvalidateRequest {
            pattern: "^user:".to_string(),
        };
        let response = invalidate_handler(State(state.clone()), Json(req)).await;
        assert_eq!(response.removed, 2);
        assert!(response.valid);

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.keys, vec!["order:1"]);
    }

    #[tokio::test]
    async fn test_invalidate_handler_malformed_pattern() {
        let state = AppState::new(KeyedTtlCache::new());
        set_handler(State(state.clone()), Json(set_request("user:1", json!(1))))
            .await
            .unwrap();

        let req = InvalidateRequest {
            pattern: "user:([".to_string(),
        };
        let response = invalidate_handler(State(state.clone()), Json(req)).await;
        assert_eq!(response.removed, 0);
        assert!(!response.valid);
        assert_eq!(stats_handler(State(state)).await.size, 1);
    }

    #[tokio::test]
    async fn test_clear_handler() {
        let state = AppState::new(KeyedTtlCache::new());
        set_handler(State(state.clone()), Json(set_request("a", json!(1))))
            .await
            .unwrap();

        let response = clear_handler(State(state.clone())).await;
        assert_eq!(response.removed, 1);
        assert_eq!(stats_handler(State(state)).await.size, 0);
    }

    #[tokio::test]
    async fn test_cache_key_handler() {
        let req: CacheKeyRequest =
            serde_json::from_value(json!({"endpoint": "/api/x", "params": {"b": 2, "a": 1}}))
                .unwrap();

        let response = cache_key_handler(Json(req)).await.unwrap();
        assert_eq!(response.key, "/api/x?a=1&b=2");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = AppState::new(KeyedTtlCache::new());

        let req = set_request("", json!("value"));
        let result = set_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_health_handler_blocking() {
        let response = tokio_test::block_on(health_handler());
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_from_config_uses_default_ttl() {
        let config = crate::config::Config {
            default_ttl_ms: 1_000,
            server_port: 0,
        };
        let state = AppState::from_config(&config);
        let cache = tokio_test::block_on(state.cache.read());
        assert_eq!(cache.default_ttl(), std::time::Duration::from_secs(1));
    }
}
