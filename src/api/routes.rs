//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_key_handler, clear_handler, delete_handler, get_handler, health_handler,
    invalidate_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a JSON value
/// - `GET /get/:key` - Retrieve a value by key
/// - `DELETE /del/:key` - Invalidate one key
/// - `POST /invalidate` - Invalidate every key matching a regex
/// - `DELETE /clear` - Remove every entry
/// - `POST /key` - Build a canonical cache key
/// - `GET /stats` - Size, keys and hit counters
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/invalidate", post(invalidate_handler))
        .route("/clear", delete(clear_handler))
        .route("/key", post(cache_key_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
