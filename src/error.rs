//! Error types for the cache and its HTTP surface
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Listener Error ==
/// A subscriber failed while being notified of a cache mutation.
///
/// These never reach the caller of the mutating operation; they are handed
/// to the cache's notification sink instead.
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The listener returned an error
    #[error("listener {listener} failed on key '{key}': {source}")]
    Failed {
        listener: u64,
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The listener panicked
    #[error("listener {listener} panicked on key '{key}': {message}")]
    Panicked {
        listener: u64,
        key: String,
        message: String,
    },
}

impl ListenerError {
    /// Id of the subscription that failed.
    pub fn listener(&self) -> u64 {
        match self {
            ListenerError::Failed { listener, .. } | ListenerError::Panicked { listener, .. } => {
                *listener
            }
        }
    }

    /// Key (or pattern, or clear sentinel) being delivered when it failed.
    pub fn key(&self) -> &str {
        match self {
            ListenerError::Failed { key, .. } | ListenerError::Panicked { key, .. } => key,
        }
    }
}

// == Api Error Enum ==
/// Error type for the HTTP surface.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not found in cache, or expired
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP surface.
pub type Result<T> = std::result::Result<T, ApiError>;
