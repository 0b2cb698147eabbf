//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::cache::TtlPreset;

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl_ms`: Optional TTL in milliseconds; wins over `preset`
/// - `preset`: Optional named TTL (`short`, `medium`, `long`, `very_long`)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    /// Optional named TTL
    #[serde(default)]
    pub preset: Option<TtlPreset>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }

    /// Resolves the requested TTL; `None` means the cache default.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_ms
            .map(Duration::from_millis)
            .or_else(|| self.preset.map(TtlPreset::duration))
    }
}

/// Request body for pattern invalidation (POST /invalidate)
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Regular expression matched against every key
    pub pattern: String,
}

/// Request body for key construction (POST /key)
#[derive(Debug, Clone, Deserialize)]
pub struct CacheKeyRequest {
    /// Endpoint path the key is built from
    pub endpoint: String,
    /// Query parameters; values must be strings, numbers or booleans
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl CacheKeyRequest {
    /// Renders each parameter value as it appears in a key.
    ///
    /// Returns an error message naming the first non-scalar parameter.
    pub fn scalar_params(&self) -> Result<Vec<(&str, String)>, String> {
        self.params
            .iter()
            .map(|(name, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return Err(format!("Parameter '{}' must be a scalar", name)),
                };
                Ok((name.as_str(), rendered))
            })
            .collect()
    }
}
