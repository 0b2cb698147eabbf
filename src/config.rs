//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::MEDIUM_TTL;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in milliseconds for entries set without one
    pub default_ttl_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl_ms),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Default TTL as a [`Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_ms: MEDIUM_TTL.as_millis() as u64,
            server_port: 3000,
        }
    }
}
