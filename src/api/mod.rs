//! API Module
//!
//! HTTP handlers and routing over a single injected cache instance.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Invalidate one key
//! - `POST /invalidate` - Invalidate by pattern
//! - `DELETE /clear` - Remove every entry
//! - `POST /key` - Build a canonical cache key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
