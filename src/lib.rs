//! amritkeertan-api - a read-only JSON API over the Amrit Keertan scripture index
//!
//! Layers, innermost first:
//! - store: pooled read-only SQLite access
//! - rest_api: query composition, header resolution, row shaping, routes
//! - http_server: CORS, caching, base path, fallback
//! - observability: logging setup
//! - cli: configuration and process entry

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod store;
