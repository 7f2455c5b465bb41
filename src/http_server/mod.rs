//! # HTTP Server Module
//!
//! Serves the REST API over HTTP.
//!
//! # Endpoints
//!
//! - `{base}/headers` - All section headers
//! - `{base}/index[/{HeaderID}]` - Index entries, optionally for one header
//! - `{base}/shabad/{ShabadID}` - Verses of one shabad
//!
//! Unknown paths answer 404 `{"url": "<path> not found"}`.

pub mod config;
pub mod server;

pub use config::{Environment, HttpServerConfig};
pub use server::HttpServer;
