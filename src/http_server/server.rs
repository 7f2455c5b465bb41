//! # HTTP Server
//!
//! Wraps the REST routes with the outer HTTP behavior: base path, CORS,
//! cache headers, request tracing and the not-found fallback.

use std::net::SocketAddr;

use axum::{
    extract::OriginalUri,
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::rest_api::{KeertanHandler, RestServer};

use super::config::{Environment, HttpServerConfig};

/// HTTP Server for the scripture API
pub struct HttpServer {
    addr: String,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `handler`
    pub fn new(handler: KeertanHandler, config: &HttpServerConfig, environment: Environment) -> Self {
        Self {
            addr: config.socket_addr(environment),
            router: Self::build_router(handler, config),
        }
    }

    /// Build the combined router
    fn build_router(handler: KeertanHandler, config: &HttpServerConfig) -> Router {
        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<HeaderValue> = config
                .cors_origins
                .iter()
                .filter_map(|s| match s.parse() {
                    Ok(origin) => Some(origin),
                    Err(_) => {
                        warn!(origin = %s, "ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let api = RestServer::new(handler).router();
        let routed = if config.base_path == "/" {
            Router::new().merge(api)
        } else {
            Router::new().nest(&config.base_path, api)
        };

        routed
            .fallback(not_found_handler)
            // Fallback sets its own no-cache; everything else gets max-age.
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                cache_control_value(config.cache_max_age_secs),
            ))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> &str {
        &self.addr
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server and run until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.addr.parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.addr, e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "scripture API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("scripture API stopped");
        Ok(())
    }
}

fn cache_control_value(max_age_secs: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("max-age={}", max_age_secs))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}

async fn not_found_handler(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        [(header::CACHE_CONTROL, "no-cache")],
        Json(json!({ "url": format!("{} not found", uri) })),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
