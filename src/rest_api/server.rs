//! # REST API Routes
//!
//! Axum routes for the read operations. Paths are relative; the HTTP server
//! nests them under the configured base path.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use tracing::{info_span, Instrument, Span};
use uuid::Uuid;

use super::errors::RestError;
use super::handler::KeertanHandler;
use super::parser::SyncParams;
use super::response::{HeadersResponse, IndexResponse, ShabadResponse};

/// REST API server state
pub struct RestServer {
    handler: KeertanHandler,
}

impl RestServer {
    pub fn new(handler: KeertanHandler) -> Self {
        Self { handler }
    }

    /// Build the Axum router
    pub fn router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route("/headers", get(headers_handler))
            .route("/index", get(index_handler))
            .route("/index/{header_id}", get(index_by_header_handler))
            .route("/shabad/{shabad_id}", get(shabad_handler))
            .with_state(state)
    }
}

/// Shared state type
type ServerState = Arc<RestServer>;

fn request_span(operation: &'static str) -> Span {
    info_span!("request", operation, request_id = %Uuid::new_v4())
}

type QueryParams = Result<Query<SyncParams>, QueryRejection>;
type PathId = Result<Path<String>, PathRejection>;

fn sync_params(server: &RestServer, query: QueryParams) -> Result<SyncParams, RestError> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => server.handler.unreadable_params(&rejection.body_text()),
    }
}

fn path_id(path: PathId) -> Result<String, RestError> {
    path.map(|Path(raw)| raw)
        .map_err(|rejection| RestError::InvalidPathParam(rejection.body_text()))
}

/// List headers handler
async fn headers_handler(
    State(server): State<ServerState>,
) -> Result<Json<HeadersResponse>, RestError> {
    let result = server
        .handler
        .headers()
        .instrument(request_span("headers"))
        .await?;
    Ok(Json(result))
}

/// Full index handler
async fn index_handler(
    State(server): State<ServerState>,
    query: QueryParams,
) -> Result<Json<IndexResponse>, RestError> {
    let params = sync_params(&server, query)?;
    let result = server
        .handler
        .index(None, &params)
        .instrument(request_span("index"))
        .await?;
    Ok(Json(result))
}

/// Index-of-one-header handler
async fn index_by_header_handler(
    State(server): State<ServerState>,
    path: PathId,
    query: QueryParams,
) -> Result<Json<IndexResponse>, RestError> {
    let header_id = path_id(path)?;
    let params = sync_params(&server, query)?;
    let result = server
        .handler
        .index(Some(&header_id), &params)
        .instrument(request_span("index"))
        .await?;
    Ok(Json(result))
}

/// Shabad verses handler
async fn shabad_handler(
    State(server): State<ServerState>,
    path: PathId,
    query: QueryParams,
) -> Result<Json<ShabadResponse>, RestError> {
    let shabad_id = path_id(path)?;
    let params = sync_params(&server, query)?;
    let result = server
        .handler
        .shabad(&shabad_id, &params)
        .instrument(request_span("shabad"))
        .await?;
    Ok(Json(result))
}
