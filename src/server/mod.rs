//! HTTP Server - Counting Middleware and Endpoints
//!
//! Serves the root status endpoint and the Prometheus exposition on
//! /metrics via axum 0.7. Every inbound request passes through the
//! counting middleware, including hits on /metrics itself and on
//! unmatched paths.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{error, info, instrument};

use crate::metrics::RequestMetrics;

/// Shared handle passed to the middleware and handlers.
pub type AppState = Arc<RequestMetrics>;

/// Errors surfaced by request handlers.
///
/// The counting middleware has no error handling of its own;
/// downstream failures propagate unmodified.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The metrics registry failed to encode.
    #[error("metrics encoding failed: {0}")]
    Encode(#[from] prometheus::Error),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request handler failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Counting middleware: bumps the request counter exactly once, then
/// forwards the request and returns the downstream response unchanged.
///
/// No filtering: path, method, and eventual response status are all
/// irrelevant to the count. The increment happens before the forward,
/// so a failing downstream handler is still counted.
pub async fn count_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    state.inc_requests();
    next.run(request).await
}

/// Build the service router with the counting middleware layered over
/// both routes and the 404 fallback.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            count_requests,
        ))
        .with_state(state)
}

/// Serve HTTP on the given address until the shutdown signal fires.
#[instrument(skip(state, shutdown_rx))]
pub async fn serve(
    state: AppState,
    bind_address: String,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "HTTP server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    Ok(())
}

/// Root status endpoint.
async fn root() -> impl IntoResponse {
    // Clients of the original deployment string-match this body.
    Json(serde_json::json!({ "message": "FastAPI app is running" }))
}

/// Prometheus text exposition of the request counter.
///
/// The render is a snapshot; the request being served has already
/// been counted by the middleware.
async fn metrics(State(state): State<AppState>) -> Result<Response, ServeError> {
    let body = state.render()?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// Unmatched paths land here, after being counted.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
