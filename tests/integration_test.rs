//! Integration Tests - End-to-end Router Behavior
//!
//! Drives the real axum router through tower's `oneshot` and checks
//! the counting middleware and both endpoints against the wire-level
//! contract.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use request_counter_service::metrics::RequestMetrics;
use request_counter_service::server::{self, AppState};

// ---- Helpers ----

fn app() -> (AppState, axum::Router) {
    let state: AppState = Arc::new(RequestMetrics::new().unwrap());
    let router = server::router(Arc::clone(&state));
    (state, router)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---- Endpoint Contracts ----

#[tokio::test]
async fn test_root_returns_running_message() {
    let (_state, router) = app();

    let response = router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "message": "FastAPI app is running" })
    );
}

#[tokio::test]
async fn test_root_message_is_fixed_regardless_of_count() {
    let (state, router) = app();

    for _ in 0..10 {
        state.inc_requests();
    }

    let response = router.oneshot(get("/")).await.unwrap();
    let body = body_string(response).await;
    assert!(body.contains("FastAPI app is running"));
}

#[tokio::test]
async fn test_metrics_first_request_counts_itself() {
    let (_state, router) = app();

    let response = router.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("# HELP request_count Number of requests received"));
    assert!(body.contains("# TYPE request_count counter"));
    assert!(body.contains("request_count 1\n"));
}

#[tokio::test]
async fn test_root_then_metrics_reports_two() {
    let (_state, router) = app();

    let response = router.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.oneshot(get("/metrics")).await.unwrap();
    let body = body_string(response).await;
    assert!(body.contains("request_count 2\n"));
}

// ---- Counting Middleware ----

#[tokio::test]
async fn test_unknown_path_is_404_and_still_counted() {
    let (state, router) = app();

    let response = router.oneshot(get("/no/such/path")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.requests_total(), 1);
}

#[tokio::test]
async fn test_every_request_counts_exactly_once() {
    let (state, router) = app();

    let paths = ["/", "/metrics", "/unknown", "/", "/metrics"];
    for path in paths {
        let _ = router.clone().oneshot(get(path)).await.unwrap();
    }

    assert_eq!(state.requests_total(), paths.len() as u64);
}

#[tokio::test]
async fn test_failing_handler_is_still_counted() {
    let state: AppState = Arc::new(RequestMetrics::new().unwrap());

    // Same middleware, wrapped around a handler that always fails.
    let router = axum::Router::new()
        .route(
            "/boom",
            axum::routing::get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            server::count_requests,
        ));

    let response = router.oneshot(get("/boom")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(state.requests_total(), 1);
}

#[tokio::test]
async fn test_concurrent_requests_lose_no_updates() {
    let (state, router) = app();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..100 {
        let router = router.clone();
        // Mix of paths; every one of them counts.
        let path = match i % 3 {
            0 => "/",
            1 => "/metrics",
            _ => "/unknown",
        };
        tasks.spawn(async move {
            router.oneshot(get(path)).await.unwrap();
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap();
    }

    assert_eq!(state.requests_total(), 100);
}
