//! Request Counter Service — Entry Point
//!
//! Initializes configuration, logging, the metrics registry, and the
//! HTTP server. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (optional, defaults apply) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create shutdown broadcast channel
//! 4. Build the request counter registry (starts at 0)
//! 5. Spawn the axum server with the counting middleware
//! 6. Wait for SIGINT → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

mod config;
mod metrics;
mod server;

use metrics::RequestMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.service.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        "Starting request counter service"
    );

    // ── 3. Shutdown signal channel ──────────────────────────
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    // ── 4. Request counter registry (starts at 0) ───────────
    let metrics = Arc::new(
        RequestMetrics::new().context("Failed to build metrics registry")?,
    );

    // ── 5. Spawn the HTTP server ────────────────────────────
    let server_state = Arc::clone(&metrics);
    let bind_address = config.server.bind_address.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::serve(server_state, bind_address, shutdown_rx).await {
            error!(error = %e, "HTTP server failed");
        }
    });

    // ── 6. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    let _ = shutdown_tx.send(());
    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(config.server.shutdown_grace_seconds),
        server_handle,
    )
    .await;

    info!(requests_served = metrics.requests_total(), "Shutdown complete");
    Ok(())
}
