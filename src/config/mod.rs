//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. Every field
//! has a default, so the service also starts with no file at all.
//! `RUST_LOG` overrides the configured log level at runtime.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
///
/// Loaded from `config.toml` at startup when the file exists,
/// otherwise built entirely from defaults. All fields are validated
/// before the server binds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Service identity and logging.
  #[serde(default)]
  pub service: ServiceConfig,
  /// HTTP server parameters.
  #[serde(default)]
  pub server: ServerConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name, used in startup logs.
  #[serde(default = "default_service_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      name: default_service_name(),
      log_level: default_log_level(),
    }
  }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Listen address for the HTTP server.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// Seconds to wait for in-flight requests after SIGINT.
  #[serde(default = "default_shutdown_grace")]
  pub shutdown_grace_seconds: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_address(),
      shutdown_grace_seconds: default_shutdown_grace(),
    }
  }
}

// Default value functions for serde

fn default_service_name() -> String {
  "request-counter".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0:8000".to_string()
}

fn default_shutdown_grace() -> u64 {
  5
}
