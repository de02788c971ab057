//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// A missing file is not an error: the service runs fine on defaults.
///
/// # Errors
/// Returns detailed error if:
/// - The file exists but can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  if !path.exists() {
    let config = AppConfig::default();
    validate_config(&config)?;
    info!(path = %path.display(), "No config file found, using defaults");
    return Ok(config);
  }

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config: AppConfig = toml::from_str(&content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  info!(
    bind_address = %config.server.bind_address,
    log_level = %config.service.log_level,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty service name
/// - A parseable socket address
/// - A positive shutdown grace period
/// - A log level EnvFilter understands
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.service.name.is_empty(),
    "service.name must not be empty"
  );

  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| {
      format!(
        "server.bind_address is not a valid socket address: {}",
        config.server.bind_address
      )
    })?;

  anyhow::ensure!(
    config.server.shutdown_grace_seconds > 0,
    "server.shutdown_grace_seconds must be positive, got {}",
    config.server.shutdown_grace_seconds
  );

  EnvFilter::try_new(&config.service.log_level).with_context(|| {
    format!(
      "service.log_level is not a valid filter directive: {}",
      config.service.log_level
    )
  })?;

  Ok(())
}
