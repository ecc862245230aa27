//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "QUOTEBOOK_CONFIG";

/// Resolve the config path: `QUOTEBOOK_CONFIG` if set, else `config.toml`.
pub fn config_path() -> String {
  std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string())
}

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    data_dir = %config.storage.data_dir,
    remote_enabled = config.remote.enabled,
    sync_interval = config.remote.sync_interval_seconds,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty, distinct storage keys
/// - A usable remote endpoint when sync is enabled
/// - Positive timeouts, intervals and limits
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(!config.app.name.is_empty(), "app.name must not be empty");

  // Storage validation
  let storage = &config.storage;
  anyhow::ensure!(
    !storage.data_dir.is_empty(),
    "storage.data_dir must not be empty"
  );
  for (name, key) in [
    ("quotes_key", &storage.quotes_key),
    ("filter_key", &storage.filter_key),
    ("last_viewed_key", &storage.last_viewed_key),
  ] {
    anyhow::ensure!(!key.trim().is_empty(), "storage.{name} must not be empty");
  }
  anyhow::ensure!(
    storage.quotes_key != storage.filter_key,
    "storage.quotes_key and storage.filter_key must differ, both are {:?}",
    storage.quotes_key
  );

  // Remote validation
  let remote = &config.remote;
  if remote.enabled {
    anyhow::ensure!(
      remote.base_url.starts_with("http://") || remote.base_url.starts_with("https://"),
      "remote.base_url must be an http(s) URL, got {:?}",
      remote.base_url
    );
  }
  anyhow::ensure!(remote.timeout_ms > 0, "remote.timeout_ms must be positive");
  anyhow::ensure!(
    remote.sync_interval_seconds >= 1,
    "remote.sync_interval_seconds must be at least 1, got {}",
    remote.sync_interval_seconds
  );
  anyhow::ensure!(remote.fetch_limit >= 1, "remote.fetch_limit must be at least 1");
  anyhow::ensure!(
    !remote.server_category.trim().is_empty(),
    "remote.server_category must not be empty"
  );

  // Server validation
  anyhow::ensure!(
    !config.server.bind_address.is_empty(),
    "server.bind_address must not be empty"
  );

  Ok(())
}
