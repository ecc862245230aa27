//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. Storage keys,
//! the remote endpoint and sync cadence are externalized here; nothing
//! is hardcoded in the domain layer except the seed quotes.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
///
/// Only `[app]` is mandatory; every other section falls back to its
/// defaults when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and logging.
  pub app: AppSection,
  /// Durable/ephemeral storage layout.
  #[serde(default)]
  pub storage: StorageConfig,
  /// Remote sync endpoint.
  #[serde(default)]
  pub remote: RemoteConfig,
  /// HTTP surface for presentation triggers.
  #[serde(default)]
  pub server: ServerConfig,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
  /// Directory for durable key files.
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
  /// Durable key holding the quote collection.
  #[serde(default = "default_quotes_key")]
  pub quotes_key: String,
  /// Durable key holding the last category filter.
  #[serde(default = "default_filter_key")]
  pub filter_key: String,
  /// Ephemeral key holding the last viewed quote.
  #[serde(default = "default_last_viewed_key")]
  pub last_viewed_key: String,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      data_dir: default_data_dir(),
      quotes_key: default_quotes_key(),
      filter_key: default_filter_key(),
      last_viewed_key: default_last_viewed_key(),
    }
  }
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
  /// Enable periodic sync and posting.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Base URL of the posts endpoint.
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Request timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  /// Retries for fetches (posts are never retried).
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
  /// Base delay for fetch retry backoff (milliseconds).
  #[serde(default = "default_retry_delay")]
  pub retry_base_delay_ms: u64,
  /// Maximum number of remote items merged per sync.
  #[serde(default = "default_fetch_limit")]
  pub fetch_limit: usize,
  /// Interval between periodic syncs (seconds).
  #[serde(default = "default_sync_interval")]
  pub sync_interval_seconds: u64,
  /// Announce newly added quotes to the remote.
  #[serde(default = "default_true")]
  pub post_on_add: bool,
  /// Category given to fetched quotes.
  #[serde(default = "default_server_category")]
  pub server_category: String,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      base_url: default_base_url(),
      timeout_ms: default_timeout_ms(),
      max_retries: default_max_retries(),
      retry_base_delay_ms: default_retry_delay(),
      fetch_limit: default_fetch_limit(),
      sync_interval_seconds: default_sync_interval(),
      post_on_add: true,
      server_category: default_server_category(),
    }
  }
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Bind address for quote routes and health probes.
  #[serde(default = "default_server_addr")]
  pub bind_address: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_server_addr(),
    }
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: default_metrics_addr(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_data_dir() -> String {
  "data".to_string()
}

fn default_quotes_key() -> String {
  "quotes_v1".to_string()
}

fn default_filter_key() -> String {
  "lastSelectedCategory".to_string()
}

fn default_last_viewed_key() -> String {
  "lastViewedQuote".to_string()
}

fn default_base_url() -> String {
  "https://jsonplaceholder.typicode.com".to_string()
}

fn default_timeout_ms() -> u64 {
  10_000
}

fn default_max_retries() -> u32 {
  2
}

fn default_retry_delay() -> u64 {
  200
}

fn default_fetch_limit() -> usize {
  10
}

fn default_sync_interval() -> u64 {
  30
}

fn default_server_category() -> String {
  "Server".to_string()
}

fn default_server_addr() -> String {
  "127.0.0.1:8080".to_string()
}

fn default_metrics_addr() -> String {
  "127.0.0.1:9090".to_string()
}
