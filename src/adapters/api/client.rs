//! Remote HTTP Client - Timeout-bounded REST Client
//!
//! Wraps reqwest with a request timeout and exponential-backoff
//! retries for idempotent reads. Writes go out exactly once.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::RemoteConfig;

/// Configuration for the remote HTTP client.
#[derive(Debug, Clone)]
pub struct RemoteClientConfig {
  /// Base URL of the remote endpoint.
  pub base_url: String,
  /// Request timeout; no answer within it counts as failure.
  pub timeout: Duration,
  /// Maximum retries on transient errors (GET only).
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl Default for RemoteClientConfig {
  fn default() -> Self {
    Self {
      base_url: "https://jsonplaceholder.typicode.com".to_string(),
      timeout: Duration::from_secs(10),
      max_retries: 2,
      retry_base_delay: Duration::from_millis(200),
    }
  }
}

impl From<&RemoteConfig> for RemoteClientConfig {
  fn from(config: &RemoteConfig) -> Self {
    Self {
      base_url: config.base_url.trim_end_matches('/').to_string(),
      timeout: Duration::from_millis(config.timeout_ms),
      max_retries: config.max_retries,
      retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
    }
  }
}

/// HTTP client for the remote quote endpoint.
pub struct RemoteClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: RemoteClientConfig,
}

impl RemoteClient {
  /// Create a new remote client.
  pub fn new(config: RemoteClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(2)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, config })
  }

  /// Base URL requests are resolved against.
  pub fn base_url(&self) -> &str {
    &self.config.base_url
  }

  /// Execute a GET request, retrying transient failures.
  pub async fn get(&self, path: &str) -> Result<Response> {
    let url = format!("{}{}", self.config.base_url, path);
    let request = self.http.get(&url);
    self.execute(request, path, self.config.max_retries).await
  }

  /// Execute a JSON POST request once.
  pub async fn post_json<T: serde::Serialize + Sync>(
    &self,
    path: &str,
    body: &T,
  ) -> Result<Response> {
    let url = format!("{}{}", self.config.base_url, path);
    let request = self.http.post(&url).json(body);
    self.execute(request, path, 0).await
  }

  /// Execute request with status classification and retries.
  async fn execute(
    &self,
    request: RequestBuilder,
    path: &str,
    max_retries: u32,
  ) -> Result<Response> {
    let mut last_error = None;

    for attempt in 0..=max_retries {
      if attempt > 0 {
        let delay = self.config.retry_base_delay * 2u32.pow(attempt - 1);
        debug!(attempt, delay_ms = delay.as_millis(), path, "Retrying request");
        sleep(delay).await;
      }

      let req = request
        .try_clone()
        .context("Failed to clone request")?;

      match req.send().await {
        Ok(response) => match response.status() {
          status if status.is_success() => return Ok(response),
          StatusCode::TOO_MANY_REQUESTS => {
            warn!(path, "Rate limited by remote, backing off");
            last_error = Some(anyhow::anyhow!("Rate limited"));
          }
          status if status.is_server_error() => {
            warn!(status = %status, path, "Server error");
            last_error = Some(anyhow::anyhow!("Server error: {status}"));
          }
          status => {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Remote error {status}: {body}"));
          }
        },
        Err(e) => {
          let kind = if e.is_timeout() { "timeout" } else { "transport" };
          warn!(error = %e, attempt, kind, path, "Request failed");
          last_error = Some(e.into());
        }
      }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
  }
}
