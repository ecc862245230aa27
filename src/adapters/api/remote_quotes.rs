//! HTTP Remote Quotes — Adapter for the Posts Endpoint
//!
//! Implements the `RemoteQuotes` port on top of `RemoteClient`.
//! `GET /posts` items become quotes (`title` → text, fixed category);
//! new quotes are announced with `POST /posts`.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::client::RemoteClient;
use super::types::{CreatedResponse, NewQuoteRequest, RemotePost};
use crate::domain::quote::Quote;
use crate::ports::remote::{PostReceipt, RemoteQuotes};

/// Path of the posts collection on the remote.
const POSTS_PATH: &str = "/posts";

/// Remote quote source backed by the shared HTTP client.
pub struct HttpRemoteQuotes {
  /// Shared HTTP client with timeout + retry.
  client: Arc<RemoteClient>,
  /// Category stamped on every fetched quote.
  category: String,
  /// Maximum number of remote items taken per fetch.
  fetch_limit: usize,
}

impl HttpRemoteQuotes {
  /// Create a new remote quote source.
  pub fn new(client: Arc<RemoteClient>, category: impl Into<String>, fetch_limit: usize) -> Self {
    Self {
      client,
      category: category.into(),
      fetch_limit,
    }
  }
}

/// Map remote posts to quotes, dropping items without a usable title.
pub fn posts_to_quotes(posts: Vec<RemotePost>, category: &str, limit: usize) -> Vec<Quote> {
  posts
    .into_iter()
    .take(limit)
    .filter_map(|post| {
      let title = post.title?;
      Quote::new(&title, category).ok()
    })
    .collect()
}

#[async_trait]
impl RemoteQuotes for HttpRemoteQuotes {
  #[instrument(skip(self), fields(base = %self.client.base_url()))]
  async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
    let response = self.client.get(POSTS_PATH).await?;
    let posts: Vec<RemotePost> = response
      .json()
      .await
      .context("Failed to parse remote posts")?;

    let total = posts.len();
    let quotes = posts_to_quotes(posts, &self.category, self.fetch_limit);
    debug!(total, mapped = quotes.len(), "Fetched remote quotes");
    Ok(quotes)
  }

  #[instrument(skip(self, quote), fields(category = %quote.category))]
  async fn post_quote(&self, quote: &Quote) -> Result<PostReceipt> {
    let request = NewQuoteRequest {
      text: &quote.text,
      category: &quote.category,
    };
    let response = self.client.post_json(POSTS_PATH, &request).await?;
    let status = response.status().as_u16();

    // The body is informational; an unparsable one still counts as delivered.
    let created: Option<CreatedResponse> = response.json().await.ok();
    let remote_id = created.and_then(|c| c.id);

    info!(status, ?remote_id, "Quote posted to remote");
    Ok(PostReceipt { remote_id, status })
  }

  async fn is_healthy(&self) -> bool {
    self.client.get(POSTS_PATH).await.is_ok()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn post(title: Option<&str>) -> RemotePost {
    RemotePost {
      user_id: Some(1),
      id: Some(1),
      title: title.map(str::to_string),
      body: None,
    }
  }

  #[test]
  fn test_posts_map_to_server_quotes() {
    let quotes = posts_to_quotes(vec![post(Some("  hello ")), post(Some("world"))], "Server", 10);
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].text, "hello");
    assert!(quotes.iter().all(|q| q.category == "Server"));
  }

  #[tokio::test]
  async fn test_unreachable_remote_is_unhealthy() {
    let client = RemoteClient::new(crate::adapters::api::RemoteClientConfig {
      base_url: "http://127.0.0.1:9".to_string(),
      timeout: std::time::Duration::from_millis(200),
      max_retries: 0,
      retry_base_delay: std::time::Duration::from_millis(1),
    })
    .unwrap();
    let remote = HttpRemoteQuotes::new(Arc::new(client), "Server", 10);
    assert!(!remote.is_healthy().await);
  }

  #[test]
  fn test_posts_without_title_are_dropped_and_limit_applies() {
    let posts = vec![post(None), post(Some("")), post(Some("a")), post(Some("b"))];
    let quotes = posts_to_quotes(posts, "Server", 3);
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].text, "a");
  }
}
