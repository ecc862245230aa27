//! Remote Quote Source Port - Best-effort Sync Interface
//!
//! The remote endpoint is non-authoritative: it is read periodically
//! and merged into the local collection, and new local quotes are
//! announced to it. Neither direction is allowed to corrupt or roll
//! back local state.

use async_trait::async_trait;

use crate::domain::quote::Quote;

/// Acknowledgement of a posted quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
  /// Identifier assigned by the remote, if it returned one.
  pub remote_id: Option<u64>,
  /// HTTP status code of the response.
  pub status: u16,
}

/// Trait for remote quote providers.
#[async_trait]
pub trait RemoteQuotes: Send + Sync + 'static {
  /// Fetch the remote items already mapped to quotes.
  ///
  /// # Errors
  /// Returns error on transport failure, timeout, non-success status
  /// or an unparsable body.
  async fn fetch_quotes(&self) -> anyhow::Result<Vec<Quote>>;

  /// Announce a newly added quote. Never retried by the caller.
  async fn post_quote(&self, quote: &Quote) -> anyhow::Result<PostReceipt>;

  /// Check if the remote endpoint is reachable.
  async fn is_healthy(&self) -> bool;
}
