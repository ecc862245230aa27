//! Key-Value Store Port - Durable and Ephemeral Storage Interface
//!
//! The quote store keeps three small string values: the collection
//! snapshot and the last filter selection (durable), and the last viewed
//! quote (ephemeral, session-scoped). Both kinds of storage satisfy
//! the same trait; lifetime is a property of the adapter, not the API.

use async_trait::async_trait;

/// Trait for string key-value storage providers.
///
/// Writes replace the whole value in one operation, so a reader never
/// observes a partially written snapshot.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
  /// Read the value stored under `key`.
  ///
  /// Returns `Ok(None)` when the key was never written or was removed.
  async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

  /// Replace the value stored under `key`.
  async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

  /// Delete `key`. Removing a missing key is not an error.
  async fn remove(&self, key: &str) -> anyhow::Result<()>;

  /// Check if the store is usable (writable location, not full).
  async fn is_healthy(&self) -> bool;
}
