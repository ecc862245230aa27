//! Session Store - Ephemeral In-memory Key-Value Storage
//!
//! Values live only as long as the process (the "session"). Used for
//! the last viewed quote, and as a drop-in durable store in tests.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::key_value::KeyValueStore;

/// Process-scoped key-value store.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// Stored values.
    values: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    /// Whether no key is held.
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for SessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.write().await.remove(key);
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_overwrites_and_remove_clears() {
        let store = SessionStore::new();
        store.set("lastViewedQuote", "a").await.unwrap();
        store.set("lastViewedQuote", "b").await.unwrap();
        assert_eq!(store.get("lastViewedQuote").await.unwrap().as_deref(), Some("b"));
        assert_eq!(store.len().await, 1);

        store.remove("lastViewedQuote").await.unwrap();
        assert!(store.is_empty().await);
    }
}
