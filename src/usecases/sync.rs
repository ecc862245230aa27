//! Sync Service - Best-effort Remote Synchronization
//!
//! Periodically fetches the remote quotes and merges them into the
//! local collection (remote wins on equal text), and announces newly
//! added quotes to the remote.
//!
//! Network calls never run while the store lock is held: a sync fetches
//! first, then locks, merges against whatever the collection holds at
//! that moment and commits. A concurrent add therefore can't be lost.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, broadcast};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::error::QuoteError;
use crate::domain::quote::Quote;
use crate::ports::remote::{PostReceipt, RemoteQuotes};

use super::quote_store::QuoteStore;

/// The quote store as shared between request handlers and the sync loop.
pub type SharedStore = Arc<Mutex<QuoteStore>>;

/// Outcome of one sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
  /// Quotes received from the remote.
  pub fetched: usize,
  /// Collection size before merging.
  pub before: usize,
  /// Collection size after merging.
  pub after: usize,
  /// Whether the local collection changed.
  pub changed: bool,
  /// When the merge was committed.
  pub synced_at: DateTime<Utc>,
}

/// Coordinates fetch/merge and post against a remote source.
pub struct SyncService<R: RemoteQuotes + ?Sized> {
  /// Shared quote store.
  store: SharedStore,
  /// Remote quote source.
  remote: Arc<R>,
  /// Optional metrics sink.
  metrics: Option<Arc<MetricsRegistry>>,
  /// Time between periodic syncs.
  interval: Duration,
}

impl<R: RemoteQuotes + ?Sized> SyncService<R> {
  /// Create a new sync service.
  pub fn new(store: SharedStore, remote: Arc<R>, interval: Duration) -> Self {
    Self {
      store,
      remote,
      metrics: None,
      interval,
    }
  }

  /// Record sync outcomes in `metrics`.
  #[must_use]
  pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
    self.metrics = Some(metrics);
    self
  }

  /// Fetch remote quotes and merge them into the store.
  ///
  /// # Errors
  /// Returns [`QuoteError::Network`] if the fetch fails; the local
  /// collection is untouched in that case.
  #[instrument(skip(self))]
  pub async fn sync_once(&self) -> Result<SyncReport, QuoteError> {
    let fetched = self.remote.fetch_quotes().await.map_err(|e| {
      let err = QuoteError::network(&e);
      if let Some(metrics) = &self.metrics {
        metrics.sync_runs.with_label_values(&["failed"]).inc();
      }
      warn!(error = %err, "Remote fetch failed, keeping local quotes");
      err
    })?;

    let mut store = self.store.lock().await;
    let summary = store.apply_remote(&fetched).await;
    if let Some(metrics) = &self.metrics {
      metrics.sync_runs.with_label_values(&["ok"]).inc();
      metrics.observe_store(&store);
    }
    drop(store);

    let report = SyncReport {
      fetched: fetched.len(),
      before: summary.before,
      after: summary.after,
      changed: summary.changed,
      synced_at: Utc::now(),
    };
    info!(
      fetched = report.fetched,
      after = report.after,
      changed = report.changed,
      "Quotes synced with server"
    );
    Ok(report)
  }

  /// Announce a quote that was already committed locally.
  ///
  /// Failure is reported, never retried, and never rolls back the add.
  ///
  /// # Errors
  /// Returns [`QuoteError::Network`] if the post fails.
  #[instrument(skip(self, quote), fields(category = %quote.category))]
  pub async fn post_quote(&self, quote: &Quote) -> Result<PostReceipt, QuoteError> {
    match self.remote.post_quote(quote).await {
      Ok(receipt) => Ok(receipt),
      Err(e) => {
        let err = QuoteError::network(&e);
        if let Some(metrics) = &self.metrics {
          metrics.remote_post_failures.inc();
        }
        warn!(error = %err, "Failed to post quote to server");
        Err(err)
      }
    }
  }

  /// Run periodic syncs until shutdown.
  ///
  /// The first sync happens immediately. Failed runs are logged and
  /// the loop carries on with the next tick.
  #[instrument(skip(self, shutdown_rx), name = "sync_loop")]
  pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
    info!(
      interval_secs = self.interval.as_secs(),
      "Sync loop started"
    );

    let mut ticker = tokio::time::interval(self.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
          info!("Sync loop shutting down");
          return;
        }
        _ = ticker.tick() => {
          if let Err(e) = self.sync_once().await {
            debug!(error = %e, "Sync run failed, will retry next interval");
          }
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::persistence::SessionStore;
  use crate::domain::quote::default_quotes;
  use crate::usecases::quote_store::StoreKeys;
  use async_trait::async_trait;
  use std::sync::atomic::{AtomicUsize, Ordering};

  /// Remote returning a fixed list, or failing when `fail` is set.
  struct FixedRemote {
    quotes: Vec<Quote>,
    fail: bool,
    posts: AtomicUsize,
  }

  #[async_trait]
  impl RemoteQuotes for FixedRemote {
    async fn fetch_quotes(&self) -> anyhow::Result<Vec<Quote>> {
      if self.fail {
        anyhow::bail!("connection refused");
      }
      Ok(self.quotes.clone())
    }

    async fn post_quote(&self, _quote: &Quote) -> anyhow::Result<PostReceipt> {
      self.posts.fetch_add(1, Ordering::SeqCst);
      if self.fail {
        anyhow::bail!("connection refused");
      }
      Ok(PostReceipt {
        remote_id: Some(101),
        status: 201,
      })
    }

    async fn is_healthy(&self) -> bool {
      !self.fail
    }
  }

  async fn shared_store() -> SharedStore {
    let store = QuoteStore::open(
      Arc::new(SessionStore::new()),
      Arc::new(SessionStore::new()),
      StoreKeys::default(),
    )
    .await;
    Arc::new(Mutex::new(store))
  }

  fn remote(fail: bool) -> Arc<FixedRemote> {
    Arc::new(FixedRemote {
      quotes: vec![Quote::new("server says hi", "Server").unwrap()],
      fail,
      posts: AtomicUsize::new(0),
    })
  }

  #[tokio::test]
  async fn test_sync_merges_remote_first() {
    let store = shared_store().await;
    let sync = SyncService::new(Arc::clone(&store), remote(false), Duration::from_secs(30));

    let report = sync.sync_once().await.unwrap();
    assert_eq!(report.fetched, 1);
    assert_eq!(report.after, 5);
    assert!(report.changed);

    let again = sync.sync_once().await.unwrap();
    assert!(!again.changed);

    let guard = store.lock().await;
    assert_eq!(guard.quotes()[0].text, "server says hi");
  }

  #[tokio::test]
  async fn test_failed_fetch_leaves_store_untouched() {
    let store = shared_store().await;
    let sync = SyncService::new(Arc::clone(&store), remote(true), Duration::from_secs(30));

    let err = sync.sync_once().await.unwrap_err();
    assert!(matches!(err, QuoteError::Network(_)));
    assert_eq!(store.lock().await.quotes(), default_quotes().as_slice());
  }

  #[tokio::test]
  async fn test_failed_post_keeps_local_add() {
    let store = shared_store().await;
    let failing = remote(true);
    let sync = SyncService::new(Arc::clone(&store), Arc::clone(&failing), Duration::from_secs(30));

    let added = store.lock().await.add_quote("mine", "Me").await.unwrap();
    assert!(sync.post_quote(&added).await.is_err());
    assert_eq!(failing.posts.load(Ordering::SeqCst), 1);
    assert_eq!(store.lock().await.len(), 5);
  }

  #[tokio::test]
  async fn test_run_stops_on_shutdown() {
    let store = shared_store().await;
    let sync = SyncService::new(store, remote(false), Duration::from_secs(3600));
    let (tx, rx) = broadcast::channel(1);

    let handle = tokio::spawn(async move { sync.run(rx).await });
    tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
      .await
      .unwrap()
      .unwrap();
  }
}
