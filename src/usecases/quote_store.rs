//! Quote Store - Collection Ownership, Persistence and Filtering
//!
//! Owns the in-memory quote collection and every operation the
//! presentation layer triggers:
//! - Load-or-seed from the durable snapshot
//! - Random display with a session-scoped "last viewed" record
//! - Add, filter, export, import, clear
//! - Applying a remote merge
//!
//! Each mutating operation reads the current state, computes the new
//! one and commits it with a single durable write before returning.
//! Storage failures are logged and flagged but never block the
//! in-memory collection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::StorageConfig;
use crate::domain::error::QuoteError;
use crate::domain::merge::{append_new, merge};
use crate::domain::quote::{
  CategoryFilter, Quote, categories_of, default_quotes, filter_quotes, parse_collection,
};
use crate::ports::key_value::KeyValueStore;

/// Storage keys used by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
  /// Durable key of the collection snapshot.
  pub quotes: String,
  /// Durable key of the last filter selection.
  pub filter: String,
  /// Ephemeral key of the last viewed quote.
  pub last_viewed: String,
}

impl Default for StoreKeys {
  fn default() -> Self {
    Self::from(&StorageConfig::default())
  }
}

impl From<&StorageConfig> for StoreKeys {
  fn from(config: &StorageConfig) -> Self {
    Self {
      quotes: config.quotes_key.clone(),
      filter: config.filter_key.clone(),
      last_viewed: config.last_viewed_key.clone(),
    }
  }
}

/// Where the collection came from on the last `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
  /// A valid snapshot with this many quotes was adopted.
  Snapshot(usize),
  /// Nothing usable was stored; the seed set was installed.
  Seeded,
}

/// A quote together with its position in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedQuote {
  /// Zero-based index in the collection.
  pub index: usize,
  /// Collection size at display time.
  pub total: usize,
  /// The quote itself.
  pub quote: Quote,
}

/// Result of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
  /// Quotes appended to the collection.
  pub added: usize,
  /// Valid quotes skipped because their text already existed.
  pub skipped: usize,
  /// Elements rejected for lacking a string `text`.
  pub invalid: usize,
}

/// Result of applying remote data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
  /// Collection size before the merge.
  pub before: usize,
  /// Collection size after the merge.
  pub after: usize,
  /// Whether the collection changed at all.
  pub changed: bool,
}

/// Single owner of the quote collection and its persisted state.
pub struct QuoteStore {
  /// Durable storage (survives restarts).
  durable: Arc<dyn KeyValueStore>,
  /// Ephemeral storage (current session only).
  session: Arc<dyn KeyValueStore>,
  /// Storage keys.
  keys: StoreKeys,
  /// Current collection, insertion order.
  quotes: Vec<Quote>,
  /// Current category filter.
  selection: CategoryFilter,
  /// Random source for display picks.
  rng: StdRng,
  /// Set when the last durable write failed.
  persistence_degraded: bool,
  /// Total failed durable writes this session.
  storage_failures: u64,
}

impl QuoteStore {
  /// Create an empty store. Call [`QuoteStore::load`] before use, or use
  /// [`QuoteStore::open`].
  pub fn new(
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    keys: StoreKeys,
  ) -> Self {
    Self {
      durable,
      session,
      keys,
      quotes: Vec::new(),
      selection: CategoryFilter::All,
      rng: StdRng::from_entropy(),
      persistence_degraded: false,
      storage_failures: 0,
    }
  }

  /// Create a store, load the collection and restore the last filter.
  pub async fn open(
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    keys: StoreKeys,
  ) -> Self {
    let mut store = Self::new(durable, session, keys);
    store.load().await;
    store.restore_filter().await;
    store
  }

  /// Use a deterministic random source.
  #[must_use]
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.rng = StdRng::seed_from_u64(seed);
    self
  }

  /// Current collection.
  pub fn quotes(&self) -> &[Quote] {
    &self.quotes
  }

  /// Number of quotes held.
  pub fn len(&self) -> usize {
    self.quotes.len()
  }

  /// Whether the collection is empty.
  pub fn is_empty(&self) -> bool {
    self.quotes.is_empty()
  }

  /// Current category filter.
  pub fn selection(&self) -> &CategoryFilter {
    &self.selection
  }

  /// Whether the most recent durable write failed.
  pub fn persistence_degraded(&self) -> bool {
    self.persistence_degraded
  }

  /// Failed durable writes since startup.
  pub fn storage_failures(&self) -> u64 {
    self.storage_failures
  }

  // ── Persistence ─────────────────────────────────────────

  /// Adopt the persisted snapshot, or install and persist the seeds.
  ///
  /// Never fails: unreadable storage, invalid JSON, a non-array or any
  /// element without a string `text` all fall back to the seed set.
  #[instrument(skip(self), fields(key = %self.keys.quotes))]
  pub async fn load(&mut self) -> LoadSource {
    let raw = match self.durable.get(&self.keys.quotes).await {
      Ok(raw) => raw,
      Err(e) => {
        warn!(error = %e, "Failed to read quote snapshot, using defaults");
        None
      }
    };

    if let Some(raw) = raw {
      match parse_collection(&raw) {
        Ok(quotes) => {
          info!(count = quotes.len(), "Quote snapshot restored");
          self.quotes = quotes;
          return LoadSource::Snapshot(self.quotes.len());
        }
        Err(e) => warn!(error = %e, "Invalid quote snapshot, resetting to defaults"),
      }
    } else {
      debug!("No quote snapshot stored");
    }

    self.quotes = default_quotes();
    self.persist().await;
    info!(count = self.quotes.len(), "Seed quotes installed");
    LoadSource::Seeded
  }

  /// Write the collection to durable storage.
  ///
  /// # Errors
  /// Returns [`QuoteError::Storage`] when serialization or the write fails.
  pub async fn save(&self) -> Result<(), QuoteError> {
    let json = serde_json::to_string(&self.quotes)
      .map_err(|e| QuoteError::Storage(format!("Failed to serialize quotes: {e}")))?;
    self
      .durable
      .set(&self.keys.quotes, &json)
      .await
      .map_err(|e| QuoteError::storage(&e))
  }

  /// Save, recording rather than propagating failure.
  async fn persist(&mut self) -> bool {
    match self.save().await {
      Ok(()) => {
        self.persistence_degraded = false;
        true
      }
      Err(e) => {
        self.note_storage_failure(&e);
        false
      }
    }
  }

  fn note_storage_failure(&mut self, err: &QuoteError) {
    self.persistence_degraded = true;
    self.storage_failures += 1;
    warn!(error = %err, failures = self.storage_failures, "Persistence unavailable, continuing in memory");
  }

  // ── Display ─────────────────────────────────────────────

  /// Pick a uniformly random quote from `pool`, or from the whole
  /// collection when `pool` is `None`.
  ///
  /// Returns `None` for an empty pool. A returned quote becomes the
  /// last viewed record.
  pub async fn pick_random(&mut self, pool: Option<&[Quote]>) -> Option<Quote> {
    let pool = pool.unwrap_or(self.quotes.as_slice());
    if pool.is_empty() {
      return None;
    }
    let chosen = pool[self.rng.gen_range(0..pool.len())].clone();
    self.record_last_viewed(&chosen).await;
    Some(chosen)
  }

  /// Random quote honouring the current filter selection.
  pub async fn next_quote(&mut self) -> Option<Quote> {
    let pool = filter_quotes(&self.quotes, &self.selection);
    self.pick_random(Some(&pool)).await
  }

  /// Show the quote at `index`, falling back to a random pick when the
  /// index is out of range.
  pub async fn show_at(&mut self, index: usize) -> Option<IndexedQuote> {
    let total = self.quotes.len();
    if total == 0 {
      return None;
    }
    let index = if index < total {
      index
    } else {
      self.rng.gen_range(0..total)
    };
    let quote = self.quotes[index].clone();
    self.record_last_viewed(&quote).await;
    Some(IndexedQuote {
      index,
      total,
      quote,
    })
  }

  /// The last viewed quote of this session, if any parses.
  pub async fn last_viewed(&self) -> Option<Quote> {
    let raw = match self.session.get(&self.keys.last_viewed).await {
      Ok(raw) => raw?,
      Err(e) => {
        warn!(error = %e, "Session store unavailable");
        return None;
      }
    };
    let value: Value = serde_json::from_str(&raw).ok()?;
    Quote::from_json(&value)
  }

  /// What to display on startup: the last viewed quote, else a random one.
  pub async fn restore_display(&mut self) -> Option<Quote> {
    if let Some(quote) = self.last_viewed().await {
      debug!(%quote, "Restoring last viewed quote");
      return Some(quote);
    }
    self.next_quote().await
  }

  async fn record_last_viewed(&self, quote: &Quote) {
    let Ok(json) = serde_json::to_string(quote) else {
      return;
    };
    if let Err(e) = self.session.set(&self.keys.last_viewed, &json).await {
      warn!(error = %e, "Failed to record last viewed quote");
    }
  }

  // ── Mutation ────────────────────────────────────────────

  /// Validate, append and persist a new quote.
  ///
  /// Text and category are trimmed; empty text is rejected, an empty
  /// category becomes `Uncategorized`. The new quote is also recorded
  /// as last viewed. A failed durable write is reported but does not
  /// undo the add.
  ///
  /// # Errors
  /// Returns [`QuoteError::Validation`] when `text` is blank.
  #[instrument(skip(self, text))]
  pub async fn add_quote(&mut self, text: &str, category: &str) -> Result<Quote, QuoteError> {
    let quote = Quote::new(text, category)?;
    self.quotes.push(quote.clone());
    self.persist().await;
    self.record_last_viewed(&quote).await;
    info!(category = %quote.category, total = self.quotes.len(), "Quote added");
    Ok(quote)
  }

  /// Replace the collection with `merge(remote, current)` and persist.
  #[instrument(skip(self, remote), fields(remote = remote.len()))]
  pub async fn apply_remote(&mut self, remote: &[Quote]) -> MergeSummary {
    let before = self.quotes.len();
    let merged = merge(remote, &self.quotes);
    let changed = merged != self.quotes;

    if changed {
      self.quotes = merged;
      self.persist().await;
    }

    let summary = MergeSummary {
      before,
      after: self.quotes.len(),
      changed,
    };
    debug!(?summary, "Remote quotes merged");
    summary
  }

  /// Delete the snapshot and reseed, returning the refreshed display.
  ///
  /// Irreversible: callers must confirm with the user first. The seeds
  /// replace the collection even when the snapshot can't be removed;
  /// they are then written over it. The stored filter is kept but falls
  /// back to `all` if its category vanished.
  #[instrument(skip(self))]
  pub async fn clear_and_reset(&mut self) -> Option<Quote> {
    if let Err(e) = self.durable.remove(&self.keys.quotes).await {
      let err = QuoteError::storage(&e);
      self.note_storage_failure(&err);
    }
    self.quotes = default_quotes();
    self.persist().await;
    self.restore_filter().await;
    info!(count = self.quotes.len(), "Saved quotes cleared");
    self.next_quote().await
  }

  // ── Filtering ───────────────────────────────────────────

  /// Distinct categories in first-seen order.
  pub fn categories(&self) -> Vec<String> {
    categories_of(&self.quotes)
  }

  /// Select `filter`, persist the selection and return the matching
  /// quotes in collection order.
  ///
  /// The selection is recorded even if the caller never displays the
  /// result.
  #[instrument(skip(self, filter), fields(filter = %filter))]
  pub async fn filter_by(&mut self, filter: CategoryFilter) -> Vec<Quote> {
    if let Err(e) = self.durable.set(&self.keys.filter, filter.as_str()).await {
      let err = QuoteError::storage(&e);
      self.note_storage_failure(&err);
    }
    self.selection = filter;
    filter_quotes(&self.quotes, &self.selection)
  }

  /// Quotes matching the current selection, without touching storage.
  pub fn filtered(&self) -> Vec<Quote> {
    filter_quotes(&self.quotes, &self.selection)
  }

  /// Re-apply the stored selection if it still names `all` or a
  /// category present in the collection; otherwise select `all`.
  pub async fn restore_filter(&mut self) -> &CategoryFilter {
    let stored = match self.durable.get(&self.keys.filter).await {
      Ok(stored) => stored,
      Err(e) => {
        warn!(error = %e, "Failed to read last filter");
        None
      }
    };

    self.selection = match stored.map(|raw| CategoryFilter::parse(&raw)) {
      Some(CategoryFilter::Category(c)) if self.quotes.iter().any(|q| q.category == c) => {
        CategoryFilter::Category(c)
      }
      _ => CategoryFilter::All,
    };
    debug!(selection = %self.selection, "Filter restored");
    &self.selection
  }

  // ── Import / export ─────────────────────────────────────

  /// Current collection as pretty-printed JSON.
  ///
  /// # Errors
  /// Returns [`QuoteError::Format`] if serialization fails.
  pub fn export_json(&self) -> Result<String, QuoteError> {
    serde_json::to_string_pretty(&self.quotes)
      .map_err(|e| QuoteError::Format(format!("Failed to serialize quotes: {e}")))
  }

  /// Merge a JSON document into the collection.
  ///
  /// The document must be an array. Elements without a string `text`
  /// are ignored; a non-empty array with no usable element is rejected.
  /// Quotes whose text already exists (in the collection or earlier in
  /// the same document) are skipped. Survivors are appended in document
  /// order and persisted with one write.
  ///
  /// # Errors
  /// Returns [`QuoteError::Format`] for invalid JSON, a non-array, or an
  /// array without any valid quote.
  #[instrument(skip(self, raw), fields(bytes = raw.len()))]
  pub async fn import_json(&mut self, raw: &str) -> Result<ImportSummary, QuoteError> {
    let value: Value = serde_json::from_str(raw)
      .map_err(|e| QuoteError::Format(format!("Invalid JSON file: {e}")))?;
    let Value::Array(items) = value else {
      return Err(QuoteError::Format(
        "Imported JSON must be an array of quote objects".to_string(),
      ));
    };

    let cleaned: Vec<Quote> = items.iter().filter_map(Quote::from_json).collect();
    let invalid = items.len() - cleaned.len();
    if cleaned.is_empty() && !items.is_empty() {
      return Err(QuoteError::Format(
        "No valid quote objects found in file".to_string(),
      ));
    }

    let valid = cleaned.len();
    let added = append_new(&mut self.quotes, cleaned);
    self.persist().await;

    let summary = ImportSummary {
      added,
      skipped: valid - added,
      invalid,
    };
    info!(?summary, "Quotes imported");
    Ok(summary)
  }
}

/// Download name for an export taken at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
  let stamp = now
    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    .replace([':', '.'], "-");
  format!("quotes_export_{stamp}.json")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::persistence::SessionStore;
  use crate::domain::quote::UNCATEGORIZED;
  use async_trait::async_trait;
  use chrono::TimeZone;

  /// Durable store whose writes always fail.
  struct FullStore;

  #[async_trait]
  impl KeyValueStore for FullStore {
    async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
      Ok(None)
    }
    async fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
      anyhow::bail!("quota exceeded")
    }
    async fn remove(&self, _key: &str) -> anyhow::Result<()> {
      anyhow::bail!("quota exceeded")
    }
    async fn is_healthy(&self) -> bool {
      false
    }
  }

  fn q(text: &str, category: &str) -> Quote {
    Quote {
      text: text.to_string(),
      category: category.to_string(),
    }
  }

  async fn store_with(durable: Arc<SessionStore>) -> QuoteStore {
    QuoteStore::open(durable, Arc::new(SessionStore::new()), StoreKeys::default())
      .await
      .with_seed(7)
  }

  #[tokio::test]
  async fn test_load_seeds_and_persists_when_absent() {
    let durable = Arc::new(SessionStore::new());
    let store = store_with(Arc::clone(&durable)).await;

    assert_eq!(store.quotes(), default_quotes().as_slice());
    let saved = durable.get("quotes_v1").await.unwrap().unwrap();
    assert_eq!(parse_collection(&saved).unwrap(), default_quotes());
  }

  #[tokio::test]
  async fn test_load_seeds_on_malformed_snapshots() {
    for bad in ["not json", "{\"text\":\"a\"}", "[{\"text\":1}]", "[1,2]", "null"] {
      let durable = Arc::new(SessionStore::new());
      durable.set("quotes_v1", bad).await.unwrap();
      let mut store = store_with(Arc::clone(&durable)).await;

      assert_eq!(store.quotes(), default_quotes().as_slice(), "input {bad}");
      assert_eq!(store.load().await, LoadSource::Snapshot(4));
    }
  }

  #[tokio::test]
  async fn test_load_adopts_snapshot_and_defaults_category() {
    let durable = Arc::new(SessionStore::new());
    durable
      .set("quotes_v1", r#"[{"text":"a","category":"X"},{"text":"b","category":5}]"#)
      .await
      .unwrap();
    let store = store_with(durable).await;
    assert_eq!(store.quotes(), &[q("a", "X"), q("b", UNCATEGORIZED)]);
  }

  #[tokio::test]
  async fn test_add_validation() {
    let mut store = store_with(Arc::new(SessionStore::new())).await;

    let err = store.add_quote("", "X").await.unwrap_err();
    assert!(matches!(err, QuoteError::Validation(_)));
    assert_eq!(store.len(), 4);

    let added = store.add_quote("hi", "").await.unwrap();
    assert_eq!(added, q("hi", UNCATEGORIZED));
    assert_eq!(store.quotes().last(), Some(&added));
    assert_eq!(store.last_viewed().await, Some(added));
  }

  #[tokio::test]
  async fn test_add_persists_snapshot() {
    let durable = Arc::new(SessionStore::new());
    let mut store = store_with(Arc::clone(&durable)).await;
    store.add_quote(" Keep going ", " Grit ").await.unwrap();

    let reopened = store_with(durable).await;
    assert_eq!(reopened.quotes().last(), Some(&q("Keep going", "Grit")));
  }

  #[tokio::test]
  async fn test_storage_failure_keeps_memory_working() {
    let mut store =
      QuoteStore::open(Arc::new(FullStore), Arc::new(SessionStore::new()), StoreKeys::default())
        .await;
    assert!(store.persistence_degraded());

    store.add_quote("still here", "X").await.unwrap();
    assert_eq!(store.len(), 5);
    assert!(store.storage_failures() >= 2);
    assert!(store.save().await.is_err());
  }

  #[tokio::test]
  async fn test_pick_random_empty_pool_is_none() {
    let mut store = store_with(Arc::new(SessionStore::new())).await;
    assert_eq!(store.pick_random(Some(&[])).await, None);
    assert_eq!(store.last_viewed().await, None);

    let picked = store.pick_random(None).await.unwrap();
    assert!(store.quotes().contains(&picked));
    assert_eq!(store.last_viewed().await, Some(picked));
  }

  #[tokio::test]
  async fn test_filter_records_selection_durably() {
    let durable = Arc::new(SessionStore::new());
    let mut store = store_with(Arc::clone(&durable)).await;

    let life = store.filter_by(CategoryFilter::parse("Life")).await;
    assert_eq!(life.len(), 1);
    assert_eq!(life[0].category, "Life");
    assert_eq!(
      durable.get("lastSelectedCategory").await.unwrap().as_deref(),
      Some("Life")
    );

    let none = store.filter_by(CategoryFilter::parse("Nope")).await;
    assert!(none.is_empty());
    assert_eq!(store.next_quote().await, None);

    let all = store.filter_by(CategoryFilter::All).await;
    assert_eq!(all, store.quotes());
  }

  #[tokio::test]
  async fn test_restore_filter_only_for_known_category() {
    let durable = Arc::new(SessionStore::new());
    durable.set("lastSelectedCategory", "Wisdom").await.unwrap();
    let store = store_with(Arc::clone(&durable)).await;
    assert_eq!(store.selection(), &CategoryFilter::Category("Wisdom".into()));

    durable.set("lastSelectedCategory", "Gone").await.unwrap();
    let store = store_with(durable).await;
    assert_eq!(store.selection(), &CategoryFilter::All);
  }

  #[tokio::test]
  async fn test_next_quote_honours_selection() {
    let mut store = store_with(Arc::new(SessionStore::new())).await;
    store.filter_by(CategoryFilter::parse("Design")).await;
    for _ in 0..10 {
      assert_eq!(store.next_quote().await.unwrap().category, "Design");
    }
  }

  #[tokio::test]
  async fn test_show_at_falls_back_when_out_of_range() {
    let mut store = store_with(Arc::new(SessionStore::new())).await;
    let shown = store.show_at(2).await.unwrap();
    assert_eq!(shown.index, 2);
    assert_eq!(shown.total, 4);
    assert_eq!(shown.quote, default_quotes()[2]);

    let fallback = store.show_at(99).await.unwrap();
    assert!(fallback.index < 4);
  }

  #[tokio::test]
  async fn test_restore_display_prefers_last_viewed() {
    let session = Arc::new(SessionStore::new());
    session
      .set("lastViewedQuote", r#"{"text":"remembered","category":"Mine"}"#)
      .await
      .unwrap();
    let mut store =
      QuoteStore::open(Arc::new(SessionStore::new()), session, StoreKeys::default()).await;
    assert_eq!(store.restore_display().await, Some(q("remembered", "Mine")));
  }

  #[tokio::test]
  async fn test_import_dedups_by_text() {
    let mut store = store_with(Arc::new(SessionStore::new())).await;
    let existing = default_quotes()[0].text.clone();

    let raw = format!(r#"[{{"text":"{existing}","category":"Other"}}]"#);
    let summary = store.import_json(&raw).await.unwrap();
    assert_eq!(summary.added, 0);
    assert_eq!(summary.skipped, 1);

    let raw = r#"[{"text":"new one"},{"text":" new two ","category":" Fresh "},{"bogus":true}]"#;
    let summary = store.import_json(raw).await.unwrap();
    assert_eq!(summary.added, 2);
    assert_eq!(summary.invalid, 1);
    assert!(store.quotes().contains(&q("new one", UNCATEGORIZED)));
    assert!(store.quotes().contains(&q("new two", "Fresh")));
  }

  #[tokio::test]
  async fn test_import_rejects_bad_documents() {
    let mut store = store_with(Arc::new(SessionStore::new())).await;
    for bad in ["{}", "nonsense", r#"[{"title":"x"}]"#] {
      let err = store.import_json(bad).await.unwrap_err();
      assert!(matches!(err, QuoteError::Format(_)), "input {bad}");
    }
    assert_eq!(store.len(), 4);
    assert_eq!(store.import_json("[]").await.unwrap().added, 0);
  }

  #[tokio::test]
  async fn test_export_import_round_trip_into_empty_collection() {
    let mut source = store_with(Arc::new(SessionStore::new())).await;
    source.add_quote("extra", "Misc").await.unwrap();
    let exported = source.export_json().unwrap();
    assert!(exported.contains('\n'));

    let durable = Arc::new(SessionStore::new());
    durable.set("quotes_v1", "[]").await.unwrap();
    let mut target = store_with(durable).await;
    assert!(target.is_empty());

    let summary = target.import_json(&exported).await.unwrap();
    assert_eq!(summary.added, 5);
    assert_eq!(target.quotes(), source.quotes());
  }

  #[tokio::test]
  async fn test_clear_and_reset_reseeds() {
    let durable = Arc::new(SessionStore::new());
    let mut store = store_with(Arc::clone(&durable)).await;
    store.add_quote("temporary", "Scratch").await.unwrap();
    store.filter_by(CategoryFilter::parse("Scratch")).await;

    let shown = store.clear_and_reset().await;
    assert!(shown.is_some());
    assert_eq!(store.quotes(), default_quotes().as_slice());
    assert_eq!(store.selection(), &CategoryFilter::All);

    let mut reloaded = store_with(durable).await;
    reloaded.load().await;
    assert_eq!(reloaded.quotes(), default_quotes().as_slice());
  }

  /// Durable store that keeps its data but refuses to delete it.
  #[derive(Default)]
  struct StickyStore {
    inner: SessionStore,
  }

  #[async_trait]
  impl KeyValueStore for StickyStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
      self.inner.get(key).await
    }
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
      self.inner.set(key, value).await
    }
    async fn remove(&self, _key: &str) -> anyhow::Result<()> {
      anyhow::bail!("permission denied")
    }
    async fn is_healthy(&self) -> bool {
      true
    }
  }

  #[tokio::test]
  async fn test_clear_reseeds_even_when_remove_fails() {
    let durable = Arc::new(StickyStore::default());
    let mut store = QuoteStore::open(
      Arc::clone(&durable) as Arc<dyn KeyValueStore>,
      Arc::new(SessionStore::new()),
      StoreKeys::default(),
    )
    .await
    .with_seed(7);
    store.add_quote("user data", "Mine").await.unwrap();

    let shown = store.clear_and_reset().await;
    assert!(shown.is_some());
    assert_eq!(store.quotes(), default_quotes().as_slice());
    assert_eq!(store.storage_failures(), 1);
    // The seeds were written over the snapshot that could not be removed.
    assert!(!store.persistence_degraded());
    let saved = durable.get("quotes_v1").await.unwrap().unwrap();
    assert_eq!(parse_collection(&saved).unwrap(), default_quotes());
  }

  #[tokio::test]
  async fn test_load_keeps_snapshot_with_blank_element() {
    let durable = Arc::new(SessionStore::new());
    let raw = r#"[{"text":"keep me","category":"A"},{"text":"  ","category":"B"}]"#;
    durable.set("quotes_v1", raw).await.unwrap();

    let mut store = store_with(Arc::clone(&durable)).await;
    assert_eq!(store.quotes(), vec![q("keep me", "A")].as_slice());
    assert_eq!(store.load().await, LoadSource::Snapshot(1));
    // Nothing was overwritten with the seeds.
    assert_eq!(durable.get("quotes_v1").await.unwrap().as_deref(), Some(raw));
  }

  #[tokio::test]
  async fn test_apply_remote_replaces_and_is_stable() {
    let durable = Arc::new(SessionStore::new());
    let mut store = store_with(Arc::clone(&durable)).await;
    let remote = vec![q("from server", "Server"), q(&default_quotes()[1].text, "Server")];

    let first = store.apply_remote(&remote).await;
    assert!(first.changed);
    assert_eq!(first.after, 5);
    assert_eq!(store.quotes()[0], q("from server", "Server"));

    let second = store.apply_remote(&remote).await;
    assert!(!second.changed);
    assert_eq!(second.after, 5);

    let reopened = store_with(durable).await;
    assert_eq!(reopened.quotes(), store.quotes());
  }

  #[test]
  fn test_export_file_name_has_no_colons_or_dots_in_stamp() {
    let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 5, 3).unwrap();
    assert_eq!(
      export_file_name(now),
      "quotes_export_2026-10-17T09-05-03-000Z.json"
    );
  }
}
