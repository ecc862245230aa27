//! Quote Routes - HTTP Presentation Triggers
//!
//! Maps the user actions of the quote page onto HTTP:
//! show next quote, submit a quote, change the filter, export,
//! import and clear. Every handler goes through the shared store
//! lock, and network calls run only after the lock is released.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::error::QuoteError;
use crate::domain::quote::{CategoryFilter, Quote};
use crate::ports::remote::RemoteQuotes;
use crate::usecases::quote_store::{ImportSummary, IndexedQuote, export_file_name};
use crate::usecases::sync::{SharedStore, SyncReport, SyncService};

/// State shared by all quote handlers.
#[derive(Clone)]
pub struct AppState {
    /// The quote store.
    pub store: SharedStore,
    /// Remote sync, absent when disabled.
    pub sync: Option<Arc<SyncService<dyn RemoteQuotes>>>,
    /// Metrics sink.
    pub metrics: Arc<MetricsRegistry>,
    /// Announce added quotes to the remote.
    pub post_on_add: bool,
}

/// Display payload: a quote, or a message when there is nothing to show.
#[derive(Debug, Serialize, Deserialize)]
pub struct DisplayResponse {
    /// Quote to show.
    pub quote: Option<Quote>,
    /// Placeholder text when `quote` is absent.
    pub message: Option<String>,
}

impl DisplayResponse {
    fn from_pick(quote: Option<Quote>) -> Self {
        match quote {
            Some(quote) => Self {
                quote: Some(quote),
                message: None,
            },
            None => Self {
                quote: None,
                message: Some("No quotes found for this category.".to_string()),
            },
        }
    }
}

/// Response to an add: the stored quote plus whether it reached
/// durable storage.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddedQuote {
    /// The quote as stored.
    #[serde(flatten)]
    pub quote: Quote,
    /// False when the durable write failed; the quote lives in memory only.
    pub persisted: bool,
}

/// Response to a clear: the refreshed display plus the storage outcome.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearedResponse {
    /// Quote shown after reseeding.
    #[serde(flatten)]
    pub display: DisplayResponse,
    /// False when the seeds could not be written to durable storage.
    pub persisted: bool,
}

/// Listing of the current selection.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteList {
    /// Active filter.
    pub selection: String,
    /// Number of matching quotes.
    pub count: usize,
    /// Matching quotes in collection order.
    pub quotes: Vec<Quote>,
}

/// Categories dropdown payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryList {
    /// Distinct categories, first-seen order.
    pub categories: Vec<String>,
    /// Active filter.
    pub selection: String,
}

/// Body of a new quote submission.
#[derive(Debug, Deserialize)]
pub struct NewQuote {
    /// Quote text.
    pub text: String,
    /// Optional category.
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilterQuery {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClearQuery {
    #[serde(default)]
    confirm: bool,
}

/// Router with all quote routes.
pub fn quote_routes(state: AppState) -> Router {
    Router::new()
        .route("/quotes", get(list_quotes).post(add_quote).delete(clear_quotes))
        .route("/quotes/random", get(random_quote))
        .route("/quotes/current", get(current_quote))
        .route("/quotes/:index", get(quote_at))
        .route("/categories", get(categories))
        .route("/export", get(export_quotes))
        .route("/import", post(import_quotes))
        .route("/sync", post(sync_now))
        .with_state(state)
}

/// `GET /quotes[?category=]` — apply (and remember) a filter.
async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<QuoteList> {
    let mut store = state.store.lock().await;
    let quotes = match query.category {
        Some(raw) => store.filter_by(CategoryFilter::parse(&raw)).await,
        None => store.filtered(),
    };
    state.metrics.observe_store(&store);
    Json(QuoteList {
        selection: store.selection().to_string(),
        count: quotes.len(),
        quotes,
    })
}

/// `GET /quotes/random` — next random quote within the current filter.
async fn random_quote(State(state): State<AppState>) -> Json<DisplayResponse> {
    let picked = state.store.lock().await.next_quote().await;
    Json(DisplayResponse::from_pick(picked))
}

/// `GET /quotes/current` — last viewed quote, else a random one.
async fn current_quote(State(state): State<AppState>) -> Json<DisplayResponse> {
    let shown = state.store.lock().await.restore_display().await;
    Json(DisplayResponse::from_pick(shown))
}

/// `GET /quotes/{index}` — a specific quote, random when out of range.
async fn quote_at(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<IndexedQuote>, StatusCode> {
    let shown = state.store.lock().await.show_at(index).await;
    shown.map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// `POST /quotes` — add a quote, then announce it in the background.
async fn add_quote(
    State(state): State<AppState>,
    Json(body): Json<NewQuote>,
) -> Result<(StatusCode, Json<AddedQuote>), QuoteError> {
    let (quote, persisted) = {
        let mut store = state.store.lock().await;
        let quote = store
            .add_quote(&body.text, body.category.as_deref().unwrap_or_default())
            .await?;
        state.metrics.quotes_added.inc();
        state.metrics.observe_store(&store);
        (quote, !store.persistence_degraded())
    };

    if state.post_on_add {
        if let Some(sync) = state.sync.clone() {
            let posted = quote.clone();
            tokio::spawn(async move {
                // Failure is logged and counted inside; the add stands.
                let _ = sync.post_quote(&posted).await;
            });
        }
    }

    Ok((StatusCode::CREATED, Json(AddedQuote { quote, persisted })))
}

/// `GET /categories` — dropdown contents.
async fn categories(State(state): State<AppState>) -> Json<CategoryList> {
    let store = state.store.lock().await;
    Json(CategoryList {
        categories: store.categories(),
        selection: store.selection().to_string(),
    })
}

/// `GET /export` — downloadable JSON document.
async fn export_quotes(State(state): State<AppState>) -> Result<Response, QuoteError> {
    let json = state.store.lock().await.export_json()?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(Utc::now()));
    debug!(bytes = json.len(), "Export prepared");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        json,
    )
        .into_response())
}

/// `POST /import` — merge an uploaded document.
async fn import_quotes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportSummary>, QuoteError> {
    let raw = std::str::from_utf8(&body)
        .map_err(|e| QuoteError::Format(format!("File is not UTF-8 text: {e}")))?;

    let mut store = state.store.lock().await;
    match store.import_json(raw).await {
        Ok(summary) => {
            state
                .metrics
                .quotes_imported
                .inc_by(u64::try_from(summary.added).unwrap_or(u64::MAX));
            state.metrics.observe_store(&store);
            info!(added = summary.added, "{} quotes imported.", summary.added);
            Ok(Json(summary))
        }
        Err(e) => {
            state.metrics.imports_rejected.inc();
            Err(e)
        }
    }
}

/// `DELETE /quotes?confirm=true` — wipe saved quotes and reseed.
async fn clear_quotes(
    State(state): State<AppState>,
    Query(query): Query<ClearQuery>,
) -> Result<Json<ClearedResponse>, QuoteError> {
    if !query.confirm {
        return Err(QuoteError::Validation(
            "clearing saved quotes cannot be undone; repeat with confirm=true".to_string(),
        ));
    }
    let mut store = state.store.lock().await;
    let shown = store.clear_and_reset().await;
    state.metrics.observe_store(&store);
    Ok(Json(ClearedResponse {
        display: DisplayResponse::from_pick(shown),
        persisted: !store.persistence_degraded(),
    }))
}

/// `POST /sync` — run one sync immediately.
async fn sync_now(State(state): State<AppState>) -> Result<Json<SyncReport>, Response> {
    let Some(sync) = state.sync.clone() else {
        return Err((StatusCode::SERVICE_UNAVAILABLE, "remote sync disabled").into_response());
    };
    sync.sync_once()
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}
