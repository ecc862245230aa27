//! Prometheus Metrics Registry - Quote Store Observability
//!
//! Registers and exposes Prometheus metrics for dashboards: quote
//! additions and imports, sync outcomes, remote post failures and the
//! health of durable storage.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::usecases::quote_store::QuoteStore;

/// Centralized Prometheus metrics for the quote service.
///
/// All metrics follow the naming convention `quotebook_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Quotes added through the add operation.
    pub quotes_added: IntCounter,
    /// Quotes appended by imports.
    pub quotes_imported: IntCounter,
    /// Imports rejected as malformed.
    pub imports_rejected: IntCounter,
    /// Sync runs by outcome (`ok` / `failed`).
    pub sync_runs: IntCounterVec,
    /// Failed best-effort posts.
    pub remote_post_failures: IntCounter,
    /// Current collection size.
    pub quote_count: IntGauge,
    /// Failed durable writes since startup.
    pub storage_failures: IntGauge,
    /// Whether the last durable write failed (1 = degraded).
    pub persistence_degraded: IntGauge,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let quotes_added = IntCounter::new(
            "quotebook_quotes_added_total",
            "Quotes added by users",
        )?;

        let quotes_imported = IntCounter::new(
            "quotebook_quotes_imported_total",
            "Quotes appended by JSON imports",
        )?;

        let imports_rejected = IntCounter::new(
            "quotebook_imports_rejected_total",
            "JSON imports rejected as malformed",
        )?;

        let sync_runs = IntCounterVec::new(
            Opts::new("quotebook_sync_runs_total", "Remote sync runs by outcome"),
            &["outcome"],
        )?;

        let remote_post_failures = IntCounter::new(
            "quotebook_remote_post_failures_total",
            "Best-effort quote posts that failed",
        )?;

        let quote_count = IntGauge::new(
            "quotebook_quote_count",
            "Quotes currently in the collection",
        )?;

        let storage_failures = IntGauge::new(
            "quotebook_storage_failures",
            "Failed durable writes since startup",
        )?;

        let persistence_degraded = IntGauge::new(
            "quotebook_persistence_degraded",
            "Whether the last durable write failed (1=yes, 0=no)",
        )?;

        // Register all metrics
        registry.register(Box::new(quotes_added.clone()))?;
        registry.register(Box::new(quotes_imported.clone()))?;
        registry.register(Box::new(imports_rejected.clone()))?;
        registry.register(Box::new(sync_runs.clone()))?;
        registry.register(Box::new(remote_post_failures.clone()))?;
        registry.register(Box::new(quote_count.clone()))?;
        registry.register(Box::new(storage_failures.clone()))?;
        registry.register(Box::new(persistence_degraded.clone()))?;

        Ok(Self {
            registry,
            quotes_added,
            quotes_imported,
            imports_rejected,
            sync_runs,
            remote_post_failures,
            quote_count,
            storage_failures,
            persistence_degraded,
        })
    }

    /// Refresh the gauges that mirror store state.
    pub fn observe_store(&self, store: &QuoteStore) {
        self.quote_count
            .set(i64::try_from(store.len()).unwrap_or(i64::MAX));
        self.storage_failures
            .set(i64::try_from(store.storage_failures()).unwrap_or(i64::MAX));
        self.persistence_degraded
            .set(i64::from(store.persistence_degraded()));
    }

    /// Render all metrics in the Prometheus text format.
    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics are not valid UTF-8")
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics_self);
                async move {
                    metrics.encode().map_err(|e| {
                        (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
                    })
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
