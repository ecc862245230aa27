//! Quotebook — Entry Point
//!
//! Initializes configuration, logging, storage and the remote client,
//! then serves the quote routes until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (or $QUOTEBOOK_CONFIG) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Open durable file store + session store, load-or-seed quotes
//! 4. Create remote client + sync service (if enabled)
//! 5. Spawn metrics server, sync loop and HTTP server
//! 6. Wait for SIGINT → readiness off → stop tasks → final save

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::{Mutex, broadcast};
use tracing::{error, info, warn};

use quotebook::adapters::api::{HttpRemoteQuotes, RemoteClient, RemoteClientConfig};
use quotebook::adapters::http::{self, AppState};
use quotebook::adapters::metrics::{HealthState, MetricsRegistry};
use quotebook::adapters::persistence::{FileStore, SessionStore};
use quotebook::config;
use quotebook::ports::key_value::KeyValueStore;
use quotebook::ports::remote::RemoteQuotes;
use quotebook::usecases::quote_store::{QuoteStore, StoreKeys};
use quotebook::usecases::sync::SyncService;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = config::loader::config_path();
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        remote = config.remote.enabled,
        "Starting quotebook"
    );

    // ── 3. Storage + quote store ────────────────────────────
    let durable = Arc::new(
        FileStore::new(&config.storage.data_dir)
            .await
            .context("Failed to open data directory")?,
    );
    if !durable.is_healthy().await {
        warn!(dir = %durable.dir().display(), "Data directory is not writable, quotes won't persist");
    }
    let session = Arc::new(SessionStore::new());

    let mut store = QuoteStore::open(durable, session, StoreKeys::from(&config.storage)).await;
    if let Some(quote) = store.restore_display().await {
        info!(%quote, selection = %store.selection(), "Initial quote");
    }
    let store = Arc::new(Mutex::new(store));

    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    metrics.observe_store(&*store.lock().await);

    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = Arc::new(HealthState::new());

    // ── 4. Remote sync ──────────────────────────────────────
    let sync = if config.remote.enabled {
        let client = Arc::new(
            RemoteClient::new(RemoteClientConfig::from(&config.remote))
                .context("Failed to create remote client")?,
        );
        let remote: Arc<dyn RemoteQuotes> = Arc::new(HttpRemoteQuotes::new(
            client,
            config.remote.server_category.clone(),
            config.remote.fetch_limit,
        ));
        let reachability = Arc::clone(&remote);
        let base_url = config.remote.base_url.clone();
        tokio::spawn(async move {
            if !reachability.is_healthy().await {
                warn!(base_url = %base_url, "Remote endpoint unreachable, sync will keep retrying");
            }
        });
        let service = SyncService::new(
            Arc::clone(&store),
            remote,
            Duration::from_secs(config.remote.sync_interval_seconds),
        )
        .with_metrics(Arc::clone(&metrics));
        Some(Arc::new(service))
    } else {
        warn!("Remote sync disabled");
        None
    };

    // ── 5. Spawn tasks ──────────────────────────────────────
    let mut handles = Vec::new();

    if config.metrics.enabled {
        let metrics_ref = Arc::clone(&metrics);
        let addr = config.metrics.bind_address.clone();
        let rx = shutdown_tx.subscribe();
        handles.push(tokio::spawn(async move {
            if let Err(e) = metrics_ref.serve(addr, rx).await {
                error!(error = %e, "Metrics server failed");
            }
        }));
    }

    if let Some(sync) = sync.clone() {
        let rx = shutdown_tx.subscribe();
        handles.push(tokio::spawn(async move { sync.run(rx).await }));
    }

    let state = AppState {
        store: Arc::clone(&store),
        sync,
        metrics: Arc::clone(&metrics),
        post_on_add: config.remote.post_on_add,
    };
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    let router = http::app_router(state, Arc::clone(&health));
    let server_rx = shutdown_tx.subscribe();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = http::serve(listener, router, server_rx).await {
            error!(error = %e, "HTTP server failed");
        }
    });

    info!("All tasks spawned — quotebook is running");

    // ── 6. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    health.begin_shutdown();
    let _ = shutdown_tx.send(());

    let _ = tokio::time::timeout(Duration::from_secs(10), server_handle).await;
    for handle in handles {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    let store = store.lock().await;
    if let Err(e) = store.save().await {
        warn!(error = %e, "Final save failed");
    }

    info!("Shutdown complete");
    Ok(())
}
