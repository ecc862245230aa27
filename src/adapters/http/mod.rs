//! HTTP Adapter - Presentation Surface
//!
//! Serves the quote routes and health probes on one listener, with
//! graceful shutdown on the shared broadcast signal.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

use super::metrics::{HealthState, health_routes};

pub use routes::{AppState, quote_routes};

/// Full application router: quote routes plus `/live` and `/ready`.
pub fn app_router(state: AppState, health: Arc<HealthState>) -> Router {
    quote_routes(state).merge(health_routes(health))
}

/// Serve `router` on an already bound listener until shutdown.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, "HTTP server started");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
