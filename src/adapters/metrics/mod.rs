//! Metrics and Monitoring Adapters
//!
//! Provides Prometheus metrics export and health check routes
//! (/live, /ready) via axum 0.7.

pub mod health;
pub mod prometheus;

pub use health::{HealthState, health_routes};
pub use prometheus::MetricsRegistry;
