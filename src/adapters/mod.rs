//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, files, HTTP server).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: remote posts endpoint client
//! - `http`: quote routes served to the presentation layer
//! - `metrics`: Prometheus metrics export and health checks
//! - `persistence`: durable file store and session store

pub mod api;
pub mod http;
pub mod metrics;
pub mod persistence;
