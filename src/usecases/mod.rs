//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! quote workflows.
//!
//! Use cases:
//! - `QuoteStore`: collection ownership, persistence, filtering, import/export
//! - `SyncService`: periodic remote merge and best-effort posting

pub mod quote_store;
pub mod sync;

pub use quote_store::{QuoteStore, StoreKeys};
pub use sync::{SharedStore, SyncService};
