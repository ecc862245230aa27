//! Domain layer - Quote model, filters and merge rules.
//!
//! Pure logic only (hexagonal architecture inner ring): no storage,
//! no network, no clocks. All types are serializable and testable in
//! isolation.

pub mod error;
pub mod merge;
pub mod quote;

// Re-export core types for convenience
pub use error::QuoteError;
pub use merge::{append_new, merge};
pub use quote::{CategoryFilter, Quote, UNCATEGORIZED, default_quotes};
