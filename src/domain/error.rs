//! Quote error taxonomy.
//!
//! Every store operation reports one of four kinds. Adapters speak
//! `anyhow`; the use cases convert at the boundary with
//! [`QuoteError::storage`] and [`QuoteError::network`].

use thiserror::Error;

/// Errors surfaced by quote store operations.
///
/// None of these are fatal: storage and network failures degrade the
/// session (no persistence, no sync) while the in-memory collection keeps
/// working.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// A required field was empty.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Malformed JSON, or JSON that is not an array of quotes.
    #[error("Format error: {0}")]
    Format(String),
    /// The durable or ephemeral store rejected a read/write.
    #[error("Storage error: {0}")]
    Storage(String),
    /// The remote endpoint failed, timed out or returned garbage.
    #[error("Network error: {0}")]
    Network(String),
}

impl QuoteError {
    /// Wrap an adapter error as a storage failure, keeping its context chain.
    pub fn storage(err: &anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }

    /// Wrap an adapter error as a network failure, keeping its context chain.
    pub fn network(err: &anyhow::Error) -> Self {
        Self::Network(format!("{err:#}"))
    }
}
