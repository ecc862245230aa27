//! Remote Quote API Adapter
//!
//! Implements the HTTP side of remote synchronization against a
//! JSONPlaceholder-style posts endpoint.
//!
//! Sub-modules:
//! - `client`: HTTP client with timeout and retries
//! - `remote_quotes`: `RemoteQuotes` port implementation
//! - `types`: API request/response type definitions

pub mod client;
pub mod remote_quotes;
pub mod types;

pub use client::{RemoteClient, RemoteClientConfig};
pub use remote_quotes::HttpRemoteQuotes;
