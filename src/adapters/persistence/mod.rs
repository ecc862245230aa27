//! Persistence Adapters - Key-Value Storage
//!
//! Implements the `KeyValueStore` port twice: atomic per-key JSON files
//! for durable data, and an in-memory map for session-scoped data.

pub mod file_store;
pub mod session_store;

pub use file_store::FileStore;
pub use session_store::SessionStore;
