//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `KeyValueStore`: durable and session-scoped string storage
//! - `RemoteQuotes`: best-effort remote fetch/post of quotes

pub mod key_value;
pub mod remote;

pub use key_value::KeyValueStore;
pub use remote::{PostReceipt, RemoteQuotes};
