//! Persistence collaborators for the registry.
//!
//! [`InMemoryStore`] keeps the latest snapshot in memory and is used in
//! tests and for throwaway sessions. [`JsonFileStore`] mirrors the
//! collection to a JSON file, the durable source of truth across restarts.

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::InMemoryStore;
pub use snaplink_core::{RecordStore, StorageError};
