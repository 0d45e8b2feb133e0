//! Key-value persistence layer.
//!
//! Every collection in the system is one JSON-encoded array stored as text
//! under a fixed string key. The trait is the whole persistence contract:
//! repositories never see the backend, only `get`/`set`/`remove`.

use thiserror::Error;

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Text-valued key-value store.
///
/// Implementations must be safe to share across threads; callers that need
/// compound read-modify-write atomicity (the fulfillment engine) serialize
/// around the store themselves.
pub trait KeyValueStore: Send + Sync {
    /// Get the value for a key. Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a key to a value, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
