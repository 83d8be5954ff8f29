//! Key-value storage backends for the persisted invoice slot.
//!
//! The invoice store owns exactly one key; backends only need whole-value
//! `get`/`set`/`remove`. Each call is atomic with respect to the backend.

pub mod in_memory;
pub mod redb_store;

use std::sync::Arc;

pub use in_memory::InMemoryStorage;
pub use redb_store::RedbStorage;

/// Storage backend error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The backend failed to read or write.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// A lock guarding in-process state was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Whole-value key-value storage.
pub trait KeyValueStorage: Send + Sync {
    /// Value stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S> KeyValueStorage for Arc<S>
where
    S: KeyValueStorage + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
