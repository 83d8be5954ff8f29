use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{KeyValueStorage, StorageError};

/// In-memory key-value storage for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Storage pre-seeded with one raw value (e.g. a hand-written or corrupt slot).
    pub fn with_value(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        if let Ok(mut map) = storage.inner.write() {
            map.insert(key.into(), value.into());
        }
        storage
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get("sales").unwrap(), None);

        storage.set("sales", b"[]").unwrap();
        assert_eq!(storage.get("sales").unwrap(), Some(b"[]".to_vec()));

        storage.remove("sales").unwrap();
        storage.remove("sales").unwrap();
        assert_eq!(storage.get("sales").unwrap(), None);
    }

    #[test]
    fn shared_handle_sees_writes() {
        let storage = InMemoryStorage::arc();
        let handle = Arc::clone(&storage);

        handle.set("sales", b"[1]").unwrap();

        assert_eq!(storage.get("sales").unwrap(), Some(b"[1]".to_vec()));
    }
}
