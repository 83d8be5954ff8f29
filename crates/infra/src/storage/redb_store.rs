use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};

use super::{KeyValueStorage, StorageError};

const SLOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("slots");

fn backend(err: impl core::fmt::Display) -> StorageError {
    StorageError::Backend(err.to_string())
}

/// Durable key-value storage backed by an embedded redb database file.
///
/// Every `set`/`remove` is its own write transaction, so a slot rewrite is
/// all-or-nothing.
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<Database>,
}

impl core::fmt::Debug for RedbStorage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RedbStorage").finish_non_exhaustive()
    }
}

impl RedbStorage {
    /// Open or create the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = Database::create(path).map_err(backend)?;
        tracing::debug!(path = %path.display(), "opened redb storage");
        Self::init(db)
    }

    /// Non-persistent database, for tests.
    pub fn in_memory() -> Result<Self, StorageError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(backend)?;
        Self::init(db)
    }

    fn init(db: Database) -> Result<Self, StorageError> {
        // Create the table up front so read transactions never see it missing.
        let write_txn = db.begin_write().map_err(backend)?;
        {
            let _table = write_txn.open_table(SLOTS).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl KeyValueStorage for RedbStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(SLOTS).map_err(backend)?;
        let value = table.get(key).map_err(backend)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(SLOTS).map_err(backend)?;
            table.insert(key, value).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(SLOTS).map_err(backend)?;
            table.remove(key).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)
    }
}
