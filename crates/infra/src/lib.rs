//! Infrastructure layer: storage backends, the invoice store, configuration.

pub mod config;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use storage::{InMemoryStorage, KeyValueStorage, RedbStorage, StorageError};
pub use store::{InvoiceStore, SaveMode, StoreError};
