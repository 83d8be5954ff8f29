//! Configuration loading and representation.

use std::path::PathBuf;

use anyhow::Context;

use crate::storage::RedbStorage;
use crate::store::{DEFAULT_STORAGE_KEY, InvoiceStore};

pub const DB_PATH_VAR: &str = "FAKTUR_DB_PATH";
pub const STORAGE_KEY_VAR: &str = "FAKTUR_STORAGE_KEY";
pub const DEFAULT_DB_PATH: &str = "faktur.redb";

/// Where the invoice collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// redb database file.
    pub db_path: PathBuf,
    /// Name of the persisted slot inside the database.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Read `FAKTUR_DB_PATH` / `FAKTUR_STORAGE_KEY`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let db_path = match lookup(DB_PATH_VAR).filter(|v| !v.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => {
                tracing::info!(path = %defaults.db_path.display(), "{DB_PATH_VAR} not set; using default");
                defaults.db_path
            }
        };
        let storage_key = lookup(STORAGE_KEY_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.storage_key);

        Self { db_path, storage_key }
    }

    /// Open the redb database and load the invoice store from it.
    pub fn open_store(&self) -> anyhow::Result<InvoiceStore<RedbStorage>> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data directory at {}", parent.display()))?;
        }

        let storage = RedbStorage::open(&self.db_path)
            .with_context(|| format!("failed to open invoice database at {}", self.db_path.display()))?;

        Ok(InvoiceStore::with_key(storage, self.storage_key.clone()))
    }
}
