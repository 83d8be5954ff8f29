//! Invoice store: the whole invoice collection in one persisted slot.
//!
//! The store holds the collection in memory. `save` and `delete` mutate that
//! copy and rewrite the entire serialized array with a single backend `set`;
//! they never re-read storage. There is no compare-and-swap: two stores over
//! the same slot will overwrite each other's changes.

use std::collections::HashSet;

use faktur_core::{DomainError, Entity};
use faktur_invoicing::Invoice;

use crate::storage::{KeyValueStorage, StorageError};

/// Default name of the persisted slot.
pub const DEFAULT_STORAGE_KEY: &str = "sales";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SaveMode {
    /// Append a new invoice; its code must not exist yet.
    Create,
    /// Replace the invoice with the same code; it must exist.
    Update,
}

/// Invoice store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode invoice collection: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    pub fn is_duplicate_code(&self) -> bool {
        matches!(self, StoreError::Domain(DomainError::DuplicateCode(_)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Domain(DomainError::NotFound(_)))
    }
}

pub struct InvoiceStore<S> {
    storage: S,
    key: String,
    invoices: Vec<Invoice>,
}

impl<S: KeyValueStorage> InvoiceStore<S> {
    /// Open the store over `storage` using the default slot name and load the
    /// collection.
    pub fn open(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            invoices: Vec::new(),
        };
        store.load_all();
        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reload the collection from the slot.
    ///
    /// Fails soft: an absent slot, unparseable data or an unreadable backend
    /// all yield an empty collection. Records that break a field rule, and
    /// later records repeating a code, are dropped with a warning.
    pub fn load_all(&mut self) -> &[Invoice] {
        self.invoices = match self.storage.get(&self.key) {
            Ok(Some(bytes)) => decode(&self.key, &bytes),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "failed to read invoice slot; treating as empty");
                Vec::new()
            }
        };
        &self.invoices
    }

    /// The collection as last loaded or written.
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| invoice.id() == code)
    }

    pub fn save(&mut self, invoice: Invoice, mode: SaveMode) -> Result<(), StoreError> {
        let code = invoice.invoice_code().to_string();
        let position = self.position(&code);

        match (mode, position) {
            (SaveMode::Create, Some(_)) => {
                return Err(DomainError::duplicate_code(code).into());
            }
            (SaveMode::Update, None) => {
                return Err(DomainError::not_found(code).into());
            }
            (SaveMode::Create, None) => {
                self.invoices.push(invoice);
                if let Err(err) = self.persist() {
                    self.invoices.pop();
                    return Err(err);
                }
            }
            (SaveMode::Update, Some(index)) => {
                let previous = core::mem::replace(&mut self.invoices[index], invoice);
                if let Err(err) = self.persist() {
                    self.invoices[index] = previous;
                    return Err(err);
                }
            }
        }

        tracing::info!(invoice_code = %code, mode = ?mode, count = self.invoices.len(), "invoice saved");
        Ok(())
    }

    /// Remove the invoice with `code`. Returns whether one was removed;
    /// removing an unknown code writes nothing.
    pub fn delete(&mut self, code: &str) -> Result<bool, StoreError> {
        let Some(index) = self.position(code) else {
            tracing::debug!(invoice_code = %code, "delete of unknown invoice code ignored");
            return Ok(false);
        };

        let removed = self.invoices.remove(index);
        if let Err(err) = self.persist() {
            self.invoices.insert(index, removed);
            return Err(err);
        }

        tracing::info!(invoice_code = %code, count = self.invoices.len(), "invoice deleted");
        Ok(true)
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.invoices.iter().position(|invoice| invoice.id() == code)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&self.invoices).map_err(StoreError::Encode)?;
        self.storage.set(&self.key, &bytes)?;
        Ok(())
    }
}

fn decode(key: &str, bytes: &[u8]) -> Vec<Invoice> {
    let mut invoices: Vec<Invoice> = match serde_json::from_slice(bytes) {
        Ok(invoices) => invoices,
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "invoice slot is not a valid invoice array; treating as empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    invoices.retain(|invoice| {
        let errors = invoice.field_errors();
        if !errors.is_empty() {
            tracing::warn!(key = %key, invoice_code = %invoice.invoice_code(), errors = %errors, "dropping invalid stored invoice");
            return false;
        }
        if !seen.insert(invoice.invoice_code().to_string()) {
            tracing::warn!(key = %key, invoice_code = %invoice.invoice_code(), "dropping stored invoice with duplicate code");
            return false;
        }
        true
    });

    for invoice in &mut invoices {
        if let Some(stale) = invoice.reconcile() {
            tracing::warn!(
                invoice_code = %invoice.invoice_code(),
                stored = stale,
                computed = invoice.grand_total(),
                "stored grand total was stale; recomputed"
            );
        }
    }
    invoices
}
