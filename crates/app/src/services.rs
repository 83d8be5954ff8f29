//! Invoice workflows: listing, detail, create/edit forms, delete.
//!
//! Each view entry point reloads the collection from storage first, the way a
//! view re-reads the slot when it opens. Mutations go through the store, which
//! rewrites the whole slot.

use chrono::{DateTime, Utc};

use faktur_core::{DomainError, FieldErrors};
use faktur_infra::{InvoiceStore, KeyValueStorage, SaveMode, StoreError};
use faktur_invoicing::validation::{messages, paths};
use faktur_invoicing::{Invoice, InvoiceDraft};

use crate::confirm::{Confirm, DELETE_PROMPT};
use crate::routes::Route;

/// One row of the invoice listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSummary {
    pub invoice_code: String,
    pub invoice_date: DateTime<Utc>,
    pub item_count: usize,
    pub grand_total: u64,
}

impl From<&Invoice> for InvoiceSummary {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_code: invoice.invoice_code().to_string(),
            invoice_date: invoice.invoice_date(),
            item_count: invoice.items().len(),
            grand_total: invoice.grand_total(),
        }
    }
}

/// Why a form submission did not save.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Field errors to show next to the form inputs (includes a duplicate code).
    #[error("invalid invoice: {0}")]
    Invalid(FieldErrors),
    /// The invoice being edited no longer exists; go back to the listing.
    #[error("invoice not found: {0}")]
    NotFound(String),
    /// Persisting failed.
    #[error(transparent)]
    Store(StoreError),
}

impl SubmitError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Where to navigate instead of showing the error inline.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            SubmitError::NotFound(_) => Some(Route::List),
            _ => None,
        }
    }
}

fn duplicate_code_errors() -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(paths::INVOICE_CODE, messages::CODE_EXISTS);
    errors
}

impl From<DomainError> for SubmitError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(errors) => SubmitError::Invalid(errors),
            DomainError::DuplicateCode(_) => SubmitError::Invalid(duplicate_code_errors()),
            DomainError::NotFound(code) => SubmitError::NotFound(code),
            other @ DomainError::InvariantViolation(_) => {
                SubmitError::Store(StoreError::Domain(other))
            }
        }
    }
}

impl From<StoreError> for SubmitError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Domain(err) => err.into(),
            other => SubmitError::Store(other),
        }
    }
}

pub struct InvoiceService<S> {
    store: InvoiceStore<S>,
}

impl<S: KeyValueStorage> InvoiceService<S> {
    pub fn new(store: InvoiceStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &InvoiceStore<S> {
        &self.store
    }

    /// Listing rows in stored order.
    pub fn list(&mut self) -> Vec<InvoiceSummary> {
        self.store.load_all().iter().map(InvoiceSummary::from).collect()
    }

    pub fn detail(&mut self, code: &str) -> Result<Invoice, DomainError> {
        self.store.load_all();
        self.store
            .find_by_code(code)
            .cloned()
            .ok_or_else(|| DomainError::not_found(code))
    }

    pub fn begin_create(&self) -> InvoiceDraft {
        InvoiceDraft::new()
    }

    /// Edit form for `code`, or `NotFound` when it does not exist.
    pub fn begin_edit(&mut self, code: &str) -> Result<InvoiceDraft, DomainError> {
        let invoice = self.detail(code)?;
        Ok(InvoiceDraft::for_edit(&invoice))
    }

    /// Validate and save a draft. Returns the view to show next: the listing
    /// after a create, the invoice's detail view after an edit.
    pub fn submit(&mut self, draft: &InvoiceDraft, mode: SaveMode) -> Result<Route, SubmitError> {
        let invoice = draft.to_invoice()?;
        let code = invoice.invoice_code().to_string();

        self.store.load_all();
        if mode == SaveMode::Create && self.store.find_by_code(&code).is_some() {
            tracing::info!(invoice_code = %code, "rejected create with existing invoice code");
            return Err(SubmitError::Invalid(duplicate_code_errors()));
        }

        self.store.save(invoice, mode)?;

        Ok(match mode {
            SaveMode::Create => Route::List,
            SaveMode::Update => Route::Detail(code),
        })
    }

    /// Delete `code` once `confirm` agrees. Returns whether an invoice was
    /// removed; a declined prompt or unknown code changes nothing.
    pub fn delete(&mut self, code: &str, confirm: &impl Confirm) -> Result<bool, StoreError> {
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(invoice_code = %code, "delete cancelled");
            return Ok(false);
        }
        self.store.load_all();
        self.store.delete(code)
    }
}
