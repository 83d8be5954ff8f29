//! Invoicing domain module.
//!
//! Business rules for sales invoices ("faktur"): the persisted data model, the
//! editable draft used by the create/edit flow, field validation, derived
//! totals and display formatting. Everything here is deterministic domain
//! logic (no IO, no storage).

pub mod draft;
pub mod format;
pub mod invoice;
pub mod totals;
pub mod validation;

pub use draft::{DraftItem, InvoiceDraft};
pub use format::{format_date, format_rupiah};
pub use invoice::{Invoice, LineItem};
pub use totals::{LineAmount, grand_total, items_total, line_subtotal};
pub use validation::{MAX_CODE_LEN, MAX_PRICE, MAX_PRODUCT_NAME_LEN, MAX_QTY};
