//! `faktur-app` — the invoice workflows behind the list, form and detail views.
//!
//! The service composes the validator and the invoice store; it holds no
//! presentation logic beyond plain-text rendering for the command line.

pub mod confirm;
pub mod render;
pub mod routes;
pub mod services;

pub use confirm::{Confirm, DELETE_PROMPT};
pub use routes::Route;
pub use services::{InvoiceService, InvoiceSummary, SubmitError};
