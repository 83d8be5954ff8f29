//! `faktur-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no IO).

pub mod entity;
pub mod error;
pub mod field_errors;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use field_errors::FieldErrors;
pub use value_object::ValueObject;
