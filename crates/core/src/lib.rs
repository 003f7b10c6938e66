//! `bizap-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no storage, no clocks).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{AggregateRoot, ExpectedVersion};
pub use entity::Entity;
pub use error::{DomainError, DomainResult, StoreError};
pub use id::{BusinessProfileId, CustomerId, DocumentId, InvoiceId, LineItemId, OperationId};
pub use value_object::ValueObject;
