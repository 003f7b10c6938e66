//! Invoicing domain module.
//!
//! This crate contains business rules for invoices, quotes and their line
//! items, implemented purely as deterministic domain logic (no IO, no storage).
//! Storage is reached only through the [`InvoiceRepository`] seam.

pub mod invoice;
pub mod line_item;
pub mod repository;
pub mod status;

pub use invoice::Invoice;
pub use line_item::LineItem;
pub use repository::InvoiceRepository;
pub use status::InvoiceStatus;
