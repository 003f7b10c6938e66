//! Parties domain module.
//!
//! Customers are referenced by invoices, never owned by them: an invoice keeps a
//! denormalized copy of the customer name so history survives customer edits
//! and deletions.

pub mod customer;
pub mod repository;

pub use customer::{Customer, is_valid_email};
pub use repository::CustomerRepository;
