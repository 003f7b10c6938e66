//! In-memory persistence collaborators for tests, demos and embedding.
//!
//! Each store is a `RwLock<HashMap>` behind the domain crate's trait. A
//! poisoned lock surfaces as [`StoreError::Backend`] on writes and as an empty
//! result on reads.

mod customers;
mod documents;
mod invoices;
mod operations;

pub use customers::InMemoryCustomerRepository;
pub use documents::InMemoryDocumentRepository;
pub use invoices::InMemoryInvoiceRepository;
pub use operations::InMemoryPendingQueue;

use bizap_core::StoreError;

pub(crate) fn poisoned<T>(_: T) -> StoreError {
    StoreError::backend("store lock poisoned")
}
