//! Use cases composed from the domain crates and their storage seams.

mod dashboard;
mod documents;
mod error;
mod invoices;

pub use dashboard::DashboardService;
pub use documents::DocumentService;
pub use error::ServiceError;
pub use invoices::InvoiceService;
