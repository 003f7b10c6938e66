//! `bizap-documents`
//!
//! **Responsibility:** the life of a generated PDF.
//!
//! - deterministic file naming
//! - render-then-record with rollback of the physical file
//! - archival into app-private storage and optional export
//! - startup reconciliation of orphaned files
//! - the table layout used when drawing invoices onto a page

pub mod archive;
pub mod document;
pub mod error;
pub mod generator;
pub mod naming;
pub mod pdf;
pub mod reconcile;
pub mod repository;

pub use archive::DocumentArchiver;
pub use document::{DocumentStatus, DocumentType, GeneratedDocument};
pub use error::DocumentError;
pub use generator::{DocumentGenerator, PdfRenderer};
pub use naming::generate_file_name;
pub use reconcile::reconcile_orphans;
pub use repository::DocumentRepository;
