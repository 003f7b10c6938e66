use std::path::PathBuf;

use bizap_core::{DocumentId, InvoiceId, StoreError};

use crate::document::GeneratedDocument;

/// Persistence collaborator for generated document rows.
pub trait DocumentRepository: Send + Sync {
    fn insert(&self, document: GeneratedDocument) -> Result<(), StoreError>;
    fn update(&self, document: GeneratedDocument) -> Result<(), StoreError>;
    fn get(&self, id: &DocumentId) -> Option<GeneratedDocument>;
    fn list_for_invoice(&self, invoice_id: &InvoiceId) -> Vec<GeneratedDocument>;
    /// Remove every row for an invoice (cascade from invoice deletion).
    fn delete_for_invoice(&self, invoice_id: &InvoiceId) -> Vec<GeneratedDocument>;
    /// Absolute paths of every recorded file.
    fn known_paths(&self) -> Vec<PathBuf>;
}

impl<R> DocumentRepository for std::sync::Arc<R>
where
    R: DocumentRepository + ?Sized,
{
    fn insert(&self, document: GeneratedDocument) -> Result<(), StoreError> {
        (**self).insert(document)
    }

    fn update(&self, document: GeneratedDocument) -> Result<(), StoreError> {
        (**self).update(document)
    }

    fn get(&self, id: &DocumentId) -> Option<GeneratedDocument> {
        (**self).get(id)
    }

    fn list_for_invoice(&self, invoice_id: &InvoiceId) -> Vec<GeneratedDocument> {
        (**self).list_for_invoice(invoice_id)
    }

    fn delete_for_invoice(&self, invoice_id: &InvoiceId) -> Vec<GeneratedDocument> {
        (**self).delete_for_invoice(invoice_id)
    }

    fn known_paths(&self) -> Vec<PathBuf> {
        (**self).known_paths()
    }
}
