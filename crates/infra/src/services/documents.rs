use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use bizap_core::InvoiceId;
use bizap_documents::{
    DocumentArchiver, DocumentError, DocumentGenerator, DocumentRepository, GeneratedDocument,
    PdfRenderer, reconcile_orphans,
};
use bizap_invoicing::Invoice;

use super::error::ServiceError;

/// Generate → archive → (optionally) export, keeping the record in step
/// with the file at every stage.
pub struct DocumentService<R, D> {
    generator: DocumentGenerator<R, D>,
    archiver: DocumentArchiver,
    export_dir: Option<PathBuf>,
}

impl<R, D> DocumentService<R, D>
where
    R: PdfRenderer,
    D: DocumentRepository,
{
    pub fn new(generator: DocumentGenerator<R, D>, archiver: DocumentArchiver) -> Self {
        Self {
            generator,
            archiver,
            export_dir: None,
        }
    }

    pub fn with_export_dir(mut self, export_dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(export_dir.into());
        self
    }

    pub fn repository(&self) -> &D {
        self.generator.repository()
    }

    /// Render and record `invoice`, move the file into the archive and export
    /// it when an export directory is configured.
    pub fn publish(
        &self,
        invoice: &Invoice,
        counter: u32,
        now: DateTime<Utc>,
    ) -> Result<GeneratedDocument, ServiceError> {
        let generated = self.generator.generate_and_save_invoice(invoice, counter, now)?;

        let source = generated.absolute_path.clone();
        let dest = self.archiver.copy_into_archive(&source)?;
        let archived = GeneratedDocument {
            absolute_path: dest.clone(),
            ..generated
        };
        // The row still names the work file until this update lands, so the
        // source is only removed afterwards.
        if let Err(e) = self.repository().update(archived.clone()) {
            if dest != source {
                self.archiver.discard(&dest);
            }
            return Err(e.into());
        }
        if dest != source {
            self.archiver.discard(&source);
        }

        let Some(export_dir) = &self.export_dir else {
            return Ok(archived);
        };
        let exported = self.archiver.export(&archived, export_dir)?;
        self.repository().update(exported.clone())?;
        Ok(exported)
    }

    /// Drop every record for an invoice and delete the archived files.
    pub fn delete_for_invoice(&self, invoice_id: &InvoiceId) -> Vec<GeneratedDocument> {
        let removed = self.repository().delete_for_invoice(invoice_id);
        for doc in &removed {
            if let Err(e) = fs::remove_file(&doc.absolute_path) {
                warn!(path = %doc.absolute_path.display(), error = %e, "failed to delete document file");
            }
        }
        removed
    }

    /// Delete archived PDFs that have no record.
    pub fn reconcile(&self) -> Result<Vec<PathBuf>, ServiceError> {
        let known = self.repository().known_paths();
        let removed = reconcile_orphans(self.archiver.documents_dir(), &known)
            .map_err(DocumentError::Io)?;
        if !removed.is_empty() {
            info!(count = removed.len(), "removed orphaned documents");
        }
        Ok(removed)
    }
}
