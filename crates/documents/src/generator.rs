//! Render a document and record it, as one unit.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use bizap_invoicing::Invoice;

use crate::document::{DocumentType, GeneratedDocument};
use crate::error::DocumentError;
use crate::naming::generate_file_name;
use crate::repository::DocumentRepository;

/// Rendering collaborator: draws an invoice into a PDF file at `target`.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, invoice: &Invoice, target: &Path) -> anyhow::Result<()>;
}

/// Renders invoices into a working directory and records each file.
///
/// A file that has no record is never left behind by this type: if recording
/// fails, the file is deleted before the error is returned. Files orphaned by
/// a crash between the two steps are swept by [`crate::reconcile_orphans`].
pub struct DocumentGenerator<R, D> {
    renderer: R,
    repository: D,
    work_dir: PathBuf,
}

impl<R, D> DocumentGenerator<R, D>
where
    R: PdfRenderer,
    D: DocumentRepository,
{
    pub fn new(renderer: R, repository: D, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            repository,
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn repository(&self) -> &D {
        &self.repository
    }

    /// Render `invoice` and insert its [`GeneratedDocument`] row.
    pub fn generate_and_save_invoice(
        &self,
        invoice: &Invoice,
        counter: u32,
        now: DateTime<Utc>,
    ) -> Result<GeneratedDocument, DocumentError> {
        let file_type = if invoice.is_quote {
            DocumentType::Quote
        } else {
            DocumentType::Invoice
        };
        let file_name = generate_file_name(
            &invoice.customer_name,
            invoice.date,
            counter,
            file_type.as_str(),
        );

        fs::create_dir_all(&self.work_dir)?;
        let path = self.work_dir.join(&file_name);
        // Rollback below deletes `path`, so it must be ours to delete.
        if path.try_exists()? {
            return Err(DocumentError::AlreadyExists { path });
        }

        if let Err(source) = self.renderer.render(invoice, &path) {
            remove_quietly(&path);
            return Err(DocumentError::Render { path, source });
        }

        let document = match GeneratedDocument::for_existing_file(invoice.id, &path, file_type, now) {
            Ok(doc) => doc,
            Err(e) => {
                remove_quietly(&path);
                return Err(DocumentError::Render {
                    path,
                    source: anyhow::Error::new(e),
                });
            }
        };

        if let Err(source) = self.repository.insert(document.clone()) {
            warn!(
                invoice_id = %invoice.id,
                path = %path.display(),
                error = %source,
                "document record insert failed; removing rendered file"
            );
            remove_quietly(&path);
            return Err(DocumentError::Record { path, source });
        }

        info!(
            invoice_id = %invoice.id,
            document_id = %document.id,
            file_name = %document.file_name,
            "generated document"
        );
        Ok(document)
    }
}

/// Best-effort delete used on rollback paths.
fn remove_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove orphaned file"),
    }
}
