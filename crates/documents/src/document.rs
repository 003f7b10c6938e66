use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizap_core::{DocumentId, DomainError, DomainResult, Entity, InvoiceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Invoice,
    Quote,
}

impl DocumentType {
    /// Type label as passed to [`crate::generate_file_name`].
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Quote => "quote",
        }
    }
}

/// Where the physical file lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Only the app-private copy exists.
    Archived,
    /// A copy was also written to a shared location.
    Exported { export_path: PathBuf },
}

/// One row per successfully generated physical file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub id: DocumentId,
    pub related_invoice_id: InvoiceId,
    pub file_name: String,
    pub absolute_path: PathBuf,
    pub file_type: DocumentType,
    pub created_at: DateTime<Utc>,
    pub status: DocumentStatus,
}

impl GeneratedDocument {
    /// Create a record for a file that already exists on disk.
    pub fn for_existing_file(
        related_invoice_id: InvoiceId,
        path: &Path,
        file_type: DocumentType,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if !path.is_file() {
            return Err(DomainError::validation(format!(
                "document path does not reference a file: {}",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DomainError::validation("document path has no file name"))?;

        Ok(Self {
            id: DocumentId::new(),
            related_invoice_id,
            file_name,
            absolute_path: path.to_path_buf(),
            file_type,
            created_at,
            status: DocumentStatus::Archived,
        })
    }

    pub fn export_path(&self) -> Option<&Path> {
        match &self.status {
            DocumentStatus::Exported { export_path } => Some(export_path),
            DocumentStatus::Archived => None,
        }
    }

    /// Archived → Exported. Re-exporting replaces the recorded export path.
    pub fn mark_exported(&mut self, export_path: PathBuf) {
        self.status = DocumentStatus::Exported { export_path };
    }
}

impl Entity for GeneratedDocument {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_missing_files() {
        let err = GeneratedDocument::for_existing_file(
            InvoiceId::new(),
            Path::new("/definitely/not/here.pdf"),
            DocumentType::Invoice,
            Utc::now(),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn export_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Invoice_A_01-01-2024_001.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let mut doc =
            GeneratedDocument::for_existing_file(InvoiceId::new(), &path, DocumentType::Invoice, Utc::now())
                .unwrap();
        assert_eq!(doc.file_name, "Invoice_A_01-01-2024_001.pdf");
        assert_eq!(doc.export_path(), None);

        doc.mark_exported(PathBuf::from("/shared/x.pdf"));
        assert_eq!(doc.export_path(), Some(Path::new("/shared/x.pdf")));
    }
}
