//! Long-term storage of generated files.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::document::GeneratedDocument;
use crate::error::DocumentError;

/// Moves generated files into the app-private documents directory and copies
/// them out to shared locations on request.
#[derive(Debug, Clone)]
pub struct DocumentArchiver {
    documents_dir: PathBuf,
}

impl DocumentArchiver {
    pub fn new(documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            documents_dir: documents_dir.into(),
        }
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Copy `source` into the documents directory, then delete the source.
    ///
    /// Copy-then-delete rather than rename so that moves across filesystems
    /// behave the same. A failed source delete keeps the archived copy.
    pub fn archive(&self, source: &Path) -> Result<PathBuf, DocumentError> {
        let dest = self.copy_into_archive(source)?;
        if dest != source {
            self.discard(source);
        }
        Ok(dest)
    }

    /// First half of [`archive`](Self::archive): write the archived copy and
    /// leave `source` in place.
    ///
    /// Never replaces an existing file in the documents directory. On failure
    /// only a file this call created is removed.
    pub fn copy_into_archive(&self, source: &Path) -> Result<PathBuf, DocumentError> {
        let archive_err = |path: &Path, err: io::Error| DocumentError::Archive {
            path: path.to_path_buf(),
            source: err,
        };

        let file_name = source.file_name().ok_or_else(|| {
            archive_err(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;

        fs::create_dir_all(&self.documents_dir)
            .map_err(|e| archive_err(self.documents_dir.as_path(), e))?;

        let dest = self.documents_dir.join(file_name);
        if dest == source {
            return Ok(dest);
        }

        let mut reader = File::open(source).map_err(|e| archive_err(source, e))?;
        let mut writer = match OpenOptions::new().write(true).create_new(true).open(&dest) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(DocumentError::AlreadyExists { path: dest });
            }
            Err(e) => return Err(archive_err(dest.as_path(), e)),
        };

        if let Err(e) = io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all()) {
            drop(writer);
            if let Err(cleanup) = fs::remove_file(&dest) {
                warn!(dest = %dest.display(), error = %cleanup, "failed to remove partial archive copy");
            }
            return Err(archive_err(source, e));
        }

        debug!(dest = %dest.display(), "archived document");
        Ok(dest)
    }

    /// Delete a file, logging instead of failing. Returns whether it is gone.
    pub fn discard(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to remove document file"
                );
                false
            }
        }
    }

    /// Archive the document's file and return the record pointing at the new
    /// location.
    pub fn archive_document(
        &self,
        document: &GeneratedDocument,
    ) -> Result<GeneratedDocument, DocumentError> {
        let dest = self.archive(&document.absolute_path)?;
        Ok(GeneratedDocument {
            absolute_path: dest,
            ..document.clone()
        })
    }

    /// Copy an archived document into `export_dir`.
    ///
    /// The archived copy is only read. On failure any partially written export
    /// file is removed.
    pub fn export(
        &self,
        document: &GeneratedDocument,
        export_dir: &Path,
    ) -> Result<GeneratedDocument, DocumentError> {
        let dest = export_dir.join(&document.file_name);

        let result = fs::create_dir_all(export_dir)
            .and_then(|()| fs::copy(&document.absolute_path, &dest).map(|_| ()));

        if let Err(e) = result {
            if dest.exists() {
                if let Err(cleanup) = fs::remove_file(&dest) {
                    warn!(dest = %dest.display(), error = %cleanup, "failed to remove partial export");
                }
            }
            return Err(DocumentError::Export { path: dest, source: e });
        }

        info!(
            document_id = %document.id,
            export = %dest.display(),
            "exported document"
        );
        let mut exported = document.clone();
        exported.mark_exported(dest);
        Ok(exported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizap_core::InvoiceId;
    use chrono::Utc;

    use crate::document::{DocumentStatus, DocumentType};

    fn rendered(dir: &Path) -> GeneratedDocument {
        let path = dir.join("Invoice_Acme_01-01-2024_001.pdf");
        fs::write(&path, b"%PDF-1.4 body").unwrap();
        GeneratedDocument::for_existing_file(InvoiceId::new(), &path, DocumentType::Invoice, Utc::now())
            .unwrap()
    }

    #[test]
    fn archive_copies_then_deletes_source() {
        let work = tempfile::tempdir().unwrap();
        let docs = tempfile::tempdir().unwrap();
        let doc = rendered(work.path());

        let archiver = DocumentArchiver::new(docs.path().join("documents"));
        let archived = archiver.archive_document(&doc).unwrap();

        assert!(!doc.absolute_path.exists());
        assert!(archived.absolute_path.starts_with(archiver.documents_dir()));
        assert_eq!(fs::read(&archived.absolute_path).unwrap(), b"%PDF-1.4 body");
        assert_eq!(archived.id, doc.id);
    }

    #[test]
    fn archive_of_missing_source_fails_cleanly() {
        let docs = tempfile::tempdir().unwrap();
        let archiver = DocumentArchiver::new(docs.path());
        let err = archiver.archive(Path::new("/nope/missing.pdf")).unwrap_err();
        assert!(matches!(err, DocumentError::Archive { .. }));
        assert!(!docs.path().join("missing.pdf").exists());
    }

    #[test]
    fn missing_source_leaves_existing_archived_file_alone() {
        let docs = tempfile::tempdir().unwrap();
        let existing = docs.path().join("Invoice_Acme_01-01-2024_001.pdf");
        fs::write(&existing, b"first").unwrap();

        let archiver = DocumentArchiver::new(docs.path());
        let err = archiver
            .archive(Path::new("/nope/Invoice_Acme_01-01-2024_001.pdf"))
            .unwrap_err();

        assert!(matches!(err, DocumentError::Archive { .. }));
        assert_eq!(fs::read(&existing).unwrap(), b"first");
    }

    #[test]
    fn archive_refuses_to_replace_another_documents_file() {
        let work = tempfile::tempdir().unwrap();
        let docs = tempfile::tempdir().unwrap();
        let existing = docs.path().join("Invoice_Acme_01-01-2024_001.pdf");
        fs::write(&existing, b"first").unwrap();
        let doc = rendered(work.path());

        let archiver = DocumentArchiver::new(docs.path());
        let err = archiver.archive_document(&doc).unwrap_err();

        match err {
            DocumentError::AlreadyExists { path } => assert_eq!(path, existing),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read(&existing).unwrap(), b"first");
        assert_eq!(fs::read(&doc.absolute_path).unwrap(), b"%PDF-1.4 body");
    }

    #[test]
    fn copy_into_archive_keeps_source() {
        let work = tempfile::tempdir().unwrap();
        let docs = tempfile::tempdir().unwrap();
        let doc = rendered(work.path());

        let archiver = DocumentArchiver::new(docs.path());
        let dest = archiver.copy_into_archive(&doc.absolute_path).unwrap();

        assert!(doc.absolute_path.is_file());
        assert_eq!(fs::read(&dest).unwrap(), b"%PDF-1.4 body");
        assert!(archiver.discard(&doc.absolute_path));
        assert!(!doc.absolute_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn undeletable_source_still_yields_archived_copy() {
        use std::os::unix::fs::PermissionsExt;

        let work = tempfile::tempdir().unwrap();
        let docs = tempfile::tempdir().unwrap();
        let doc = rendered(work.path());

        fs::set_permissions(work.path(), fs::Permissions::from_mode(0o555)).unwrap();
        // Permission bits do not bind a privileged user.
        let writable = fs::write(work.path().join("check"), b"x").is_ok();
        if writable {
            let _ = fs::remove_file(work.path().join("check"));
            fs::set_permissions(work.path(), fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let archiver = DocumentArchiver::new(docs.path());
        let result = archiver.archive(&doc.absolute_path);
        fs::set_permissions(work.path(), fs::Permissions::from_mode(0o755)).unwrap();

        let dest = result.unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"%PDF-1.4 body");
        assert!(doc.absolute_path.is_file());
    }

    #[test]
    fn export_marks_document_exported() {
        let docs = tempfile::tempdir().unwrap();
        let shared = tempfile::tempdir().unwrap();
        let doc = rendered(docs.path());

        let archiver = DocumentArchiver::new(docs.path());
        let exported = archiver.export(&doc, shared.path()).unwrap();

        let export_path = shared.path().join(&doc.file_name);
        assert_eq!(
            exported.status,
            DocumentStatus::Exported {
                export_path: export_path.clone()
            }
        );
        assert!(export_path.is_file());
        assert!(doc.absolute_path.is_file());
    }

    #[test]
    fn failed_export_keeps_archived_copy() {
        let docs = tempfile::tempdir().unwrap();
        let doc = rendered(docs.path());

        // A regular file where the export directory should be.
        let blocker = docs.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let archiver = DocumentArchiver::new(docs.path());
        let err = archiver.export(&doc, &blocker).unwrap_err();

        assert!(matches!(err, DocumentError::Export { .. }));
        assert_eq!(fs::read(&doc.absolute_path).unwrap(), b"%PDF-1.4 body");
    }
}
