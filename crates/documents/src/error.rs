use std::path::PathBuf;

use thiserror::Error;

use bizap_core::{DomainError, StoreError};

#[derive(Debug, Error)]
pub enum DocumentError {
    /// The rendering collaborator failed; no file is left behind.
    #[error("failed to render {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The file was written but its record could not be stored; the file was
    /// removed again.
    #[error("failed to record document {}: {source}", .path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    /// Another document already owns this file name; nothing was written.
    #[error("document file already exists: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("failed to archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to export {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
