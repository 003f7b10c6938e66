use thiserror::Error;

use bizap_core::{DomainError, StoreError};
use bizap_documents::DocumentError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("failed to encode sync payload: {0}")]
    Payload(#[from] serde_json::Error),
}
