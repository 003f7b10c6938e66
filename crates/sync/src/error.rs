use thiserror::Error;

use bizap_core::StoreError;

/// Failure while pushing an operation to the server.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The server holds a revision of the same entity.
    #[error("server has a conflicting revision (updated at {server_updated_at_ms} ms)")]
    Conflict { server_updated_at_ms: i64 },

    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected operation: {0}")]
    Rejected(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
