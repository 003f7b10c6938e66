use std::sync::Arc;

use bizap_core::{OperationId, StoreError};

use crate::types::PendingOperation;

/// Persistence collaborator for queued operations.
pub trait PendingOperationQueue: Send + Sync {
    fn enqueue(&self, operation: PendingOperation) -> Result<(), StoreError>;
    /// Pending and failed operations, oldest first.
    fn list_retryable(&self) -> Vec<PendingOperation>;
    fn update(&self, operation: PendingOperation) -> Result<(), StoreError>;
    fn get(&self, id: &OperationId) -> Option<PendingOperation>;
    /// Drop synced operations; returns how many were removed.
    fn clear_synced(&self) -> usize;
}

impl<Q> PendingOperationQueue for Arc<Q>
where
    Q: PendingOperationQueue + ?Sized,
{
    fn enqueue(&self, operation: PendingOperation) -> Result<(), StoreError> {
        (**self).enqueue(operation)
    }

    fn list_retryable(&self) -> Vec<PendingOperation> {
        (**self).list_retryable()
    }

    fn update(&self, operation: PendingOperation) -> Result<(), StoreError> {
        (**self).update(operation)
    }

    fn get(&self, id: &OperationId) -> Option<PendingOperation> {
        (**self).get(id)
    }

    fn clear_synced(&self) -> usize {
        (**self).clear_synced()
    }
}
