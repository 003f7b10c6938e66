use std::collections::HashMap;
use std::sync::RwLock;

use bizap_core::{OperationId, StoreError};
use bizap_sync::{OperationStatus, PendingOperation, PendingOperationQueue};

use super::poisoned;

#[derive(Debug, Default)]
pub struct InMemoryPendingQueue {
    inner: RwLock<HashMap<OperationId, PendingOperation>>,
}

impl InMemoryPendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PendingOperationQueue for InMemoryPendingQueue {
    fn enqueue(&self, operation: PendingOperation) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(operation.id, operation);
        Ok(())
    }

    fn list_retryable(&self) -> Vec<PendingOperation> {
        let Ok(map) = self.inner.read() else {
            return vec![];
        };
        let mut ops: Vec<PendingOperation> = map
            .values()
            .filter(|op| op.status.is_retryable())
            .cloned()
            .collect();
        // Ids are time-ordered, so they break ties between equal timestamps.
        ops.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        ops
    }

    fn update(&self, operation: PendingOperation) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        match map.get_mut(&operation.id) {
            Some(slot) => {
                *slot = operation;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("operation {}", operation.id))),
        }
    }

    fn get(&self, id: &OperationId) -> Option<PendingOperation> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn clear_synced(&self) -> usize {
        let Ok(mut map) = self.inner.write() else {
            return 0;
        };
        let before = map.len();
        map.retain(|_, op| op.status != OperationStatus::Synced);
        before - map.len()
    }
}
