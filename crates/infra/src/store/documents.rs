use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use bizap_core::{DocumentId, InvoiceId, StoreError};
use bizap_documents::{DocumentRepository, GeneratedDocument};

use super::poisoned;

#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    inner: RwLock<HashMap<DocumentId, GeneratedDocument>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn insert(&self, document: GeneratedDocument) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if map.contains_key(&document.id) {
            return Err(StoreError::Conflict(format!("document {} exists", document.id)));
        }
        map.insert(document.id, document);
        Ok(())
    }

    fn update(&self, document: GeneratedDocument) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        match map.get_mut(&document.id) {
            Some(slot) => {
                *slot = document;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("document {}", document.id))),
        }
    }

    fn get(&self, id: &DocumentId) -> Option<GeneratedDocument> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn list_for_invoice(&self, invoice_id: &InvoiceId) -> Vec<GeneratedDocument> {
        let Ok(map) = self.inner.read() else {
            return vec![];
        };
        let mut docs: Vec<GeneratedDocument> = map
            .values()
            .filter(|d| &d.related_invoice_id == invoice_id)
            .cloned()
            .collect();
        docs.sort_by_key(|d| d.created_at);
        docs
    }

    fn delete_for_invoice(&self, invoice_id: &InvoiceId) -> Vec<GeneratedDocument> {
        let Ok(mut map) = self.inner.write() else {
            return vec![];
        };
        let ids: Vec<DocumentId> = map
            .values()
            .filter(|d| &d.related_invoice_id == invoice_id)
            .map(|d| d.id)
            .collect();
        ids.iter().filter_map(|id| map.remove(id)).collect()
    }

    fn known_paths(&self) -> Vec<PathBuf> {
        let Ok(map) = self.inner.read() else {
            return vec![];
        };
        map.values().map(|d| d.absolute_path.clone()).collect()
    }
}
