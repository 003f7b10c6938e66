//! Queued offline mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bizap_core::{BusinessProfileId, DomainError, DomainResult, Entity, OperationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Create,
    Update,
    Delete,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Create => "CREATE",
            OperationType::Update => "UPDATE",
            OperationType::Delete => "DELETE",
        }
    }
}

/// Status of a queued operation.
///
/// `Pending → {Synced, Failed}`; `Failed` may be retried; `Synced` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    Synced,
    Failed,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Pending => "PENDING",
            OperationStatus::Synced => "SYNCED",
            OperationStatus::Failed => "FAILED",
        }
    }

    /// Whether a sync pass should pick this operation up.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OperationStatus::Pending | OperationStatus::Failed)
    }
}

/// A mutation made while offline, waiting to be pushed to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    pub id: OperationId,
    pub operation_type: OperationType,
    /// Entity kind, e.g. `"invoice"` or `"customer"`.
    pub entity_type: String,
    pub entity_id: String,
    pub business_profile_id: BusinessProfileId,
    pub payload: Value,
    pub status: OperationStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Local revision timestamp, compared against the server's on conflict.
    pub updated_at: DateTime<Utc>,
    pub attempts: u32,
}

impl PendingOperation {
    pub fn new(
        operation_type: OperationType,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        business_profile_id: BusinessProfileId,
        payload: Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OperationId::new(),
            operation_type,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            business_profile_id,
            payload,
            status: OperationStatus::Pending,
            error: None,
            created_at: now,
            updated_at: now,
            attempts: 0,
        }
    }

    pub fn updated_at_ms(&self) -> i64 {
        self.updated_at.timestamp_millis()
    }

    pub fn mark_synced(&mut self) -> DomainResult<()> {
        if !self.status.is_retryable() {
            return Err(DomainError::invariant(format!(
                "operation {} is already synced",
                self.id
            )));
        }
        self.status = OperationStatus::Synced;
        self.error = None;
        self.attempts += 1;
        Ok(())
    }

    /// Record a failed push. The payload is kept for a later retry.
    pub fn mark_failed(&mut self, error: impl Into<String>) -> DomainResult<()> {
        if !self.status.is_retryable() {
            return Err(DomainError::invariant(format!(
                "operation {} is already synced",
                self.id
            )));
        }
        self.status = OperationStatus::Failed;
        self.error = Some(error.into());
        self.attempts += 1;
        Ok(())
    }
}

impl Entity for PendingOperation {
    type Id = OperationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
