//! `bizap-sync`
//!
//! **Responsibility:** offline mutation queue and conflict policy.
//!
//! - every offline mutation is queued as a [`PendingOperation`]
//! - a sync pass pushes queued operations and resolves conflicts with a
//!   last-write-wins rule ([`ConflictResolver`])
//!
//! The queue provides no locking of its own; the sync worker serializes passes.

pub mod conflict;
pub mod error;
pub mod queue;
pub mod types;

pub use conflict::{ConflictResolver, Revision, Winner};
pub use error::SyncError;
pub use queue::PendingOperationQueue;
pub use types::{OperationStatus, OperationType, PendingOperation};
