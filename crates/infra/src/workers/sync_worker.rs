//! Background worker pushing queued offline operations to the server.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, error, info, warn};

use bizap_sync::{ConflictResolver, PendingOperation, PendingOperationQueue, SyncError, Winner};

use crate::jobs::{JobOutcome, RetryPolicy};

/// Remote end of the sync protocol.
#[async_trait]
pub trait RemoteSyncClient: Send + Sync {
    /// Push an operation. A server-side revision of the same entity is
    /// reported as [`SyncError::Conflict`].
    async fn push(&self, operation: &PendingOperation) -> Result<(), SyncError>;

    /// Push an operation, overwriting whatever the server holds.
    async fn force_push(&self, operation: &PendingOperation) -> Result<(), SyncError>;
}

#[async_trait]
impl<C> RemoteSyncClient for Arc<C>
where
    C: RemoteSyncClient + ?Sized,
{
    async fn push(&self, operation: &PendingOperation) -> Result<(), SyncError> {
        (**self).push(operation).await
    }

    async fn force_push(&self, operation: &PendingOperation) -> Result<(), SyncError> {
        (**self).force_push(operation).await
    }
}

/// Drains the pending-operation queue, one pass at a time.
pub struct SyncWorker<Q, C> {
    queue: Q,
    client: C,
    pass: Mutex<()>,
    shutdown: Arc<Notify>,
    retry: RetryPolicy,
}

impl<Q, C> SyncWorker<Q, C>
where
    Q: PendingOperationQueue + 'static,
    C: RemoteSyncClient + 'static,
{
    pub fn new(queue: Q, client: C) -> Self {
        Self {
            queue,
            client,
            pass: Mutex::new(()),
            shutdown: Arc::new(Notify::new()),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Run one sync pass.
    ///
    /// Returns `Retry` without doing anything if another pass is in flight,
    /// and `Retry` if any operation failed to push. Failed operations keep
    /// their payload and are picked up again on the next pass.
    pub async fn do_sync(&self) -> JobOutcome {
        let Ok(_pass) = self.pass.try_lock() else {
            debug!("sync pass already running");
            return JobOutcome::Retry;
        };

        let pending = self.queue.list_retryable();
        if pending.is_empty() {
            debug!("no pending operations");
            return JobOutcome::Success;
        }

        info!(count = pending.len(), "syncing pending operations");
        let mut failures = 0usize;

        for mut operation in pending {
            let pushed = self.push_one(&operation).await;
            let marked = match pushed {
                Ok(()) => operation.mark_synced(),
                Err(e) => {
                    warn!(
                        operation_id = %operation.id,
                        entity_type = %operation.entity_type,
                        entity_id = %operation.entity_id,
                        error = %e,
                        "operation failed to sync"
                    );
                    failures += 1;
                    operation.mark_failed(e.to_string())
                }
            };

            if let Err(e) = marked {
                error!(operation_id = %operation.id, error = %e, "invalid operation state");
                failures += 1;
                continue;
            }
            if let Err(e) = self.queue.update(operation) {
                error!(error = %e, "failed to persist operation status");
                failures += 1;
            }
        }

        let cleared = self.queue.clear_synced();
        debug!(cleared, failures, "sync pass finished");

        if failures > 0 {
            JobOutcome::Retry
        } else {
            JobOutcome::Success
        }
    }

    async fn push_one(&self, operation: &PendingOperation) -> Result<(), SyncError> {
        match self.client.push(operation).await {
            Err(SyncError::Conflict { server_updated_at_ms }) => {
                match ConflictResolver::resolve(operation.updated_at_ms(), server_updated_at_ms) {
                    Winner::Server => {
                        info!(
                            operation_id = %operation.id,
                            entity_id = %operation.entity_id,
                            "server revision is newer; dropping local change"
                        );
                        Ok(())
                    }
                    Winner::Local => {
                        debug!(operation_id = %operation.id, "local revision wins; forcing push");
                        self.client.force_push(operation).await
                    }
                }
            }
            other => other,
        }
    }

    /// Ask a running [`start`](Self::start) loop to stop.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Spawn a loop running a pass every `interval`, backing off after
    /// consecutive failed passes.
    pub fn start(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            info!("background sync worker started");

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut consecutive_failures = 0u32;

            loop {
                tokio::select! {
                    _ = shutdown.notified() => break,
                    _ = ticker.tick() => {}
                }

                match self.do_sync().await {
                    JobOutcome::Success => consecutive_failures = 0,
                    JobOutcome::Retry | JobOutcome::Failure => {
                        consecutive_failures = consecutive_failures.saturating_add(1);
                        let backoff = self.retry.delay_for_attempt(consecutive_failures);
                        debug!(?backoff, consecutive_failures, "backing off before next sync");
                        tokio::select! {
                            _ = shutdown.notified() => break,
                            _ = tokio::time::sleep(backoff) => {}
                        }
                    }
                }
            }

            info!("background sync worker stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    use bizap_core::BusinessProfileId;
    use bizap_sync::{OperationStatus, OperationType};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use crate::store::InMemoryPendingQueue;

    /// Server stub: per-entity behaviour, records what reached it.
    #[derive(Default)]
    struct FakeServer {
        conflicts: HashMap<String, i64>,
        offline: Vec<String>,
        pushed: StdMutex<Vec<String>>,
        forced: StdMutex<Vec<String>>,
    }

    #[async_trait]
    impl RemoteSyncClient for FakeServer {
        async fn push(&self, op: &PendingOperation) -> Result<(), SyncError> {
            if self.offline.contains(&op.entity_id) {
                return Err(SyncError::Network("connection refused".into()));
            }
            if let Some(server_ms) = self.conflicts.get(&op.entity_id) {
                return Err(SyncError::Conflict {
                    server_updated_at_ms: *server_ms,
                });
            }
            self.pushed.lock().unwrap().push(op.entity_id.clone());
            Ok(())
        }

        async fn force_push(&self, op: &PendingOperation) -> Result<(), SyncError> {
            self.forced.lock().unwrap().push(op.entity_id.clone());
            Ok(())
        }
    }

    fn op_at(entity: &str, ms: i64) -> PendingOperation {
        let at = Utc.timestamp_millis_opt(ms).unwrap();
        PendingOperation::new(
            OperationType::Update,
            "invoice",
            entity,
            BusinessProfileId::new(),
            json!({"entity": entity}),
            at,
        )
    }

    fn worker(server: FakeServer, ops: &[PendingOperation]) -> SyncWorker<Arc<InMemoryPendingQueue>, Arc<FakeServer>> {
        let queue = Arc::new(InMemoryPendingQueue::new());
        for op in ops {
            queue.enqueue(op.clone()).unwrap();
        }
        SyncWorker::new(queue, Arc::new(server))
    }

    #[tokio::test]
    async fn empty_queue_succeeds() {
        let worker = worker(FakeServer::default(), &[]);
        assert_eq!(worker.do_sync().await, JobOutcome::Success);
    }

    #[tokio::test]
    async fn pushes_and_clears_synced_operations() {
        let worker = worker(FakeServer::default(), &[op_at("a", 1), op_at("b", 2)]);
        assert_eq!(worker.do_sync().await, JobOutcome::Success);
        assert!(worker.queue().is_empty());
        assert_eq!(*worker.client.pushed.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn conflicts_follow_last_write_wins() {
        let server = FakeServer {
            conflicts: HashMap::from([("older".to_string(), 2000), ("newer".to_string(), 2000)]),
            ..Default::default()
        };
        let worker = worker(server, &[op_at("older", 1000), op_at("newer", 3000)]);

        assert_eq!(worker.do_sync().await, JobOutcome::Success);
        assert_eq!(*worker.client.forced.lock().unwrap(), vec!["newer"]);
        assert!(worker.client.pushed.lock().unwrap().is_empty());
        assert!(worker.queue().is_empty());
    }

    #[tokio::test]
    async fn failures_are_kept_for_retry() {
        let server = FakeServer {
            offline: vec!["b".to_string()],
            ..Default::default()
        };
        let failing = op_at("b", 2);
        let worker = worker(server, &[op_at("a", 1), failing.clone()]);

        assert_eq!(worker.do_sync().await, JobOutcome::Retry);

        let stored = worker.queue().get(&failing.id).unwrap();
        assert_eq!(stored.status, OperationStatus::Failed);
        assert_eq!(stored.payload, failing.payload);
        assert!(stored.error.unwrap().contains("connection refused"));
        assert_eq!(worker.queue().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_pass_returns_retry() {
        let worker = worker(FakeServer::default(), &[op_at("a", 1)]);
        let _held = worker.pass.lock().await;

        assert_eq!(worker.do_sync().await, JobOutcome::Retry);
        assert_eq!(worker.queue().len(), 1);
    }

    #[tokio::test]
    async fn start_stops_on_shutdown() {
        let worker = Arc::new(worker(FakeServer::default(), &[op_at("a", 1)]));
        let handle = worker.clone().start(Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        worker.shutdown();
        handle.await.unwrap();

        assert!(worker.queue().is_empty());
    }
}
