//! Background workers.

pub mod rate_refresh;
pub mod sync_worker;

pub use rate_refresh::RateRefreshWorker;
pub use sync_worker::{RemoteSyncClient, SyncWorker};
