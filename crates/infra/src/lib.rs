//! `bizap-infra`
//!
//! **Responsibility:** everything around the pure domain crates.
//!
//! - configuration from the environment ([`config`])
//! - in-memory implementations of the storage seams ([`store`], [`rates`])
//! - background workers for sync and exchange rates ([`workers`])
//! - use cases wiring the domain to storage and the sync queue ([`services`])

pub mod config;
pub mod jobs;
pub mod rates;
pub mod services;
pub mod store;
pub mod workers;

pub use config::{AppConfig, ConfigError};
pub use jobs::{JobOutcome, RetryPolicy};
pub use services::{DashboardService, DocumentService, InvoiceService, ServiceError};
pub use workers::{RateRefreshWorker, RemoteSyncClient, SyncWorker};
