use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latest rates for one base currency, as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base: String,
    pub rates: HashMap<String, f64>,
    /// Provider timestamp in Unix seconds.
    pub timestamp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateSourceError {
    #[error("rate provider unreachable: {0}")]
    Network(String),

    #[error("rate provider returned status {0}")]
    Status(u16),

    #[error("unreadable rate payload: {0}")]
    Parse(String),
}

/// Remote provider of exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_latest(&self, base: &str, api_key: &str) -> Result<RateSnapshot, RateSourceError>;
}

#[async_trait]
impl<S> RateSource for Arc<S>
where
    S: RateSource + ?Sized,
{
    async fn fetch_latest(&self, base: &str, api_key: &str) -> Result<RateSnapshot, RateSourceError> {
        (**self).fetch_latest(base, api_key).await
    }
}
