use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use bizap_core::StoreError;

use super::model::ExchangeRate;
use crate::store::poisoned;

/// Persistence collaborator for exchange-rate snapshots.
pub trait ExchangeRateStore: Send + Sync {
    /// Insert or replace the rate for its currency pair.
    fn upsert(&self, rate: ExchangeRate) -> Result<(), StoreError>;
    fn get(&self, base: &str, target: &str) -> Option<ExchangeRate>;
    fn list(&self, base: &str) -> Vec<ExchangeRate>;
    /// Remove rates last updated before `cutoff`; returns how many were removed.
    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize;
}

impl<S> ExchangeRateStore for Arc<S>
where
    S: ExchangeRateStore + ?Sized,
{
    fn upsert(&self, rate: ExchangeRate) -> Result<(), StoreError> {
        (**self).upsert(rate)
    }

    fn get(&self, base: &str, target: &str) -> Option<ExchangeRate> {
        (**self).get(base, target)
    }

    fn list(&self, base: &str) -> Vec<ExchangeRate> {
        (**self).list(base)
    }

    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        (**self).purge_older_than(cutoff)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryExchangeRateStore {
    inner: RwLock<HashMap<(String, String), ExchangeRate>>,
}

impl InMemoryExchangeRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExchangeRateStore for InMemoryExchangeRateStore {
    fn upsert(&self, rate: ExchangeRate) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let key = (rate.base_currency_code.clone(), rate.target_currency_code.clone());
        map.insert(key, rate);
        Ok(())
    }

    fn get(&self, base: &str, target: &str) -> Option<ExchangeRate> {
        let map = self.inner.read().ok()?;
        map.get(&(base.to_ascii_uppercase(), target.to_ascii_uppercase()))
            .cloned()
    }

    fn list(&self, base: &str) -> Vec<ExchangeRate> {
        let Ok(map) = self.inner.read() else {
            return vec![];
        };
        let base = base.to_ascii_uppercase();
        let mut rates: Vec<ExchangeRate> = map
            .values()
            .filter(|r| r.base_currency_code == base)
            .cloned()
            .collect();
        rates.sort_by(|a, b| a.target_currency_code.cmp(&b.target_currency_code));
        rates
    }

    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let Ok(mut map) = self.inner.write() else {
            return 0;
        };
        let before = map.len();
        map.retain(|_, r| r.last_updated >= cutoff);
        before - map.len()
    }
}
