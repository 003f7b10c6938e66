//! Periodic exchange-rate refresh.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{debug, error, info, warn};

use crate::jobs::JobOutcome;
use crate::rates::{ExchangeRate, ExchangeRateStore, RateSource};

pub struct RateRefreshWorker<S, R> {
    source: S,
    store: R,
    api_key: String,
    base_currency: String,
    retention_days: i64,
}

impl<S, R> RateRefreshWorker<S, R>
where
    S: RateSource,
    R: ExchangeRateStore,
{
    pub fn new(
        source: S,
        store: R,
        api_key: impl Into<String>,
        base_currency: impl Into<String>,
        retention_days: i64,
    ) -> Self {
        Self {
            source,
            store,
            api_key: api_key.into(),
            base_currency: base_currency.into(),
            retention_days,
        }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// Fetch and store the latest rates, then purge expired snapshots.
    ///
    /// An empty API key means the feature is off and the pass succeeds
    /// without contacting the provider.
    pub async fn do_refresh_rates(&self, now: DateTime<Utc>) -> JobOutcome {
        if self.api_key.trim().is_empty() {
            debug!("no exchange-rate API key configured; skipping refresh");
            return JobOutcome::Success;
        }

        let snapshot = match self.source.fetch_latest(&self.base_currency, &self.api_key).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(base = %self.base_currency, error = %e, "exchange-rate fetch failed");
                return JobOutcome::Failure;
            }
        };

        let fetched_at = Utc
            .timestamp_opt(snapshot.timestamp, 0)
            .single()
            .unwrap_or(now);

        let mut stored = 0usize;
        let mut skipped = 0usize;
        for (target, rate) in &snapshot.rates {
            if target.eq_ignore_ascii_case(&snapshot.base) {
                continue;
            }
            let rate = match ExchangeRate::new(&snapshot.base, target, *rate, fetched_at) {
                Ok(rate) => rate,
                Err(e) => {
                    warn!(currency = %target, error = %e, "skipping invalid exchange rate");
                    skipped += 1;
                    continue;
                }
            };
            match self.store.upsert(rate) {
                Ok(()) => stored += 1,
                Err(e) => {
                    error!(currency = %target, error = %e, "failed to store exchange rate");
                    return JobOutcome::Failure;
                }
            }
        }

        let purged = self
            .store
            .purge_older_than(now - Duration::days(self.retention_days));

        info!(base = %snapshot.base, stored, skipped, purged, "exchange rates refreshed");
        JobOutcome::Success
    }
}
