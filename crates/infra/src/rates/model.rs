use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizap_core::{DomainError, DomainResult};

/// A stored conversion rate: `1 base = rate target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base_currency_code: String,
    pub target_currency_code: String,
    pub rate: f64,
    pub last_updated: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn new(
        base: impl Into<String>,
        target: impl Into<String>,
        rate: f64,
        last_updated: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(DomainError::validation(format!(
                "exchange rate must be positive and finite, got {rate}"
            )));
        }
        let base = base.into().trim().to_ascii_uppercase();
        let target = target.into().trim().to_ascii_uppercase();
        if base.is_empty() || target.is_empty() {
            return Err(DomainError::validation("currency code must not be blank"));
        }
        Ok(Self {
            base_currency_code: base,
            target_currency_code: target,
            rate,
            last_updated,
        })
    }

    /// Convert an amount in the base currency to the target currency.
    pub fn convert(&self, amount: f64) -> f64 {
        amount * self.rate
    }
}
