use async_trait::async_trait;
use tracing::debug;

use super::source::{RateSnapshot, RateSource, RateSourceError};

/// Fetches `{base, rates, timestamp}` JSON from an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    url: String,
}

impl HttpRateSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_latest(&self, base: &str, api_key: &str) -> Result<RateSnapshot, RateSourceError> {
        debug!(url = %self.url, base, "fetching exchange rates");

        let resp = self
            .client
            .get(&self.url)
            .query(&[("base", base), ("access_key", api_key)])
            .send()
            .await
            .map_err(|e| RateSourceError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RateSourceError::Status(status.as_u16()));
        }

        resp.json::<RateSnapshot>()
            .await
            .map_err(|e| RateSourceError::Parse(e.to_string()))
    }
}
