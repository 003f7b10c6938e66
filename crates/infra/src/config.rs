//! Runtime configuration read from `BIZAP_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use bizap_observability::LogFormat;

pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate.host/latest";
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 900;
pub const DEFAULT_RATE_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a {expected}, got `{value}`")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// App-private directory holding archived documents.
    pub documents_dir: PathBuf,
    /// Shared location documents are exported to.
    pub export_dir: Option<PathBuf>,
    /// Scratch directory PDFs are rendered into before archival.
    pub work_dir: PathBuf,
    pub base_currency: String,
    /// Empty disables the exchange-rate refresh.
    pub rates_api_key: String,
    pub rates_url: String,
    pub sync_interval: Duration,
    pub rate_retention_days: i64,
    pub log_format: LogFormat,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("data/documents"),
            export_dir: None,
            work_dir: std::env::temp_dir().join("bizap"),
            base_currency: "USD".to_string(),
            rates_api_key: String::new(),
            rates_url: DEFAULT_RATES_URL.to_string(),
            sync_interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            rate_retention_days: DEFAULT_RATE_RETENTION_DAYS,
            log_format: LogFormat::Json,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for each key; unset or blank keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let sync_secs = match get("BIZAP_SYNC_INTERVAL_SECS") {
            Some(raw) => parse_number::<u64>("BIZAP_SYNC_INTERVAL_SECS", &raw)?,
            None => DEFAULT_SYNC_INTERVAL_SECS,
        };
        if sync_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "BIZAP_SYNC_INTERVAL_SECS",
                value: "0".to_string(),
                expected: "positive integer",
            });
        }

        let rate_retention_days = match get("BIZAP_RATE_RETENTION_DAYS") {
            Some(raw) => parse_number::<i64>("BIZAP_RATE_RETENTION_DAYS", &raw)?,
            None => DEFAULT_RATE_RETENTION_DAYS,
        };

        let log_format = match get("BIZAP_LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "BIZAP_LOG_FORMAT",
                value: raw,
                expected: "`json` or `compact`",
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            documents_dir: get("BIZAP_DOCUMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.documents_dir),
            export_dir: get("BIZAP_EXPORT_DIR").map(PathBuf::from),
            work_dir: get("BIZAP_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            base_currency: get("BIZAP_BASE_CURRENCY")
                .map(|c| c.trim().to_ascii_uppercase())
                .unwrap_or(defaults.base_currency),
            rates_api_key: get("BIZAP_RATES_API_KEY").unwrap_or_default(),
            rates_url: get("BIZAP_RATES_URL").unwrap_or(defaults.rates_url),
            sync_interval: Duration::from_secs(sync_secs),
            rate_retention_days,
            log_format,
            log_level: get("BIZAP_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Install the tracing subscriber described by this config.
    pub fn init_tracing(&self) {
        bizap_observability::init_with(self.log_format, &self.log_level);
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        expected: "non-negative integer",
    })
}
