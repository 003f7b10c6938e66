//! Exchange rates: model, storage seam and remote sources.

mod model;
mod source;
mod store;

#[cfg(feature = "http")]
mod http;

pub use model::ExchangeRate;
pub use source::{RateSnapshot, RateSource, RateSourceError};
pub use store::{ExchangeRateStore, InMemoryExchangeRateStore};

#[cfg(feature = "http")]
pub use http::HttpRateSource;
