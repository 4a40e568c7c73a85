//! Price source trait and structured error types.

use std::collections::HashMap;
use thiserror::Error;

/// Structured error types for price lookups.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("no {vs_currency} price for asset '{asset}'")]
    AssetNotFound { asset: String, vs_currency: String },

    #[error("hard stop: price provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("price error: {0}")]
    Other(String),
}

/// Anything that can quote the unit price of an asset in a currency.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Latest unit price of `asset` in `vs_currency`.
    fn fetch_price(&self, asset: &str, vs_currency: &str) -> Result<f64, PriceError>;

    /// Whether the source currently accepts requests.
    fn is_available(&self) -> bool;
}

/// Fixed prices, for offline runs and command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct StaticPrices {
    prices: HashMap<String, f64>,
}

impl StaticPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, asset: impl Into<String>, price: f64) -> Self {
        self.prices.insert(asset.into(), price);
        self
    }

    pub fn contains(&self, asset: &str) -> bool {
        self.prices.contains_key(asset)
    }
}

impl PriceSource for StaticPrices {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_price(&self, asset: &str, vs_currency: &str) -> Result<f64, PriceError> {
        self.prices
            .get(asset)
            .copied()
            .ok_or_else(|| PriceError::AssetNotFound {
                asset: asset.to_string(),
                vs_currency: vs_currency.to_string(),
            })
    }

    fn is_available(&self) -> bool {
        true
    }
}
