//! CoinGecko simple-price provider.
//!
//! `GET {base}/api/v3/simple/price?ids={asset}&vs_currencies={vs}` answers
//! `{"bitcoin": {"eur": 61234.5}}`. Unknown ids produce an empty object.
//! Retries use exponential backoff; 403 trips the circuit breaker at once and
//! repeated 429s trip it through the failure counter.

use super::circuit_breaker::CircuitBreaker;
use super::source::{PriceError, PriceSource};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Public CoinGecko API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com";

pub struct CoinGeckoProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl CoinGeckoProvider {
    pub fn new(
        base_url: impl Into<String>,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, PriceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("pocketfolio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PriceError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            circuit_breaker,
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Provider against the public API with a polling circuit breaker.
    pub fn public() -> Result<Self, PriceError> {
        Self::new(DEFAULT_BASE_URL, Arc::new(CircuitBreaker::for_polling()))
    }

    pub fn with_retry_policy(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    fn price_url(&self) -> String {
        format!("{}/api/v3/simple/price", self.base_url)
    }

    fn fetch_with_retry(&self, asset: &str, vs_currency: &str) -> Result<f64, PriceError> {
        let url = self.price_url();
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(PriceError::CircuitBreakerTripped);
            }

            let response = self
                .client
                .get(&url)
                .query(&[("ids", asset), ("vs_currencies", vs_currency)])
                .send();

            let resp = match response {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(PriceError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(PriceError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();
            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(PriceError::CircuitBreakerTripped);
            }
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(PriceError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }
            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(PriceError::Other(format!("HTTP {status} for {asset}")));
                continue;
            }

            let body: Value = resp.json().map_err(|e| {
                PriceError::ResponseFormatChanged(format!("failed to parse price for {asset}: {e}"))
            })?;
            let price = parse_simple_price(&body, asset, vs_currency)?;
            self.circuit_breaker.record_success();
            return Ok(price);
        }

        Err(last_error.unwrap_or_else(|| PriceError::Other("max retries exceeded".into())))
    }
}

/// Extract `body[asset][vs_currency]` as a positive finite price.
pub fn parse_simple_price(body: &Value, asset: &str, vs_currency: &str) -> Result<f64, PriceError> {
    let quotes = body
        .as_object()
        .ok_or_else(|| PriceError::ResponseFormatChanged("expected a JSON object".into()))?;

    let not_found = || PriceError::AssetNotFound {
        asset: asset.to_string(),
        vs_currency: vs_currency.to_string(),
    };

    let price = quotes
        .get(asset)
        .and_then(|q| q.get(vs_currency))
        .and_then(Value::as_f64)
        .ok_or_else(not_found)?;

    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(not_found())
    }
}

impl PriceSource for CoinGeckoProvider {
    fn name(&self) -> &str {
        "coingecko"
    }

    fn fetch_price(&self, asset: &str, vs_currency: &str) -> Result<f64, PriceError> {
        self.fetch_with_retry(asset, vs_currency)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}
