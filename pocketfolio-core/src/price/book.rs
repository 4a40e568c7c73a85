//! Latest-known price per asset.
//!
//! A refresh that fails leaves the previous price in place; an asset that has
//! never been fetched successfully stays absent and values at zero.

use super::source::{PriceError, PriceSource};
use crate::domain::PriceSnapshot;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
struct Quote {
    price: f64,
    fetched_at: DateTime<Utc>,
}

/// What happened to one asset during a refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Updated { asset: String, price: f64 },
    /// The fetch failed; `kept` is the price still in use, if any.
    Failed {
        asset: String,
        error: PriceError,
        kept: Option<f64>,
    },
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    vs_currency: String,
    quotes: BTreeMap<String, Quote>,
}

impl PriceBook {
    pub fn new(vs_currency: impl Into<String>) -> Self {
        Self {
            vs_currency: vs_currency.into(),
            quotes: BTreeMap::new(),
        }
    }

    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    /// Record a price directly (command-line override, tests).
    pub fn set(&mut self, asset: impl Into<String>, price: f64) {
        self.quotes.insert(
            asset.into(),
            Quote {
                price,
                fetched_at: Utc::now(),
            },
        );
    }

    pub fn price(&self, asset: &str) -> Option<f64> {
        self.quotes.get(asset).map(|q| q.price)
    }

    pub fn fetched_at(&self, asset: &str) -> Option<DateTime<Utc>> {
        self.quotes.get(asset).map(|q| q.fetched_at)
    }

    /// Fetch every asset from `source`, keeping the last good price on failure.
    pub fn refresh<'a, I>(&mut self, source: &dyn PriceSource, assets: I) -> Vec<RefreshOutcome>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut outcomes = Vec::new();
        for asset in assets {
            match source.fetch_price(asset, &self.vs_currency) {
                Ok(price) => {
                    tracing::debug!(asset, price, source = source.name(), "price refreshed");
                    self.set(asset, price);
                    outcomes.push(RefreshOutcome::Updated {
                        asset: asset.to_string(),
                        price,
                    });
                }
                Err(error) => {
                    let kept = self.price(asset);
                    tracing::warn!(asset, %error, ?kept, "price refresh failed");
                    outcomes.push(RefreshOutcome::Failed {
                        asset: asset.to_string(),
                        error,
                        kept,
                    });
                }
            }
        }
        outcomes
    }

    /// Freeze the current prices for one recomputation.
    pub fn snapshot(&self) -> PriceSnapshot {
        let mut snapshot = PriceSnapshot::new();
        for (asset, quote) in &self.quotes {
            snapshot.set(asset.clone(), quote.price);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::StaticPrices;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Succeeds on the first call only.
    struct Flaky {
        calls: AtomicUsize,
    }

    impl PriceSource for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        fn fetch_price(&self, _asset: &str, _vs: &str) -> Result<f64, PriceError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(50_000.0)
            } else {
                Err(PriceError::NetworkUnreachable("offline".into()))
            }
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn absent_until_first_success() {
        let mut book = PriceBook::new("eur");
        let outcomes = book.refresh(&StaticPrices::new(), ["bitcoin"]);
        assert!(!outcomes[0].is_updated());
        assert_eq!(book.price("bitcoin"), None);
        assert!(book.snapshot().is_empty());
    }

    #[test]
    fn failure_keeps_last_good_price() {
        let source = Flaky {
            calls: AtomicUsize::new(0),
        };
        let mut book = PriceBook::new("eur");
        assert!(book.refresh(&source, ["bitcoin"])[0].is_updated());

        let outcomes = book.refresh(&source, ["bitcoin"]);
        assert_eq!(
            outcomes[0],
            RefreshOutcome::Failed {
                asset: "bitcoin".into(),
                error: PriceError::NetworkUnreachable("offline".into()),
                kept: Some(50_000.0),
            }
        );
        assert_eq!(book.snapshot().get("bitcoin"), Some(50_000.0));
    }

    #[test]
    fn manual_set_feeds_snapshot() {
        let mut book = PriceBook::new("eur");
        book.set("bitcoin", 42_000.0);
        assert_eq!(book.snapshot().get("bitcoin"), Some(42_000.0));
        assert!(book.fetched_at("bitcoin").is_some());
    }
}
