//! Externally priced holdings and the price snapshot used to value them.

use crate::numeric::{finite_or_zero, known_or_zero};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A quantity of an externally priced asset folded into one pocket.
///
/// The holding never mutates the pocket; its value is added to the pocket's
/// effective balance at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalHolding {
    /// Key of the pocket that receives the valuation.
    pub pocket: String,
    /// Provider asset id (e.g. `"bitcoin"`).
    pub asset: String,
    pub quantity: f64,
}

impl ExternalHolding {
    pub fn new(pocket: impl Into<String>, asset: impl Into<String>, quantity: f64) -> Self {
        Self {
            pocket: pocket.into(),
            asset: asset.into(),
            quantity,
        }
    }

    /// `quantity × price`; an unknown or non-finite price values the holding at zero.
    pub fn value(&self, prices: &PriceSnapshot) -> f64 {
        let price = known_or_zero(prices.get(&self.asset));
        finite_or_zero(finite_or_zero(self.quantity) * price)
    }
}

/// Latest known unit prices by asset id, frozen for one recomputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    prices: BTreeMap<String, f64>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with a single known price.
    pub fn single(asset: impl Into<String>, price: f64) -> Self {
        let mut snapshot = Self::new();
        snapshot.set(asset, price);
        snapshot
    }

    pub fn set(&mut self, asset: impl Into<String>, price: f64) {
        self.prices.insert(asset.into(), price);
    }

    /// Price for an asset, or `None` if it has never been observed.
    pub fn get(&self, asset: &str) -> Option<f64> {
        self.prices.get(asset).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.prices.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_quantity_times_price() {
        let holding = ExternalHolding::new("crypto", "bitcoin", 0.5);
        let prices = PriceSnapshot::single("bitcoin", 60_000.0);
        assert_eq!(holding.value(&prices), 30_000.0);
    }

    #[test]
    fn unknown_price_values_at_zero() {
        let holding = ExternalHolding::new("crypto", "bitcoin", 2.0);
        assert_eq!(holding.value(&PriceSnapshot::new()), 0.0);
    }

    #[test]
    fn non_finite_price_values_at_zero() {
        let holding = ExternalHolding::new("crypto", "bitcoin", 2.0);
        let prices = PriceSnapshot::single("bitcoin", f64::NAN);
        assert_eq!(holding.value(&prices), 0.0);
    }

    #[test]
    fn non_finite_quantity_values_at_zero() {
        let holding = ExternalHolding::new("crypto", "bitcoin", f64::INFINITY);
        let prices = PriceSnapshot::single("bitcoin", 50_000.0);
        assert_eq!(holding.value(&prices), 0.0);
    }
}
