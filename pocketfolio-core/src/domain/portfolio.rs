//! Portfolio — the pockets plus the external holdings folded into them.

use super::holding::{ExternalHolding, PriceSnapshot};
use super::pocket::{Pocket, PocketSet};
use serde::{Deserialize, Serialize};

/// Read model handed to the engine.
///
/// Effective balances are a pure function of the stored pocket fields and a
/// price snapshot: `initial_balance + Σ value(holdings targeting the pocket)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub pockets: PocketSet,
    #[serde(default)]
    pub holdings: Vec<ExternalHolding>,
}

impl Portfolio {
    pub fn new(pockets: PocketSet) -> Self {
        Self {
            pockets,
            holdings: Vec::new(),
        }
    }

    pub fn with_holding(mut self, holding: ExternalHolding) -> Self {
        self.holdings.push(holding);
        self
    }

    /// Total value of the holdings that target `key`.
    pub fn holding_value(&self, key: &str, prices: &PriceSnapshot) -> f64 {
        self.holdings
            .iter()
            .filter(|h| h.pocket == key)
            .map(|h| h.value(prices))
            .sum()
    }

    /// Stored initial balance plus the valuation of every holding folded into it.
    pub fn effective_balance(&self, pocket: &Pocket, prices: &PriceSnapshot) -> f64 {
        pocket.initial_balance + self.holding_value(&pocket.key, prices)
    }

    /// `(pocket, effective balance)` in declaration order.
    pub fn effective_balances<'a>(
        &'a self,
        prices: &'a PriceSnapshot,
    ) -> impl Iterator<Item = (&'a Pocket, f64)> + 'a {
        self.pockets
            .iter()
            .map(move |p| (p, self.effective_balance(p, prices)))
    }

    /// Sum of effective balances (the portfolio's initial balance).
    pub fn total_initial(&self, prices: &PriceSnapshot) -> f64 {
        self.effective_balances(prices).map(|(_, v)| v).sum()
    }

    /// Sum of monthly contributions.
    pub fn total_monthly(&self) -> f64 {
        self.pockets.total_monthly()
    }

    /// Holdings whose target pocket does not exist.
    pub fn orphan_holdings(&self) -> impl Iterator<Item = &ExternalHolding> {
        self.holdings
            .iter()
            .filter(|h| !self.pockets.contains(&h.pocket))
    }
}
