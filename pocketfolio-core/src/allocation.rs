//! Allocation summarizer — current balance breakdown per pocket.

use crate::domain::{Portfolio, PriceSnapshot};
use serde::{Deserialize, Serialize};

/// Fixed chart palette; entries are assigned by output position.
pub const PALETTE: [&str; 8] = [
    "#2563eb", // blue
    "#16a34a", // green
    "#f59e0b", // amber
    "#db2777", // pink
    "#7c3aed", // violet
    "#0891b2", // cyan
    "#dc2626", // red
    "#64748b", // slate
];

/// One slice of the allocation chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub key: String,
    pub label: String,
    /// Effective balance, always strictly positive.
    pub value: f64,
    /// Fraction of the summed entry values.
    pub share: f64,
    pub color: String,
}

/// Breakdown of effective balances.
///
/// Only pockets with a strictly positive effective balance appear, in
/// declaration order. Colors cycle through [`PALETTE`] by entry index.
pub fn allocate(portfolio: &Portfolio, prices: &PriceSnapshot) -> Vec<AllocationEntry> {
    let positive: Vec<(&str, &str, f64)> = portfolio
        .effective_balances(prices)
        .filter(|(_, value)| *value > 0.0)
        .map(|(p, value)| (p.key.as_str(), p.label.as_str(), value))
        .collect();

    let total: f64 = positive.iter().map(|(_, _, v)| v).sum();

    positive
        .into_iter()
        .enumerate()
        .map(|(i, (key, label, value))| AllocationEntry {
            key: key.to_string(),
            label: label.to_string(),
            value,
            share: value / total,
            color: PALETTE[i % PALETTE.len()].to_string(),
        })
        .collect()
}

/// Sum of allocation values.
pub fn allocated_total(entries: &[AllocationEntry]) -> f64 {
    entries.iter().map(|e| e.value).sum()
}
