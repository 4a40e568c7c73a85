//! Projection points — one month of a pocket or portfolio trajectory.

use serde::{Deserialize, Serialize};

/// One month of a single pocket's projection.
///
/// `month` is 1-based. `contribution` is the cumulative nominal amount paid
/// in so far, initial balance included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub label: String,
    pub nominal: f64,
    pub real: f64,
    pub contribution: f64,
}

/// One month of the aggregated portfolio: per-pocket values summed by month index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatePoint {
    pub month: u32,
    pub label: String,
    pub nominal: f64,
    pub real: f64,
    pub contribution: f64,
}

impl AggregatePoint {
    /// Nominal growth earned on top of what was paid in.
    pub fn interest(&self) -> f64 {
        self.nominal - self.contribution
    }
}
