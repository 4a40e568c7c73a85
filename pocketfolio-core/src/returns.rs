//! Return aggregator — value-weighted blended annual return.

use serde::{Deserialize, Serialize};

/// One leg of the blend: a balance and the return expected on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnLeg {
    pub value: f64,
    pub rate: f64,
}

impl ReturnLeg {
    pub fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    /// Weight carried by this leg: the value when finite and positive, else zero.
    fn weight(&self) -> f64 {
        if self.value.is_finite() && self.value > 0.0 && self.rate.is_finite() {
            self.value
        } else {
            0.0
        }
    }
}

/// Value-weighted average of the legs' rates.
///
/// Legs with a zero, negative or non-finite value (or a non-finite rate)
/// carry no weight. Returns 0 when the total weight is not positive.
pub fn weighted_return(legs: &[ReturnLeg]) -> f64 {
    let total: f64 = legs.iter().map(ReturnLeg::weight).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = legs
        .iter()
        .filter(|l| l.weight() > 0.0)
        .map(|l| l.value * l.rate)
        .sum();
    weighted / total
}

/// Source of the informational global rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "rate", rename_all = "snake_case")]
pub enum RateMode {
    /// Blend the pockets' own rates by balance.
    #[default]
    Auto,
    /// A user-supplied constant.
    Manual(f64),
}

impl RateMode {
    pub fn is_auto(&self) -> bool {
        matches!(self, RateMode::Auto)
    }
}

/// The global rate shown next to the projection.
///
/// It never feeds the per-pocket trajectories; each pocket compounds at its
/// own rate.
pub fn global_rate(mode: RateMode, legs: &[ReturnLeg]) -> f64 {
    match mode {
        RateMode::Auto => weighted_return(legs),
        RateMode::Manual(rate) => rate,
    }
}
