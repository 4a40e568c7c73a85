//! Numeric hygiene for values that cross into the engine.
//!
//! Prices and quantities come from the outside world and may be NaN or
//! infinite. They are normalised here so the engine never sees them.

/// Replace NaN and ±∞ with 0.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Normalise an optional external number: absent or non-finite becomes 0.
#[inline]
pub fn known_or_zero(value: Option<f64>) -> f64 {
    value.map(finite_or_zero).unwrap_or(0.0)
}
