//! KPI extractor — value, contributions and interest at year horizons.
//!
//! Interest is always derived as `value - contributions`; it is never
//! computed on its own, so the three numbers stay consistent.

use crate::compounding::MONTHS_PER_YEAR;
use crate::domain::AggregatePoint;
use serde::{Deserialize, Serialize};

/// Horizons reported on the dashboard, in years.
pub const KPI_HORIZONS: [u32; 3] = [5, 10, 20];

/// Portfolio value at the end of year `years`.
///
/// Reads the point at month `years * 12`. Returns 0 for `years == 0`, an
/// empty series, or a horizon past the end of the series.
pub fn value_at_years(series: &[AggregatePoint], years: u32) -> f64 {
    let month = years as usize * MONTHS_PER_YEAR as usize;
    month
        .checked_sub(1)
        .and_then(|idx| series.get(idx))
        .map(|p| p.nominal)
        .unwrap_or(0.0)
}

/// Cumulative contributions after `years`: `total_initial + total_monthly * years * 12`.
pub fn contributions_at_years(total_initial: f64, total_monthly: f64, years: u32) -> f64 {
    total_initial + total_monthly * (years as f64 * MONTHS_PER_YEAR as f64)
}

/// Growth on top of contributions after `years`.
pub fn interest_at_years(
    series: &[AggregatePoint],
    total_initial: f64,
    total_monthly: f64,
    years: u32,
) -> f64 {
    value_at_years(series, years) - contributions_at_years(total_initial, total_monthly, years)
}

/// Value / contributions / interest triple at one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub years: u32,
    pub value: f64,
    pub contributions: f64,
    pub interest: f64,
}

/// Build the KPI triple for one horizon.
pub fn kpi_at_years(
    series: &[AggregatePoint],
    total_initial: f64,
    total_monthly: f64,
    years: u32,
) -> Kpi {
    let value = value_at_years(series, years);
    let contributions = contributions_at_years(total_initial, total_monthly, years);
    Kpi {
        years,
        value,
        contributions,
        interest: value - contributions,
    }
}

/// KPI triples for every horizon in [`KPI_HORIZONS`].
pub fn dashboard_kpis(series: &[AggregatePoint], total_initial: f64, total_monthly: f64) -> Vec<Kpi> {
    KPI_HORIZONS
        .iter()
        .map(|&y| kpi_at_years(series, total_initial, total_monthly, y))
        .collect()
}
