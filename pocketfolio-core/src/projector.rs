//! Portfolio projector — per-pocket trajectories summed by month index.
//!
//! Every pocket compounds at its own expected return on its effective
//! balance. The blended or manual global rate is informational and never
//! enters here.

use crate::compounding::{self, ProjectionError, ProjectionRequest, MONTHS_PER_YEAR};
use crate::domain::{AggregatePoint, Portfolio, PriceSnapshot, ProjectionPoint};
use crate::labels::{month_labels, LabelStyle};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Run-wide projection parameters shared by every pocket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSettings {
    pub years: u32,
    #[serde(default)]
    pub inflation: f64,
    #[serde(default)]
    pub label_style: LabelStyle,
}

impl ProjectionSettings {
    pub fn new(years: u32) -> Self {
        Self {
            years,
            inflation: 0.0,
            label_style: LabelStyle::default(),
        }
    }

    pub fn with_inflation(mut self, inflation: f64) -> Self {
        self.inflation = inflation;
        self
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.label_style = style;
        self
    }

    pub fn months(&self) -> u32 {
        self.years.saturating_mul(MONTHS_PER_YEAR)
    }
}

/// One pocket's trajectory within a portfolio run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PocketSeries {
    pub key: String,
    pub label: String,
    pub effective_balance: f64,
    pub points: Vec<ProjectionPoint>,
}

/// Portfolio totals per month plus the per-pocket series they were summed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    points: Vec<AggregatePoint>,
    pockets: Vec<PocketSeries>,
}

impl AggregatedSeries {
    pub fn points(&self) -> &[AggregatePoint] {
        &self.points
    }

    pub fn pocket_series(&self) -> &[PocketSeries] {
        &self.pockets
    }

    /// Trajectory of one pocket by key.
    pub fn pocket(&self, key: &str) -> Option<&PocketSeries> {
        self.pockets.iter().find(|s| s.key == key)
    }

    /// Point at a 1-based month index.
    pub fn at_month(&self, month: u32) -> Option<&AggregatePoint> {
        let idx = usize::try_from(month).ok()?.checked_sub(1)?;
        self.points.get(idx)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Nominal totals only, in month order.
    pub fn nominal_curve(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.nominal).collect()
    }

    pub fn into_points(self) -> Vec<AggregatePoint> {
        self.points
    }
}

/// Project every pocket of `portfolio` and sum the trajectories month by month.
///
/// Effective balances are read from `prices` once. The output always has
/// `settings.years * 12` points; an empty portfolio yields zero totals.
pub fn project_portfolio(
    portfolio: &Portfolio,
    prices: &PriceSnapshot,
    settings: &ProjectionSettings,
    anchor: NaiveDate,
) -> Result<AggregatedSeries, ProjectionError> {
    compounding::check_years(settings.years)?;
    compounding::check_inflation(settings.inflation)?;

    let labels = month_labels(anchor, settings.months(), settings.label_style);
    let mut points: Vec<AggregatePoint> = labels
        .iter()
        .zip(1..)
        .map(|(label, month)| AggregatePoint {
            month,
            label: label.clone(),
            nominal: 0.0,
            real: 0.0,
            contribution: 0.0,
        })
        .collect();

    let mut pockets = Vec::with_capacity(portfolio.pockets.len());
    for (pocket, balance) in portfolio.effective_balances(prices) {
        let request = ProjectionRequest::new(
            balance,
            pocket.monthly_contribution,
            pocket.expected_annual_return,
            settings.years,
        )
        .with_inflation(settings.inflation)
        .with_label_style(settings.label_style);

        let series = compounding::project_with_labels(&request, labels.clone()).map_err(|e| {
            tracing::warn!(pocket = %pocket.key, error = %e, "pocket projection rejected");
            e
        })?;

        for (total, point) in points.iter_mut().zip(&series) {
            total.nominal += point.nominal;
            total.real += point.real;
            total.contribution += point.contribution;
        }

        pockets.push(PocketSeries {
            key: pocket.key.clone(),
            label: pocket.label.clone(),
            effective_balance: balance,
            points: series,
        });
    }

    tracing::debug!(
        pockets = pockets.len(),
        months = points.len(),
        "portfolio projected"
    );

    Ok(AggregatedSeries { points, pockets })
}
