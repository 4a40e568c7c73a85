//! Dashboard assembly — wires config, prices and the engine together.
//!
//! [`build_dashboard`] is the one entry point used by the CLI. It is a pure
//! function of the scenario, a frozen price snapshot and the anchor date, so
//! two builds with the same inputs produce identical dashboards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pocketfolio_core::allocation::{allocate, AllocationEntry};
use pocketfolio_core::compounding::ProjectionError;
use pocketfolio_core::domain::{AggregatePoint, PriceSnapshot};
use pocketfolio_core::kpi::{dashboard_kpis, Kpi};
use pocketfolio_core::projector::project_portfolio;
use pocketfolio_core::returns::{global_rate, weighted_return, RateMode, ReturnLeg};

use crate::config::{ConfigError, ScenarioConfig};
use crate::fingerprint::scenario_id;

/// Errors from building a dashboard.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),
}

/// Current schema version for persisted dashboards.
pub const SCHEMA_VERSION: u32 = 1;

/// One external holding as valued for this build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValue {
    pub pocket: String,
    pub asset: String,
    pub quantity: f64,
    /// `None` when no usable price was known; the holding then counts as zero.
    pub price: Option<f64>,
    pub value: f64,
}

/// Per-pocket inputs and the effective balance the engine used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PocketSummary {
    pub key: String,
    pub label: String,
    pub initial_balance: f64,
    pub holding_value: f64,
    pub effective_balance: f64,
    pub monthly_contribution: f64,
    pub expected_return: f64,
}

/// Everything the dashboard displays, ready to render or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub scenario_id: String,
    pub anchor: NaiveDate,
    pub horizon_years: u32,
    pub inflation: f64,
    pub vs_currency: String,
    pub holdings: Vec<HoldingValue>,
    pub pockets: Vec<PocketSummary>,
    pub total_initial: f64,
    pub total_monthly: f64,
    /// Value-weighted expected return of the effective balances.
    pub blended_rate: f64,
    pub rate_mode: RateMode,
    /// Rate shown to the user: blended in auto mode, the manual rate otherwise.
    pub global_rate: f64,
    pub series: Vec<AggregatePoint>,
    pub allocation: Vec<AllocationEntry>,
    pub kpis: Vec<Kpi>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Dashboard {
    /// KPI triple for a reported horizon (5, 10 or 20 years).
    pub fn kpi(&self, years: u32) -> Option<&Kpi> {
        self.kpis.iter().find(|k| k.years == years)
    }

    /// Last projected month, if the horizon is non-empty.
    pub fn final_point(&self) -> Option<&AggregatePoint> {
        self.series.last()
    }

    /// Total value of all external holdings.
    pub fn holdings_total(&self) -> f64 {
        self.holdings.iter().map(|h| h.value).sum()
    }
}

/// Build the dashboard for `config` at `anchor` with frozen `prices`.
pub fn build_dashboard(
    config: &ScenarioConfig,
    prices: &PriceSnapshot,
    anchor: NaiveDate,
) -> Result<Dashboard, RunError> {
    config.validate()?;
    let portfolio = config.to_portfolio()?;
    let settings = config.settings();

    let holdings: Vec<HoldingValue> = portfolio
        .holdings
        .iter()
        .map(|h| {
            let price = prices.get(&h.asset).filter(|p| p.is_finite());
            if price.is_none() {
                tracing::debug!(asset = %h.asset, "no price known; holding valued at zero");
            }
            HoldingValue {
                pocket: h.pocket.clone(),
                asset: h.asset.clone(),
                quantity: h.quantity,
                price,
                value: h.value(prices),
            }
        })
        .collect();

    let pockets: Vec<PocketSummary> = portfolio
        .effective_balances(prices)
        .map(|(p, effective)| PocketSummary {
            key: p.key.clone(),
            label: p.label.clone(),
            initial_balance: p.initial_balance,
            holding_value: portfolio.holding_value(&p.key, prices),
            effective_balance: effective,
            monthly_contribution: p.monthly_contribution,
            expected_return: p.expected_annual_return,
        })
        .collect();

    let legs: Vec<ReturnLeg> = pockets
        .iter()
        .map(|p| ReturnLeg::new(p.effective_balance, p.expected_return))
        .collect();
    let rate_mode = config.rate_mode();

    let total_initial = portfolio.total_initial(prices);
    let total_monthly = portfolio.total_monthly();

    let series = project_portfolio(&portfolio, prices, &settings, anchor)?.into_points();
    let kpis = dashboard_kpis(&series, total_initial, total_monthly);
    let allocation = allocate(&portfolio, prices);

    let dashboard = Dashboard {
        schema_version: SCHEMA_VERSION,
        scenario_id: scenario_id(config),
        anchor,
        horizon_years: settings.years,
        inflation: settings.inflation,
        vs_currency: config.price.vs_currency.clone(),
        holdings,
        pockets,
        total_initial,
        total_monthly,
        blended_rate: weighted_return(&legs),
        rate_mode,
        global_rate: global_rate(rate_mode, &legs),
        series,
        allocation,
        kpis,
    };

    tracing::debug!(
        scenario = %dashboard.scenario_id,
        months = dashboard.series.len(),
        total_initial,
        global_rate = dashboard.global_rate,
        "dashboard built"
    );
    Ok(dashboard)
}
