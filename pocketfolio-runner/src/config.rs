//! Scenario configuration — pockets, holdings, horizon and rate mode as TOML.
//!
//! A scenario file is the persisted form of every dashboard input. Loading
//! goes through [`ScenarioConfig::from_toml`] followed by
//! [`ScenarioConfig::validate`]; the engine types are derived from it with
//! [`ScenarioConfig::to_portfolio`] and [`ScenarioConfig::settings`].

use std::path::Path;

use pocketfolio_core::compounding::{check_annual_rate, check_inflation};
use pocketfolio_core::domain::{ExternalHolding, Pocket, PocketError, PocketSet, Portfolio};
use pocketfolio_core::labels::LabelStyle;
use pocketfolio_core::price::coingecko::DEFAULT_BASE_URL;
use pocketfolio_core::projector::ProjectionSettings;
use pocketfolio_core::returns::RateMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize scenario: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
    #[error("invalid pocket: {0}")]
    Pocket(#[from] PocketError),
}

/// Projection horizon offered by the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Horizon {
    Five,
    Ten,
    #[default]
    Twenty,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::Five, Horizon::Ten, Horizon::Twenty];

    pub fn years(self) -> u32 {
        match self {
            Horizon::Five => 5,
            Horizon::Ten => 10,
            Horizon::Twenty => 20,
        }
    }
}

impl TryFrom<u32> for Horizon {
    type Error = ConfigError;

    fn try_from(years: u32) -> Result<Self, Self::Error> {
        match years {
            5 => Ok(Horizon::Five),
            10 => Ok(Horizon::Ten),
            20 => Ok(Horizon::Twenty),
            other => Err(ConfigError::Invalid(format!(
                "horizon must be 5, 10 or 20 years, got {other}"
            ))),
        }
    }
}

impl From<Horizon> for u32 {
    fn from(h: Horizon) -> u32 {
        h.years()
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ans", self.years())
    }
}

/// Which global rate the dashboard reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateModeName {
    #[default]
    Auto,
    Manual,
}

/// `[rate]` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    #[serde(default)]
    pub mode: RateModeName,
    /// Used only in manual mode; kept so toggling back restores it.
    #[serde(default = "default_manual_rate")]
    pub manual: f64,
}

fn default_manual_rate() -> f64 {
    0.06
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            mode: RateModeName::Auto,
            manual: default_manual_rate(),
        }
    }
}

/// `[price]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceConfig {
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_vs_currency() -> String {
    "eur".into()
}

fn default_refresh_secs() -> u64 {
    20
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            vs_currency: default_vs_currency(),
            refresh_secs: default_refresh_secs(),
            base_url: default_base_url(),
        }
    }
}

/// One `[[pockets]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PocketConfig {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub initial: f64,
    #[serde(default)]
    pub monthly: f64,
    pub expected_return: f64,
}

impl PocketConfig {
    pub fn new(key: &str, label: &str, expected_return: f64) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            initial: 0.0,
            monthly: 0.0,
            expected_return,
        }
    }

    fn to_pocket(&self) -> Pocket {
        Pocket::new(
            self.key.clone(),
            self.label.clone(),
            self.initial,
            self.monthly,
            self.expected_return,
        )
    }
}

/// Complete scenario: everything the dashboard needs except prices and the date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub horizon_years: Horizon,
    #[serde(default)]
    pub inflation: f64,
    #[serde(default)]
    pub label_style: LabelStyle,
    #[serde(default)]
    pub rate: RateConfig,
    #[serde(default)]
    pub price: PriceConfig,
    #[serde(default)]
    pub pockets: Vec<PocketConfig>,
    #[serde(default)]
    pub holdings: Vec<ExternalHolding>,
}

impl ScenarioConfig {
    /// Load and validate a scenario file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), pockets = config.pockets.len(), "scenario loaded");
        Ok(config)
    }

    /// Parse and validate a scenario from TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The six-pocket starter scenario with a bitcoin holding on `crypto`.
    pub fn default_scenario() -> Self {
        Self {
            horizon_years: Horizon::Twenty,
            inflation: 0.0,
            label_style: LabelStyle::French,
            rate: RateConfig::default(),
            price: PriceConfig::default(),
            pockets: vec![
                PocketConfig::new("assurance", "Assurance-vie", 0.035),
                PocketConfig::new("metaux", "Métaux précieux", 0.02),
                PocketConfig::new("pea", "PEA", 0.06),
                PocketConfig::new("livret", "Livret", 0.03),
                PocketConfig::new("cto", "CTO", 0.05),
                PocketConfig::new("crypto", "Crypto", 0.10),
            ],
            holdings: vec![ExternalHolding::new("crypto", "bitcoin", 0.0)],
        }
    }

    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon_years = horizon;
        self
    }

    /// Switch to manual mode at `rate`.
    pub fn with_manual_rate(mut self, rate: f64) -> Self {
        self.rate = RateConfig {
            mode: RateModeName::Manual,
            manual: rate,
        };
        self
    }

    /// Check every rule the TOML types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_inflation(self.inflation)
            .map_err(|e| ConfigError::Invalid(format!("inflation: {e}")))?;
        check_annual_rate(self.rate.manual)
            .map_err(|e| ConfigError::Invalid(format!("manual rate: {e}")))?;

        if self.price.refresh_secs < 1 {
            return Err(ConfigError::Invalid(
                "price.refresh_secs must be at least 1".into(),
            ));
        }
        if self.price.vs_currency.trim().is_empty() {
            return Err(ConfigError::Invalid("price.vs_currency is empty".into()));
        }

        let pockets = self.pocket_set()?;
        for pocket in &pockets {
            check_annual_rate(pocket.expected_annual_return).map_err(|e| {
                ConfigError::Invalid(format!("pocket '{}' expected_return: {e}", pocket.key))
            })?;
        }

        for holding in &self.holdings {
            if holding.asset.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "holding on pocket '{}' has an empty asset id",
                    holding.pocket
                )));
            }
            if !holding.quantity.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "holding '{}' quantity is not finite",
                    holding.asset
                )));
            }
        }

        let mut portfolio = Portfolio::new(pockets);
        portfolio.holdings = self.holdings.clone();
        if let Some(orphan) = portfolio.orphan_holdings().next() {
            return Err(ConfigError::Invalid(format!(
                "holding '{}' targets unknown pocket '{}'",
                orphan.asset, orphan.pocket
            )));
        }

        Ok(())
    }

    fn pocket_set(&self) -> Result<PocketSet, ConfigError> {
        let pockets: Vec<Pocket> = self.pockets.iter().map(PocketConfig::to_pocket).collect();
        Ok(PocketSet::try_from(pockets)?)
    }

    /// Engine read model: pockets in declaration order plus holdings.
    pub fn to_portfolio(&self) -> Result<Portfolio, ConfigError> {
        let mut portfolio = Portfolio::new(self.pocket_set()?);
        portfolio.holdings = self.holdings.clone();
        Ok(portfolio)
    }

    pub fn settings(&self) -> ProjectionSettings {
        ProjectionSettings::new(self.horizon_years.years())
            .with_inflation(self.inflation)
            .with_label_style(self.label_style)
    }

    pub fn rate_mode(&self) -> RateMode {
        match self.rate.mode {
            RateModeName::Auto => RateMode::Auto,
            RateModeName::Manual => RateMode::Manual(self.rate.manual),
        }
    }

    /// Distinct asset ids across all holdings, in first-seen order.
    pub fn assets(&self) -> Vec<&str> {
        let mut assets: Vec<&str> = Vec::new();
        for holding in &self.holdings {
            if !assets.contains(&holding.asset.as_str()) {
                assets.push(&holding.asset);
            }
        }
        assets
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::default_scenario()
    }
}
