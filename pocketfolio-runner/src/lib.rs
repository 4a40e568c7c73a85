//! Pocketfolio Runner — scenario files, dashboard assembly, fingerprints, export.
//!
//! This crate builds on `pocketfolio-core` to provide:
//! - TOML scenario configuration with validation and a six-pocket default
//! - Dashboard assembly from a scenario, a price snapshot and an anchor date
//! - Scenario fingerprinting (BLAKE3)
//! - JSON / CSV / Markdown export and artifact bundles
//! - French amount and percentage formatting

pub mod config;
pub mod dashboard;
pub mod export;
pub mod fingerprint;
pub mod format;

pub use config::{ConfigError, Horizon, PocketConfig, PriceConfig, RateConfig, ScenarioConfig};
pub use dashboard::{
    build_dashboard, Dashboard, HoldingValue, PocketSummary, RunError, SCHEMA_VERSION,
};
pub use export::{
    export_allocation_csv, export_json, export_series_csv, generate_report, import_json,
    load_artifacts, save_artifacts,
};
pub use fingerprint::scenario_id;
pub use format::{currency_symbol, fmt_amount, fmt_pct};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn scenario_config_is_send_sync() {
        assert_send::<ScenarioConfig>();
        assert_sync::<ScenarioConfig>();
    }

    #[test]
    fn dashboard_is_send_sync() {
        assert_send::<Dashboard>();
        assert_sync::<Dashboard>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<ConfigError>();
        assert_sync::<ConfigError>();
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
