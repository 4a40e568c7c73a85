//! End-to-end: scenario file on disk → dashboard → artifact bundle.

use chrono::NaiveDate;
use pocketfolio_core::domain::PriceSnapshot;
use pocketfolio_runner::config::{ConfigError, Horizon, ScenarioConfig};
use pocketfolio_runner::dashboard::build_dashboard;
use pocketfolio_runner::export::{load_artifacts, save_artifacts};
use pocketfolio_runner::fingerprint::scenario_id;

const SCENARIO: &str = r#"
horizon_years = 10
inflation = 0.02
label_style = "english"

[rate]
mode = "manual"
manual = 0.05

[price]
vs_currency = "eur"
refresh_secs = 30

[[pockets]]
key = "pea"
label = "PEA"
initial = 12000
monthly = 300
expected_return = 0.06

[[pockets]]
key = "livret"
label = "Livret"
initial = 8000
monthly = 0
expected_return = 0.03

[[pockets]]
key = "crypto"
label = "Crypto"
initial = 0
monthly = 50
expected_return = 0.10

[[holdings]]
pocket = "crypto"
asset = "bitcoin"
quantity = 0.2
"#;

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn write_scenario(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("scenario.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_scenario_file_to_artifacts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = write_scenario(temp_dir.path(), SCENARIO);
    let config = ScenarioConfig::from_file(&path).unwrap();
    assert_eq!(config.horizon_years, Horizon::Ten);

    let prices = PriceSnapshot::single("bitcoin", 40_000.0);
    let dashboard = build_dashboard(&config, &prices, anchor()).unwrap();

    assert_eq!(dashboard.series.len(), 120);
    assert_eq!(dashboard.series[0].label, "Apr 26");
    assert_eq!(dashboard.total_initial, 28_000.0);
    assert_eq!(dashboard.total_monthly, 350.0);
    assert_eq!(dashboard.global_rate, 0.05);
    // (12000 * 0.06 + 8000 * 0.03 + 8000 * 0.10) / 28000
    assert!((dashboard.blended_rate - 1_760.0 / 28_000.0).abs() < 1e-12);

    let k10 = dashboard.kpi(10).unwrap();
    assert_eq!(k10.contributions, 28_000.0 + 350.0 * 120.0);
    assert_eq!(k10.value, dashboard.series[119].nominal);
    assert_eq!(dashboard.kpi(20).unwrap().value, 0.0);

    let out = tempfile::tempdir().unwrap();
    let run_dir = save_artifacts(&dashboard, out.path()).unwrap();
    let series_csv = std::fs::read_to_string(run_dir.join("series.csv")).unwrap();
    assert_eq!(series_csv.lines().count(), 121);
    let report = std::fs::read_to_string(run_dir.join("report.md")).unwrap();
    assert!(report.contains("(manual)"));

    let reloaded = load_artifacts(&run_dir).unwrap();
    assert_eq!(reloaded, dashboard);
}

#[test]
fn test_same_scenario_same_artifact_dir() {
    let config = ScenarioConfig::from_toml(SCENARIO).unwrap();
    let out = tempfile::tempdir().unwrap();

    let a = build_dashboard(&config, &PriceSnapshot::new(), anchor()).unwrap();
    let b = build_dashboard(&config, &PriceSnapshot::single("bitcoin", 1.0), anchor()).unwrap();
    assert_eq!(a.scenario_id, scenario_id(&config));
    assert_eq!(
        save_artifacts(&a, out.path()).unwrap(),
        save_artifacts(&b, out.path()).unwrap()
    );
}

#[test]
fn test_default_scenario_written_and_reloaded() {
    let temp_dir = tempfile::tempdir().unwrap();
    let default = ScenarioConfig::default_scenario();
    let path = write_scenario(temp_dir.path(), &default.to_toml().unwrap());
    assert_eq!(ScenarioConfig::from_file(&path).unwrap(), default);
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let err = ScenarioConfig::from_file(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let err = ScenarioConfig::from_toml("[[pockets]]\nkey = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
