//! Pocketfolio CLI — scenario setup, projection, price lookup and live refresh.
//!
//! Commands:
//! - `init` — write the default six-pocket scenario to a TOML file
//! - `project` — build the dashboard once, print it, optionally save artifacts
//! - `price` — fetch one asset price from CoinGecko
//! - `watch` — refresh prices periodically and reprint the dashboard

mod logger;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pocketfolio_core::domain::PriceSnapshot;
use pocketfolio_core::price::{
    CircuitBreaker, CoinGeckoProvider, PriceBook, PriceSource, RefreshOutcome, StaticPrices,
};
use pocketfolio_core::returns::RateMode;
use pocketfolio_runner::format::{currency_symbol, fmt_amount, fmt_pct};
use pocketfolio_runner::{build_dashboard, save_artifacts, Dashboard, Horizon, ScenarioConfig};

/// Scenario file looked up when `--config` is not given.
const DEFAULT_SCENARIO: &str = "scenario.toml";

#[derive(Parser)]
#[command(
    name = "pocketfolio",
    about = "Pocketfolio — multi-pocket savings projection"
)]
struct Cli {
    /// Debug logging on stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default scenario (six pockets, bitcoin holding) to a TOML file.
    Init {
        #[arg(long, default_value = DEFAULT_SCENARIO)]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Build the dashboard once and print it.
    Project {
        /// Scenario file. Defaults to ./scenario.toml, else the built-in scenario.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Offline mode: no price requests; holdings use --price overrides only.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Price override, e.g. `--price bitcoin=61000`. Repeatable.
        #[arg(long = "price", value_name = "ASSET=PRICE")]
        prices: Vec<String>,

        /// Horizon in years: 5, 10 or 20.
        #[arg(long)]
        horizon: Option<u32>,

        /// Report this global rate instead of the blended one.
        #[arg(long)]
        manual_rate: Option<f64>,

        /// Save dashboard.json, series.csv, allocation.csv and report.md here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Fetch and print one asset price.
    Price {
        #[arg(long, default_value = "bitcoin")]
        asset: String,

        #[arg(long, default_value = "eur")]
        vs: String,
    },
    /// Refresh prices on an interval and reprint the dashboard.
    Watch {
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seconds between refreshes. Defaults to the scenario's price.refresh_secs.
        #[arg(long)]
        interval: Option<u64>,

        /// Stop after this many refreshes (runs until interrupted otherwise).
        #[arg(long)]
        iterations: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    match cli.command {
        Commands::Init { path, force } => run_init(&path, force),
        Commands::Project {
            config,
            offline,
            prices,
            horizon,
            manual_rate,
            output_dir,
        } => run_project(config, offline, prices, horizon, manual_rate, output_dir),
        Commands::Price { asset, vs } => run_price(&asset, &vs),
        Commands::Watch {
            config,
            interval,
            iterations,
        } => run_watch(config, interval, iterations),
    }
}

fn run_init(path: &Path, force: bool) -> Result<()> {
    write_default_scenario(path, force)?;
    println!("Scenario written to: {}", path.display());
    Ok(())
}

fn write_default_scenario(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let toml_str = ScenarioConfig::default_scenario().to_toml()?;
    std::fs::write(path, toml_str)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<ScenarioConfig> {
    match path {
        Some(path) => ScenarioConfig::from_file(&path)
            .with_context(|| format!("failed to load {}", path.display())),
        None if Path::new(DEFAULT_SCENARIO).exists() => {
            Ok(ScenarioConfig::from_file(Path::new(DEFAULT_SCENARIO))?)
        }
        None => {
            tracing::info!("no scenario file; using the built-in scenario");
            Ok(ScenarioConfig::default_scenario())
        }
    }
}

fn provider_for(config: &ScenarioConfig) -> Result<CoinGeckoProvider> {
    Ok(CoinGeckoProvider::new(
        config.price.base_url.clone(),
        Arc::new(CircuitBreaker::for_polling()),
    )?)
}

/// Parse `ASSET=PRICE`; the price must be a positive finite number.
fn parse_price_override(raw: &str) -> Result<(String, f64)> {
    let Some((asset, price)) = raw.split_once('=') else {
        bail!("invalid price override '{raw}' (expected ASSET=PRICE)");
    };
    let asset = asset.trim();
    if asset.is_empty() {
        bail!("invalid price override '{raw}': empty asset");
    }
    let price: f64 = price
        .trim()
        .parse()
        .with_context(|| format!("invalid price in '{raw}'"))?;
    if !price.is_finite() || price <= 0.0 {
        bail!("invalid price override '{raw}': price must be positive");
    }
    Ok((asset.to_string(), price))
}

fn override_source(overrides: &[(String, f64)]) -> StaticPrices {
    overrides
        .iter()
        .fold(StaticPrices::new(), |src, (asset, price)| {
            src.with_price(asset.clone(), *price)
        })
}

/// Prices for one build: overrides win, other assets are fetched unless offline.
fn collect_prices(
    config: &ScenarioConfig,
    overrides: &StaticPrices,
    offline: bool,
) -> Result<PriceBook> {
    let mut book = PriceBook::new(config.price.vs_currency.clone());
    let (pinned, pending): (Vec<&str>, Vec<&str>) = config
        .assets()
        .into_iter()
        .partition(|asset| overrides.contains(asset));

    if !pending.is_empty() {
        if offline {
            tracing::info!(?pending, "offline: assets without --price are valued at 0");
        } else {
            let provider = provider_for(config)?;
            let outcomes = book.refresh(&provider, pending);
            report_refresh(&outcomes, &book);
        }
    }
    book.refresh(overrides, pinned);
    Ok(book)
}

fn describe_outcome(outcome: &RefreshOutcome, book: &PriceBook) -> String {
    let symbol = currency_symbol(book.vs_currency());
    match outcome {
        RefreshOutcome::Updated { asset, price } => {
            format!("{asset}: {}", fmt_amount(*price, &symbol))
        }
        RefreshOutcome::Failed {
            asset,
            error,
            kept: Some(price),
        } => {
            let since = book
                .fetched_at(asset)
                .map(|at| format!(" from {}", at.format("%H:%M:%S UTC")))
                .unwrap_or_default();
            format!(
                "WARNING: {asset} price refresh failed ({error}); keeping {}{since}",
                fmt_amount(*price, &symbol)
            )
        }
        RefreshOutcome::Failed {
            asset,
            error,
            kept: None,
        } => format!("WARNING: {asset} price unavailable ({error}); valued at 0"),
    }
}

fn report_refresh(outcomes: &[RefreshOutcome], book: &PriceBook) {
    for outcome in outcomes {
        let line = describe_outcome(outcome, book);
        if outcome.is_updated() {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }
}

fn run_project(
    config_path: Option<PathBuf>,
    offline: bool,
    overrides: Vec<String>,
    horizon: Option<u32>,
    manual_rate: Option<f64>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(years) = horizon {
        config = config.with_horizon(Horizon::try_from(years)?);
    }
    if let Some(rate) = manual_rate {
        config = config.with_manual_rate(rate);
    }

    let overrides = overrides
        .iter()
        .map(|raw| parse_price_override(raw))
        .collect::<Result<Vec<_>>>()?;

    let book = collect_prices(&config, &override_source(&overrides), offline)?;

    let anchor = chrono::Local::now().date_naive();
    let dashboard = build_dashboard(&config, &book.snapshot(), anchor)?;
    print_dashboard(&dashboard);

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&dashboard, &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn run_price(asset: &str, vs: &str) -> Result<()> {
    let provider = CoinGeckoProvider::public()?;
    let price = provider.fetch_price(asset, vs)?;
    println!("{asset}: {}", fmt_amount(price, &currency_symbol(vs)));
    Ok(())
}

fn run_watch(
    config_path: Option<PathBuf>,
    interval: Option<u64>,
    iterations: Option<u64>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let interval = Duration::from_secs(interval.unwrap_or(config.price.refresh_secs).max(1));
    let provider = provider_for(&config)?;
    let mut book = PriceBook::new(config.price.vs_currency.clone());

    let mut tick = 0u64;
    loop {
        tick += 1;
        if provider.is_available() {
            let outcomes = book.refresh(&provider, config.assets());
            report_refresh(&outcomes, &book);
        } else {
            tracing::warn!("price provider paused by circuit breaker; using last known prices");
        }

        let snapshot: PriceSnapshot = book.snapshot();
        let anchor = chrono::Local::now().date_naive();
        let dashboard = build_dashboard(&config, &snapshot, anchor)?;
        print_dashboard(&dashboard);

        if iterations.is_some_and(|n| tick >= n) {
            break;
        }
        std::thread::sleep(interval);
    }

    Ok(())
}

fn print_dashboard(d: &Dashboard) {
    let symbol = currency_symbol(&d.vs_currency);
    let money = |v: f64| fmt_amount(v, &symbol);

    println!();
    println!("=== Pocketfolio ({}) ===", d.anchor);
    println!("Horizon:        {} years", d.horizon_years);
    println!("Initial total:  {}", money(d.total_initial));
    println!("Monthly total:  {}", money(d.total_monthly));
    let mode = match d.rate_mode {
        RateMode::Auto => "weighted by allocation",
        RateMode::Manual(_) => "manual",
    };
    println!("Global rate:    {} ({mode})", fmt_pct(d.global_rate));
    for h in &d.holdings {
        let price = h.price.map(money).unwrap_or_else(|| "–".into());
        println!(
            "Holding:        {} {} in {} @ {} = {}",
            h.quantity,
            h.asset,
            h.pocket,
            price,
            money(h.value)
        );
    }

    println!();
    println!("--- Pockets ---");
    for p in &d.pockets {
        println!(
            "{:<18} {:>14}  +{:>10}/month  {:>7}",
            p.label,
            money(p.effective_balance),
            money(p.monthly_contribution),
            fmt_pct(p.expected_return)
        );
    }

    println!();
    println!("--- Projection (yearly) ---");
    for point in d.series.iter().filter(|p| p.month % 12 == 0) {
        println!(
            "{:<8} nominal {:>14}  real {:>14}  paid in {:>14}",
            point.label,
            money(point.nominal),
            money(point.real),
            money(point.contribution)
        );
    }

    println!();
    println!("--- In N years ---");
    for k in &d.kpis {
        println!(
            "{:>2} years: {:>14}  contributions {:>14}  interest {:>14}",
            k.years,
            money(k.value),
            money(k.contributions),
            money(k.interest)
        );
    }

    println!();
    println!("--- Allocation ---");
    if d.allocation.is_empty() {
        println!("(no positive balance)");
    }
    for e in &d.allocation {
        println!(
            "{:<18} {:>14}  {:>3.0}%  {}",
            e.label,
            money(e.value),
            e.share * 100.0,
            e.color
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_price_override() {
        assert_eq!(
            parse_price_override("bitcoin=61000.5").unwrap(),
            ("bitcoin".to_string(), 61_000.5)
        );
        assert_eq!(
            parse_price_override(" ethereum = 2500 ").unwrap(),
            ("ethereum".to_string(), 2_500.0)
        );
    }

    #[test]
    fn rejects_bad_price_override() {
        assert!(parse_price_override("bitcoin").is_err());
        assert!(parse_price_override("=100").is_err());
        assert!(parse_price_override("bitcoin=abc").is_err());
        assert!(parse_price_override("bitcoin=0").is_err());
        assert!(parse_price_override("bitcoin=-5").is_err());
        assert!(parse_price_override("bitcoin=inf").is_err());
    }

    fn overrides(pairs: &[(&str, f64)]) -> StaticPrices {
        let owned: Vec<(String, f64)> = pairs.iter().map(|(a, p)| (a.to_string(), *p)).collect();
        override_source(&owned)
    }

    #[test]
    fn offline_build_uses_overrides_only() {
        let config = ScenarioConfig::default_scenario();
        let source = overrides(&[("bitcoin", 50_000.0), ("ethereum", 2_000.0)]);
        let book = collect_prices(&config, &source, true).unwrap();
        assert_eq!(book.vs_currency(), "eur");
        assert_eq!(book.price("bitcoin"), Some(50_000.0));
        // Not held by the scenario.
        assert_eq!(book.price("ethereum"), None);
        assert!(book.fetched_at("bitcoin").is_some());
    }

    #[test]
    fn offline_build_without_override_leaves_asset_unpriced() {
        let config = ScenarioConfig::default_scenario();
        let book = collect_prices(&config, &StaticPrices::new(), true).unwrap();
        assert!(book.snapshot().is_empty());
    }

    #[test]
    fn failed_refresh_line_names_kept_price_and_time() {
        let mut book = PriceBook::new("eur");
        book.refresh(&overrides(&[("bitcoin", 50_000.0)]), ["bitcoin"]);
        let outcomes = book.refresh(&StaticPrices::new(), ["bitcoin"]);
        let line = describe_outcome(&outcomes[0], &book);
        assert!(line.contains("keeping 50 000 €"), "{line}");
        assert!(line.contains(" from ") && line.ends_with(" UTC"), "{line}");
    }

    #[test]
    fn refresh_lines_use_the_book_currency() {
        let book = PriceBook::new("usd");
        let updated = RefreshOutcome::Updated {
            asset: "bitcoin".into(),
            price: 1_500.0,
        };
        assert_eq!(describe_outcome(&updated, &book), "bitcoin: 1 500 $");
    }

    #[test]
    fn init_writes_loadable_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        write_default_scenario(&path, false).unwrap();
        let loaded = ScenarioConfig::from_file(&path).unwrap();
        assert_eq!(loaded, ScenarioConfig::default_scenario());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        let err = write_default_scenario(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_default_scenario(&path, true).unwrap();
        assert!(ScenarioConfig::from_file(&path).is_ok());
    }

    #[test]
    fn cli_parses_project_flags() {
        let cli = Cli::parse_from([
            "pocketfolio",
            "--verbose",
            "project",
            "--offline",
            "--price",
            "bitcoin=50000",
            "--horizon",
            "10",
            "--manual-rate",
            "0.04",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Project {
                offline,
                prices,
                horizon,
                manual_rate,
                ..
            } => {
                assert!(offline);
                assert_eq!(prices, vec!["bitcoin=50000"]);
                assert_eq!(horizon, Some(10));
                assert_eq!(manual_rate, Some(0.04));
            }
            _ => panic!("expected project command"),
        }
    }
}
