//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for a dashboard:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: monthly series and allocation breakdown for spreadsheets
//! - **Markdown**: human-readable scenario report
//!
//! Persisted dashboards carry a `schema_version`. Newer versions are
//! rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use pocketfolio_core::allocation::AllocationEntry;
use pocketfolio_core::domain::AggregatePoint;
use pocketfolio_core::returns::RateMode;

use crate::dashboard::{Dashboard, SCHEMA_VERSION};
use crate::fingerprint::short_id;
use crate::format::{currency_symbol, fmt_amount, fmt_pct};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `Dashboard` to pretty JSON.
pub fn export_json(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).context("failed to serialize Dashboard to JSON")
}

/// Deserialize a `Dashboard` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<Dashboard> {
    let dashboard: Dashboard =
        serde_json::from_str(json).context("failed to deserialize Dashboard from JSON")?;
    if dashboard.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            dashboard.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(dashboard)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the aggregated series as CSV.
///
/// Columns: month, label, nominal, real, contribution, interest
pub fn export_series_csv(series: &[AggregatePoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["month", "label", "nominal", "real", "contribution", "interest"])?;
    for p in series {
        wtr.write_record([
            &p.month.to_string(),
            &p.label,
            &format!("{:.2}", p.nominal),
            &format!("{:.2}", p.real),
            &format!("{:.2}", p.contribution),
            &format!("{:.2}", p.interest()),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the allocation breakdown as CSV.
///
/// Columns: key, label, value, share, color
pub fn export_allocation_csv(entries: &[AllocationEntry]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["key", "label", "value", "share", "color"])?;
    for e in entries {
        wtr.write_record([
            &e.key,
            &e.label,
            &format!("{:.2}", e.value),
            &format!("{:.6}", e.share),
            &e.color,
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a dashboard.
///
/// Creates a directory named after the first 12 characters of the scenario
/// id under `output_dir` containing:
/// - `dashboard.json` — the full `Dashboard`
/// - `series.csv` — monthly nominal, real and contribution totals
/// - `allocation.csv` — current allocation breakdown
/// - `report.md` — Markdown summary
///
/// Rebuilding the same scenario overwrites the previous artifacts. Returns
/// the path to the directory.
pub fn save_artifacts(dashboard: &Dashboard, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(short_id(&dashboard.scenario_id));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("dashboard.json"), export_json(dashboard)?)?;
    std::fs::write(
        run_dir.join("series.csv"),
        export_series_csv(&dashboard.series)?,
    )?;
    std::fs::write(
        run_dir.join("allocation.csv"),
        export_allocation_csv(&dashboard.allocation)?,
    )?;
    std::fs::write(run_dir.join("report.md"), generate_report(dashboard))?;

    tracing::debug!(dir = %run_dir.display(), "artifacts saved");
    Ok(run_dir)
}

/// Load a `Dashboard` from an artifact directory's dashboard.json.
pub fn load_artifacts(dir: &Path) -> Result<Dashboard> {
    let path = dir.join("dashboard.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report for a dashboard.
pub fn generate_report(d: &Dashboard) -> String {
    let symbol = currency_symbol(&d.vs_currency);
    let money = |v: f64| fmt_amount(v, &symbol);
    let mut md = String::with_capacity(2048);

    md.push_str("# Wealth Projection Report\n\n");

    md.push_str("## Scenario\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Scenario | {} |\n", short_id(&d.scenario_id)));
    md.push_str(&format!("| Anchor | {} |\n", d.anchor));
    md.push_str(&format!("| Horizon | {} years |\n", d.horizon_years));
    md.push_str(&format!("| Inflation | {} |\n", fmt_pct(d.inflation)));
    md.push_str(&format!("| Initial Balance | {} |\n", money(d.total_initial)));
    md.push_str(&format!("| Monthly Contribution | {} |\n", money(d.total_monthly)));
    md.push_str(&format!("| Blended Rate | {} |\n", fmt_pct(d.blended_rate)));
    let mode = match d.rate_mode {
        RateMode::Auto => "auto",
        RateMode::Manual(_) => "manual",
    };
    md.push_str(&format!(
        "| Global Rate | {} ({mode}) |\n",
        fmt_pct(d.global_rate)
    ));
    md.push('\n');

    md.push_str("## Pockets\n\n");
    md.push_str("| Pocket | Initial | Holdings | Effective | Monthly | Expected Return |\n");
    md.push_str("| --- | ---: | ---: | ---: | ---: | ---: |\n");
    for p in &d.pockets {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            p.label,
            money(p.initial_balance),
            money(p.holding_value),
            money(p.effective_balance),
            money(p.monthly_contribution),
            fmt_pct(p.expected_return),
        ));
    }
    md.push('\n');

    if !d.holdings.is_empty() {
        md.push_str("## External Holdings\n\n");
        for h in &d.holdings {
            let price = h.price.map(money).unwrap_or_else(|| "–".into());
            md.push_str(&format!(
                "- {} {} → {} (price {}, value {})\n",
                h.quantity,
                h.asset,
                h.pocket,
                price,
                money(h.value)
            ));
        }
        md.push('\n');
    }

    md.push_str("## Key Figures\n\n");
    md.push_str("| Horizon | Value | Contributions | Interest |\n");
    md.push_str("| --- | ---: | ---: | ---: |\n");
    for k in &d.kpis {
        md.push_str(&format!(
            "| {} years | {} | {} | {} |\n",
            k.years,
            money(k.value),
            money(k.contributions),
            money(k.interest)
        ));
    }
    md.push('\n');

    md.push_str("## Allocation\n\n");
    if d.allocation.is_empty() {
        md.push_str("No pocket holds a positive balance.\n\n");
    } else {
        md.push_str("| Pocket | Value | Share |\n");
        md.push_str("| --- | ---: | ---: |\n");
        for e in &d.allocation {
            md.push_str(&format!(
                "| {} | {} | {:.0}% |\n",
                e.label,
                money(e.value),
                e.share * 100.0
            ));
        }
        md.push('\n');
    }

    if let Some(last) = d.final_point() {
        md.push_str("## End of Horizon\n\n");
        md.push_str(&format!(
            "{}: nominal {}, real {}, paid in {}.\n",
            last.label,
            money(last.nominal),
            money(last.real),
            money(last.contribution)
        ));
    }

    md
}
