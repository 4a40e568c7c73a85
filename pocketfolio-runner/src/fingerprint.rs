//! Scenario fingerprinting.
//!
//! A scenario id is the BLAKE3 hash of the canonical JSON of every input that
//! changes the dashboard: horizon, inflation, label style, rate mode, quote
//! currency and pockets and holdings in declaration order. Transport settings
//! (endpoint, refresh interval) are left out.

use serde_json::json;

use crate::config::ScenarioConfig;

/// Length of the id prefix used for artifact directory names.
pub const SHORT_ID_LEN: usize = 12;

/// Deterministic 64-hex-char id for a scenario.
pub fn scenario_id(config: &ScenarioConfig) -> String {
    let pockets: Vec<_> = config
        .pockets
        .iter()
        .map(|p| {
            json!({
                "key": p.key,
                "label": p.label,
                "initial": p.initial,
                "monthly": p.monthly,
                "expected_return": p.expected_return,
            })
        })
        .collect();
    let holdings: Vec<_> = config
        .holdings
        .iter()
        .map(|h| json!({"pocket": h.pocket, "asset": h.asset, "quantity": h.quantity}))
        .collect();

    let canonical = json!({
        "horizon_years": config.horizon_years.years(),
        "inflation": config.inflation,
        "label_style": config.label_style,
        "rate": config.rate_mode(),
        "vs_currency": config.price.vs_currency.to_ascii_lowercase(),
        "pockets": pockets,
        "holdings": holdings,
    });

    blake3::hash(canonical.to_string().as_bytes())
        .to_hex()
        .to_string()
}

/// First [`SHORT_ID_LEN`] characters of an id.
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}
