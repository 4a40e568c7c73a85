//! Display formatting for amounts and rates (French conventions).
//!
//! Amounts are rounded to whole euros with space-grouped thousands
//! (`12 345 €`); rates are percentages with two decimals (`6.00%`).

/// Whole-unit amount with grouped thousands and a trailing currency symbol.
pub fn fmt_amount(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return "–".into();
    }
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped} {symbol}")
}

/// Currency symbol for a CoinGecko `vs_currency` code.
pub fn currency_symbol(vs_currency: &str) -> String {
    match vs_currency.to_ascii_lowercase().as_str() {
        "eur" => "€".into(),
        "usd" => "$".into(),
        "gbp" => "£".into(),
        "chf" => "CHF".into(),
        other => other.to_ascii_uppercase(),
    }
}

/// Fraction as a percentage with two decimals: `0.06` → `6.00%`.
pub fn fmt_pct(rate: f64) -> String {
    if !rate.is_finite() {
        return "–".into();
    }
    format!("{:.2}%", rate * 100.0)
}
