//! Calendar labels for projection months.
//!
//! A label names the calendar month `anchor + offset months` in a short
//! month / two-digit year form. Only the anchor's year and month are used, so
//! the day of month never shifts a label (31 January + 1 month is February).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const FRENCH_MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Month label rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// `janv. 27`
    #[default]
    French,
    /// `Jan 27`
    English,
}

impl LabelStyle {
    fn month_name(self, month0: usize) -> &'static str {
        match self {
            LabelStyle::French => FRENCH_MONTHS[month0],
            LabelStyle::English => ENGLISH_MONTHS[month0],
        }
    }
}

/// `(year, zero-based month)` of `anchor + offset` months.
pub fn shift_months(anchor: NaiveDate, offset: u32) -> (i32, u32) {
    let total = anchor.year() as i64 * 12 + anchor.month0() as i64 + offset as i64;
    let year = total.div_euclid(12) as i32;
    let month0 = total.rem_euclid(12) as u32;
    (year, month0)
}

/// Label for the month `offset` months after `anchor`.
pub fn month_label(anchor: NaiveDate, offset: u32, style: LabelStyle) -> String {
    let (year, month0) = shift_months(anchor, offset);
    format!(
        "{} {:02}",
        style.month_name(month0 as usize),
        year.rem_euclid(100)
    )
}

/// Labels for months `1..=months` after `anchor`.
pub fn month_labels(anchor: NaiveDate, months: u32, style: LabelStyle) -> Vec<String> {
    (1..=months).map(|m| month_label(anchor, m, style)).collect()
}
