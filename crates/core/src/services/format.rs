//! Display formatting shared by the table and the charts.
//!
//! Output follows en-US conventions: `,` thousands separators, `.` decimal
//! point, `M/D/YYYY` dates.

use chrono::{DateTime, NaiveDate};

use crate::models::view::{PercentChange, Tone};

/// Placeholder for a numeric field upstream did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

const ARROW_UP: char = '↑';
const ARROW_DOWN: char = '↓';

/// Fraction digits shown for money before trailing zeros are trimmed.
const MONEY_MAX_DECIMALS: usize = 3;

/// `2.5` → `↑2.50%` (positive), `-1.234` → `↓1.23%` (negative).
/// Zero counts as negative.
pub fn format_percent_change(change: f64) -> PercentChange {
    let (arrow, tone) = if change > 0.0 {
        (ARROW_UP, Tone::Positive)
    } else {
        (ARROW_DOWN, Tone::Negative)
    };
    PercentChange {
        arrow,
        tone,
        text: format!("{arrow}{:.2}%", change.abs()),
    }
}

/// `$` plus a grouped amount with at most three decimals, e.g.
/// `43000.5` → `$43,000.5`, `1234567` → `$1,234,567`.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("${}", format_grouped(value, MONEY_MAX_DECIMALS))
}

pub fn format_optional_usd(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format_usd)
}

/// Round to `max_decimals`, trim trailing zeros, insert thousands separators.
pub fn format_grouped(value: f64, max_decimals: usize) -> String {
    let formatted = format!("{value:.max_decimals$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };

    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0" after rounding away the fraction
    let sign = if grouped == "0" && frac_part.is_none() { "" } else { sign };

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Round a chart price to cents: `42000.456` → `42000.46`.
pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Calendar day (UTC) of a millisecond timestamp.
pub fn day_of(timestamp_millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_millis).map(|dt| dt.date_naive())
}

/// Day-granularity label, e.g. `11/14/2023`.
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}
