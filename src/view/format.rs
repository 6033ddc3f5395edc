use chrono::NaiveDateTime;
use std::fmt::Write;

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Whole-unit currency: rounded, grouped, symbol first (`Rp50.000`)
pub fn format_currency(value: f64, currency_symbol: &str, separator: char) -> String {
    let rounded = value.round() as i64;
    let grouped = format_grouped_int(rounded.unsigned_abs(), separator);
    if rounded < 0 {
        format!("-{}{}", currency_symbol, grouped)
    } else {
        format!("{}{}", currency_symbol, grouped)
    }
}

pub fn format_grouped_int(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Format a timestamp, falling back to ISO dates when the configured pattern
/// is not a valid strftime string.
pub fn format_date(value: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", value.format(pattern)).is_ok() {
        return out;
    }
    value.format(FALLBACK_DATE_FORMAT).to_string()
}
