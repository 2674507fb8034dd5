use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub const MISSING: &str = "--";

/// Colour hint for a rendered number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    /// Zero counts as positive.
    pub fn of(value: Decimal) -> Self {
        if value >= Decimal::ZERO {
            Tone::Positive
        } else {
            Tone::Negative
        }
    }
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// `$1,234.56` / `-$12.30`.
pub fn format_usd(value: Decimal) -> String {
    let rounded = round_half_up(value, 2);
    let negative = rounded < Decimal::ZERO;
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{}${}.{}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part
    )
}

pub fn format_usd_opt(value: Option<Decimal>) -> String {
    value.map(format_usd).unwrap_or_else(|| MISSING.to_string())
}

fn group_thousands(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fraction to a one-decimal percentage: 0.625 -> `62.5%`.
pub fn format_pct(fraction: Decimal) -> String {
    let pct = round_half_up(fraction * Decimal::ONE_HUNDRED, 1);
    format!("{pct:.1}%")
}

/// A value that is already in percent, with three decimals: `-0.412%`.
pub fn format_change(percent: Decimal) -> String {
    format!("{:.3}%", round_half_up(percent, 3))
}

/// Probability as whole cents: 0.914 -> `91¢`.
pub fn format_cents(probability: Decimal) -> String {
    let cents = round_half_up(probability * Decimal::ONE_HUNDRED, 0);
    format!("{cents}¢")
}

/// Signed amount with two decimals and no currency symbol.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value, 2))
}

/// `HH:MM:SS` in the display offset, or `--`.
pub fn format_time(value: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    match value {
        Some(ts) => ts.with_timezone(&offset).format("%H:%M:%S").to_string(),
        None => MISSING.to_string(),
    }
}

pub fn format_unix_time(secs: Option<i64>, offset: FixedOffset) -> String {
    format_time(secs.and_then(|s| DateTime::from_timestamp(s, 0)), offset)
}

/// Form value for a float field: no trailing zeros (`20`, `0.85`).
pub fn format_input(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{value:.6}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
