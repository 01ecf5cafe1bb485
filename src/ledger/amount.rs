//! Lenient numeric handling for upstream ledger amounts.
//!
//! Every relaxed conversion lives here: callers store raw values as received
//! and read them back through [`coerce_amount`].

use serde_json::Value;

/// Number of billing periods tracked per ledger year.
pub const PERIOD_COUNT: usize = 12;

/// Tolerance used when comparing supplied totals against computed sums.
pub const AMOUNT_EPSILON: f64 = 0.005;

/// Reads a raw amount, treating missing and non-finite values as zero.
pub fn coerce_amount(raw: Option<f64>) -> f64 {
    match raw {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Interprets an upstream JSON value as an amount without failing.
///
/// Numbers pass through and numeric strings are parsed. With both `.` and `,`
/// present the last one is the decimal point; a lone `,` is a decimal point
/// only when followed by one or two digits, otherwise separators must form
/// thousands groups. Ambiguous text and anything else yields `None`.
pub fn lenient_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_amount_text(text),
        _ => None,
    }
}

fn parse_amount_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = match (trimmed.rfind('.'), trimmed.rfind(',')) {
        (Some(dot), Some(comma)) if dot > comma => split_decimal(trimmed, dot, ',')?,
        (Some(_), Some(comma)) => split_decimal(trimmed, comma, '.')?,
        (None, Some(comma)) => {
            let fraction = &trimmed[comma + 1..];
            if trimmed.matches(',').count() == 1 && (1..=2).contains(&fraction.len()) {
                split_decimal(trimmed, comma, '.')?
            } else {
                ungroup(trimmed, ',')?
            }
        }
        (Some(_), None) if trimmed.matches('.').count() > 1 => ungroup(trimmed, '.')?,
        _ => trimmed.to_string(),
    };
    normalized.parse::<f64>().ok()
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

/// Rewrites `text` with the separator at `decimal_at` as `.` and the integer
/// part stripped of `thousands` separators.
fn split_decimal(text: &str, decimal_at: usize, thousands: char) -> Option<String> {
    let fraction = &text[decimal_at + 1..];
    if !is_digits(fraction) {
        return None;
    }
    Some(format!("{}.{fraction}", ungroup(&text[..decimal_at], thousands)?))
}

/// Removes thousands separators, requiring groups of exactly three digits.
fn ungroup(text: &str, separator: char) -> Option<String> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    let mut groups = digits.split(separator);
    let lead = groups.next()?;
    let grouped = if digits.contains(separator) {
        lead.len() <= 3
            && is_digits(lead)
            && groups.all(|group| group.len() == 3 && is_digits(group))
    } else {
        is_digits(lead)
    };
    grouped.then(|| format!("{sign}{}", digits.replace(separator, "")))
}

/// Returns true when two amounts are equal within [`AMOUNT_EPSILON`].
pub fn amounts_match(left: f64, right: f64) -> bool {
    (left - right).abs() < AMOUNT_EPSILON
}
