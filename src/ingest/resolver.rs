//! Field resolution over candidate header lists.
//!
//! A canonical field is looked up by walking its candidate headers in
//! order and taking the first one present with a truthy value. Coercion
//! never fails: numbers default to `0`, text to `""`.

use super::{RawRow, RawValue};

/// Ordered header names that may carry one canonical field.
pub type Candidates = &'static [&'static str];

/// First truthy value among `candidates`, if any.
pub fn resolve<'a>(row: &'a RawRow, candidates: &[&str]) -> Option<&'a RawValue> {
    candidates
        .iter()
        .filter_map(|key| row.get(*key))
        .find(|value| value.is_truthy())
}

/// Resolve a numeric field, `0.0` when nothing resolves or parses.
pub fn resolve_number(row: &RawRow, candidates: &[&str]) -> f64 {
    resolve(row, candidates).map(to_number).unwrap_or(0.0)
}

/// Resolve an integer field, truncating toward zero.
pub fn resolve_integer(row: &RawRow, candidates: &[&str]) -> i64 {
    resolve_number(row, candidates).trunc() as i64
}

/// Resolve a text field, `""` when nothing resolves.
pub fn resolve_text(row: &RawRow, candidates: &[&str]) -> String {
    resolve(row, candidates).map(to_text).unwrap_or_default()
}

/// Coerce a raw value to a finite number, `0.0` on failure.
pub fn to_number(value: &RawValue) -> f64 {
    let n = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => parse_leading_number(s).unwrap_or(0.0),
        RawValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Render a raw value as text. Integral numbers drop the decimal part.
pub fn to_text(value: &RawValue) -> String {
    match value {
        RawValue::Text(s) => s.clone(),
        RawValue::Number(n) => format_number(*n),
        RawValue::Bool(b) => b.to_string(),
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parse the longest decimal number at the start of `s`, ignoring leading
/// whitespace and any trailing text (`"85%"` → 85, `"12 und"` → 12).
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
