//! Numeric coercion with the runtime's rules.
//!
//! `to_number` converts a whole string strictly (surrounding whitespace
//! allowed, nothing else); `parse_float` reads the longest numeric prefix.

use crate::value::Value;

/// Whitespace the runtime trims from text: Unicode white space and line
/// terminators plus the byte-order mark, but not NEL (U+0085).
pub(crate) fn is_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Strict numeric conversion.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => string_to_number(s),
        Value::Date(date) => date
            .instant()
            .map(|at| at.timestamp_millis() as f64)
            .unwrap_or(f64::NAN),
        // arrays go through their text form: [] -> "" -> 0, [7] -> "7" -> 7
        Value::Array(_) => string_to_number(&value.to_string()),
        _ => f64::NAN,
    }
}

/// Read the longest numeric prefix of the value's text form.
pub fn parse_float(value: &Value) -> f64 {
    match value {
        Value::String(s) => string_parse_float(s),
        other => string_parse_float(&other.to_string()),
    }
}

pub(crate) fn string_to_number(text: &str) -> f64 {
    let text = text.trim_matches(is_space);
    if text.is_empty() {
        return 0.0;
    }
    if let Some(n) = radix_literal(text) {
        return n;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if decimal_prefix_len(text) == text.len() {
        text.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

pub(crate) fn string_parse_float(text: &str) -> f64 {
    let text = text.trim_start_matches(is_space);
    if text.starts_with("Infinity") || text.starts_with("+Infinity") {
        return f64::INFINITY;
    }
    if text.starts_with("-Infinity") {
        return f64::NEG_INFINITY;
    }
    match decimal_prefix_len(text) {
        0 => f64::NAN,
        len => text[..len].parse().unwrap_or(f64::NAN),
    }
}

/// `0x`, `0o` and `0b` literals. Unsigned only; a bad digit makes the whole
/// literal NaN.
fn radix_literal(text: &str) -> Option<f64> {
    let (radix, digits) = match text.get(..2)? {
        "0x" | "0X" => (16, &text[2..]),
        "0o" | "0O" => (8, &text[2..]),
        "0b" | "0B" => (2, &text[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut acc = 0.0;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => acc = acc * radix as f64 + d as f64,
            None => return Some(f64::NAN),
        }
    }
    Some(acc)
}

/// Length in bytes of the longest decimal literal at the start of `text`:
/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
/// Zero when there is none.
fn decimal_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut digits = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        let frac = frac_end - (i + 1);
        if digits + frac > 0 {
            digits += frac;
            i = frac_end;
        }
    }
    if digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    i
}
