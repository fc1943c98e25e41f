//! Runtime type predicates.
//!
//! Every predicate is total: it takes any value and answers `true` or
//! `false`, never an error.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::kind::{classify, Kind};
use crate::number::{is_space, parse_float, to_number};
use crate::value::{DateValue, Value};

/// Best-effort mail address shape. Not anchored, so the address may be
/// embedded in longer text.
const MAIL_PATTERN: &str = r"\w+([-+.]\w+)*@\w+([-.]\w+)*\.\w+([-.]\w+)*";

/// Integers at or beyond this magnitude print in exponent form and do not
/// survive an integer re-parse.
const MAX_PRINTABLE_INT: f64 = 1e21;

fn mail_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(MAIL_PATTERN).expect("mail pattern compiles"))
}

pub fn is_undefined(value: &Value) -> bool {
    matches!(value, Value::Undefined)
}

pub fn is_error(value: &Value) -> bool {
    matches!(value, Value::Error(_))
}

pub fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

pub fn is_boolean(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

/// True for every structured value, including `null` and arrays.
pub fn is_object(value: &Value) -> bool {
    !matches!(
        value,
        Value::Undefined
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Function(_)
    )
}

/// True only for generic key-value mappings.
pub fn is_plain_object(value: &Value) -> bool {
    classify(value) == Kind::Mapping
}

/// True when the value enumerates no entries. Primitives, functions and
/// specialized objects have nothing enumerable, so they count as empty.
pub fn is_empty_object(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Instance(instance) => instance.fields.is_empty(),
        _ => true,
    }
}

pub fn is_function(value: &Value) -> bool {
    classify(value) == Kind::Callable
}

/// True for text that is empty or all whitespace. Non-text is never empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim_matches(is_space).is_empty(),
        _ => false,
    }
}

pub fn is_regexp(value: &Value) -> bool {
    matches!(value, Value::RegExp(_))
}

/// True for numbers that re-parse to themselves as integers.
///
/// Text is never an integer, even when it spells one: `"5"` is not `5`.
pub fn is_int(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_PRINTABLE_INT,
        _ => false,
    }
}

/// Checks the text form of the value against a loose mail address shape.
pub fn is_mail(value: &Value) -> bool {
    let text = match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    };
    mail_pattern().is_match(&text)
}

pub fn is_array(value: &Value) -> bool {
    classify(value) == Kind::Sequence
}

/// True for finite numbers and numeric-looking text.
///
/// Text qualifies when both its strict conversion and its prefix parse
/// produce finite numbers; `"12px"` and `""` do not, `" 12 "` does.
pub fn is_num(value: &Value) -> bool {
    matches!(value, Value::Number(_) | Value::String(_))
        && !(to_number(value) - parse_float(value)).is_nan()
}

/// True for valid dates and for text that parses as one.
pub fn is_date(value: &Value) -> bool {
    match value {
        Value::String(s) => DateValue::parse(s).is_valid(),
        Value::Date(date) => date.is_valid(),
        _ => false,
    }
}
