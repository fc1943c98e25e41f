//! Dynamic value model.
//!
//! `Value` stands in for a dynamically-typed runtime value. Every kind the
//! predicates can tell apart has its own variant, so classification is a
//! plain `match` instead of a runtime probe.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex_lite::Regex;

/// Key-value storage for mappings and instance fields.
pub type Map = BTreeMap<String, Value>;

/// A dynamically-typed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// The absent value.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// A plain mapping.
    Object(Map),
    /// An object built by a named constructor. Enumerable like a mapping,
    /// but never recursed into by a deep merge.
    Instance(Instance),
    Function(Function),
    Date(DateValue),
    RegExp(RegExp),
    Error(ErrorValue),
}

static UNDEFINED: Value = Value::Undefined;

impl Value {
    /// Wrap a native closure as a callable value.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Value::Function(Function::new(f))
    }

    /// An empty plain mapping.
    pub fn object() -> Self {
        Value::Object(Map::new())
    }

    /// Look up a named entry on a mapping or instance.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            Value::Instance(instance) => instance.fields.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Missing keys read as `Undefined`, like a property lookup.
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&UNDEFINED)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self {
            Value::Array(items) => items.get(index).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }
}

/// Text coercion: what the value looks like when concatenated into a string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    // holes and nulls join as empty text
                    if !matches!(item, Value::Undefined | Value::Null) {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) | Value::Instance(_) => f.write_str("[object Object]"),
            Value::Function(_) => f.write_str("function () { [native code] }"),
            Value::Date(date) => write!(f, "{}", date),
            Value::RegExp(re) => write!(f, "{}", re),
            Value::Error(err) => write!(f, "{}", err),
        }
    }
}

/// Format a number the way the runtime prints it: integers without a
/// fractional part, `NaN` and `Infinity` by name.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// A class-instance-like object: fields plus the name of its constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub class: String,
    pub fields: Map,
}

impl Instance {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

type NativeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A callable value. Clones share the same closure, and equality is
/// identity of that closure.
#[derive(Clone)]
pub struct Function(Arc<NativeFn>);

impl Function {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    /// True if both handles point at the same closure.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

/// Naive (zone-less) datetime layouts, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Datetime layouts with a numeric `+HH:MM` offset that RFC 3339 misses
/// (it requires seconds).
const ZONED_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

/// Date-only layouts, read as UTC midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A date value. Like the runtime's date object it may hold an invalid
/// date, which is what parsing unrecognised text produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValue(Option<DateTime<Utc>>);

impl DateValue {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Some(at))
    }

    pub fn invalid() -> Self {
        Self(None)
    }

    /// Parse text into a date.
    ///
    /// Accepts RFC 3339, RFC 2822, the date-time string format
    /// (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`, optionally followed by
    /// `THH:MM[:SS[.sss]]` and `Z` or `+HH:MM`), plus the common
    /// `YYYY-MM-DD HH:MM[:SS]` and `YYYY/MM/DD` layouts. Zone-less times
    /// are read as UTC. Anything else yields an invalid date.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        if let Ok(at) = DateTime::parse_from_rfc3339(text) {
            return Self::new(at.with_timezone(&Utc));
        }
        if let Ok(at) = DateTime::parse_from_rfc2822(text) {
            return Self::new(at.with_timezone(&Utc));
        }
        for format in ZONED_DATETIME_FORMATS {
            if let Ok(at) = DateTime::parse_from_str(text, format) {
                return Self::new(at.with_timezone(&Utc));
            }
        }
        // `Z` is UTC, which is how naive times are read anyway
        let naive = text.strip_suffix('Z').unwrap_or(text);
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(at) = NaiveDateTime::parse_from_str(naive, format) {
                return Self::new(at.and_utc());
            }
        }
        for format in DATE_FORMATS {
            if let Some(at) = NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
            {
                return Self::new(at.and_utc());
            }
        }
        if let Some(at) = parse_year_month(text).and_then(|d| d.and_hms_opt(0, 0, 0)) {
            return Self::new(at.and_utc());
        }

        Self::invalid()
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

/// `YYYY` or `YYYY-MM`, read as the first day of the period.
fn parse_year_month(text: &str) -> Option<NaiveDate> {
    let (year, month) = match text.split_once('-') {
        Some((year, month)) => (year, Some(month)),
        None => (text, None),
    };
    let digits = |part: &str, len: usize| {
        part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(year, 4) {
        return None;
    }
    let month = match month {
        Some(month) if digits(month, 2) => month.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

impl From<DateTime<Utc>> for DateValue {
    fn from(at: DateTime<Utc>) -> Self {
        Self::new(at)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => f.write_str("Invalid Date"),
        }
    }
}

/// A compiled regular expression. Two regexps are equal when their
/// source patterns are.
#[derive(Debug, Clone)]
pub struct RegExp(Regex);

impl RegExp {
    pub fn new(pattern: &str) -> Result<Self, regex_lite::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl From<Regex> for RegExp {
    fn from(re: Regex) -> Self {
        Self(re)
    }
}

impl PartialEq for RegExp {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

/// An error value: constructor name plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
}

impl ErrorValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self::named("Error", message)
    }

    /// An error of a derived kind, e.g. `TypeError`.
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Capture a Rust error as an error value.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}
