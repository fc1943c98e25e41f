//! Closed classification of values.
//!
//! Iteration and merging branch on `Kind` rather than probing individual
//! predicates, so there is exactly one place that decides what counts as a
//! sequence or a mapping.

use crate::value::Value;

/// Structural kind of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Ordered, index-addressable: arrays.
    Sequence,
    /// Plain key-value mappings.
    Mapping,
    /// Primitives: undefined, null, booleans, numbers, text.
    Scalar,
    /// Functions.
    Callable,
    /// Everything structured that is not a plain container: instances,
    /// dates, regexps, errors.
    Other,
}

impl Kind {
    /// Deep merges recurse into these kinds and nothing else.
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Sequence | Kind::Mapping)
    }
}

/// Classify a value.
pub fn classify(value: &Value) -> Kind {
    match value {
        Value::Array(_) => Kind::Sequence,
        Value::Object(_) => Kind::Mapping,
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_) => Kind::Scalar,
        Value::Function(_) => Kind::Callable,
        Value::Instance(_) | Value::Date(_) | Value::RegExp(_) | Value::Error(_) => Kind::Other,
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        classify(self)
    }
}
