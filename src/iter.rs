//! Iteration helpers with early exit.
//!
//! A visitor can stop an iteration by returning `false` (or
//! `ControlFlow::Break`). Visitors returning `()` always run to the end.
//! Each helper hands back the collection it walked.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;

use gjs_value::{Kind, Value};

/// Decides whether iteration continues after a visit.
pub trait VisitFlow {
    fn keep_going(&self) -> bool;
}

impl VisitFlow for () {
    fn keep_going(&self) -> bool {
        true
    }
}

impl VisitFlow for bool {
    fn keep_going(&self) -> bool {
        *self
    }
}

impl<B, C> VisitFlow for ControlFlow<B, C> {
    fn keep_going(&self) -> bool {
        self.is_continue()
    }
}

/// Position of an entry inside a value: an index for sequences, a name for
/// mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Index(usize),
    Name(&'a str),
}

impl Key<'_> {
    /// The array index this key addresses, if any.
    ///
    /// Names count only in canonical form: `"7"` is index 7, `"07"` and
    /// `"+7"` are plain names.
    pub fn as_index(&self) -> Option<usize> {
        match *self {
            Key::Index(index) => Some(index),
            Key::Name(name) => name
                .parse::<usize>()
                .ok()
                .filter(|index| index.to_string() == name),
        }
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{}", index),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// Visit each element of a sequence in index order.
pub fn arr_each<'a, T, R, F>(seq: &'a [T], mut visit: F) -> &'a [T]
where
    F: FnMut(usize, &'a T) -> R,
    R: VisitFlow,
{
    for (index, item) in seq.iter().enumerate() {
        if !visit(index, item).keep_going() {
            break;
        }
    }
    seq
}

/// Visit each entry of a mapping in key order.
pub fn obj_each<'a, K, V, R, F>(map: &'a BTreeMap<K, V>, mut visit: F) -> &'a BTreeMap<K, V>
where
    F: FnMut(&'a K, &'a V) -> R,
    R: VisitFlow,
{
    for (key, value) in map {
        if !visit(key, value).keep_going() {
            break;
        }
    }
    map
}

/// Visit the entries of any value.
///
/// Sequences are walked by index and mappings (plain or instance) by key.
/// Other values have no enumerable entries and are not visited.
pub fn each<'a, R, F>(value: &'a Value, mut visit: F) -> &'a Value
where
    F: FnMut(Key<'a>, &'a Value) -> R,
    R: VisitFlow,
{
    match (value.kind(), value) {
        (Kind::Sequence, Value::Array(items)) => {
            arr_each(items, |index, item| visit(Key::Index(index), item));
        }
        (_, Value::Object(fields)) | (_, Value::Instance(gjs_value::Instance { fields, .. })) => {
            obj_each(fields, |name, item| visit(Key::Name(name), item));
        }
        _ => {}
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use gjs_value::Instance;
    use serde_json::json;

    #[test]
    fn test_arr_each_stops_on_false() {
        let seq = [10, 20, 30, 40, 50];
        let mut seen = Vec::new();

        let returned = arr_each(&seq, |index, item| {
            seen.push(*item);
            index != 2
        });

        assert_eq!(seen, vec![10, 20, 30]);
        assert_eq!(returned, &seq);
    }

    #[test]
    fn test_arr_each_unit_visitor_runs_to_end() {
        let mut count = 0;
        arr_each(&["a", "b", "c"], |_, _| count += 1);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_obj_each_control_flow() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);

        let mut seen = Vec::new();
        obj_each(&map, |key, value| {
            seen.push(*key);
            if *value == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn test_each_dispatches_on_kind() {
        let seq = Value::from(json!(["x", "y"]));
        let mut keys = Vec::new();
        each(&seq, |key, _| keys.push(key.to_string()));
        assert_eq!(keys, vec!["0", "1"]);

        let map = Value::from(json!({"b": 1, "a": 2}));
        let mut keys = Vec::new();
        each(&map, |key, _| keys.push(key.to_string()));
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_each_walks_instance_fields() {
        let value = Value::Instance(Instance::new("Point").with_field("x", 1.0));
        let mut seen = Vec::new();
        each(&value, |key, item| seen.push((key.to_string(), item.clone())));
        assert_eq!(seen, vec![("x".to_string(), Value::Number(1.0))]);
    }

    #[test]
    fn test_each_skips_scalars() {
        let mut visits = 0;
        each(&Value::String("abc".into()), |_, _| visits += 1);
        each(&Value::Null, |_, _| visits += 1);
        each(&Value::function(|_| Value::Undefined), |_, _| visits += 1);
        assert_eq!(visits, 0);
    }

    #[test]
    fn test_key_as_index() {
        assert_eq!(Key::Index(3).as_index(), Some(3));
        assert_eq!(Key::Name("12").as_index(), Some(12));
        assert_eq!(Key::Name("0").as_index(), Some(0));
        assert_eq!(Key::Name("07").as_index(), None);
        assert_eq!(Key::Name("+7").as_index(), None);
        assert_eq!(Key::Name("a").as_index(), None);
    }
}
