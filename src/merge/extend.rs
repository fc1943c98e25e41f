//! Merge logic

use gjs_value::{is_function, is_object, is_undefined, Instance, Kind, Value};
use tracing::{debug, trace};

use super::options::MergeOptions;
use crate::iter::{each, Key};

/// Array writes this far past the end are dropped instead of padding the
/// array with holes.
const MAX_INDEX_GAP: usize = 1 << 16;

/// Merge `sources` into `target`, left to right, and return the target.
///
/// A target that is neither an object nor a function (including `null`)
/// is replaced by an empty mapping first. Sources are never modified.
///
/// Shallow mode copies every top-level entry, `Undefined` included. Deep
/// mode skips `Undefined` entries and entries equal to what the target
/// already holds, recurses into mappings and sequences, and assigns every
/// other value as is. When the target holds an incompatible value at a
/// key being deep-merged, it is replaced by a fresh mapping or sequence
/// before recursing.
pub fn extend<'t>(
    options: &MergeOptions,
    target: &'t mut Value,
    sources: &[Value],
) -> &'t mut Value {
    if matches!(target, Value::Null) || (!is_object(target) && !is_function(target)) {
        debug!(kind = ?target.kind(), "merge target replaced with empty mapping");
        *target = Value::object();
    }

    for source in sources {
        if options.deep {
            merge_deep(target, source);
        } else {
            assign(target, source);
        }
    }
    target
}

/// Deep-merge layers in order (first is base, last has highest precedence)
/// into a fresh mapping.
pub fn merge_layers(layers: &[Value]) -> Value {
    let mut merged = Value::object();
    extend(&MergeOptions::deep(), &mut merged, layers);
    merged
}

/// Flat key copy.
fn assign(target: &mut Value, source: &Value) {
    each(source, |key, value| {
        if let Some(slot) = slot_mut(target, key) {
            *slot = value.clone();
        }
    });
}

fn merge_deep(target: &mut Value, source: &Value) {
    each(source, |key, value| {
        if is_undefined(value) {
            return;
        }
        if entry(target, key) == Some(value) {
            trace!(%key, "skipping entry already present in target");
            return;
        }
        let Some(slot) = slot_mut(target, key) else {
            return;
        };

        match value.kind() {
            Kind::Sequence => {
                if slot.kind() != Kind::Sequence {
                    *slot = Value::Array(Vec::new());
                }
                merge_deep(slot, value);
            }
            Kind::Mapping => {
                if slot.kind() != Kind::Mapping {
                    *slot = Value::object();
                }
                merge_deep(slot, value);
            }
            Kind::Scalar | Kind::Callable | Kind::Other => *slot = value.clone(),
        }
    });
}

/// Read the target's current value at `key`, if it has one.
fn entry<'t>(target: &'t Value, key: Key<'_>) -> Option<&'t Value> {
    match target {
        Value::Object(fields) | Value::Instance(Instance { fields, .. }) => match key {
            Key::Name(name) => fields.get(name),
            Key::Index(index) => fields.get(&index.to_string()),
        },
        Value::Array(items) => key.as_index().and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Writable slot in the target for `key`, created as `Undefined` when
/// missing. `None` when the target cannot hold the key.
fn slot_mut<'t>(target: &'t mut Value, key: Key<'_>) -> Option<&'t mut Value> {
    match target {
        Value::Object(fields) | Value::Instance(Instance { fields, .. }) => {
            Some(fields.entry(key.to_string()).or_default())
        }
        Value::Array(items) => {
            let Some(index) = key.as_index() else {
                debug!(%key, "array target ignores non-index key");
                return None;
            };
            if index >= items.len() {
                if index - items.len() > MAX_INDEX_GAP {
                    debug!(%key, len = items.len(), "array index too far past the end");
                    return None;
                }
                items.resize(index + 1, Value::Undefined);
            }
            Some(&mut items[index])
        }
        other => {
            debug!(%key, kind = ?other.kind(), "merge target cannot hold entries");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_scalar_override() {
        let mut target = v(json!({"retries": 3}));
        extend(&MergeOptions::deep(), &mut target, &[v(json!({"retries": 5}))]);
        assert_eq!(target["retries"], Value::Number(5.0));
    }

    #[test]
    fn test_object_deep_merge() {
        let mut target = v(json!({"user": {"name": "lin", "locale": "zh-CN"}}));
        let overlay = v(json!({"user": {"name": "chen"}}));

        extend(&MergeOptions::deep(), &mut target, &[overlay]);

        assert_eq!(target["user"]["name"], Value::from("chen"));
        assert_eq!(target["user"]["locale"], Value::from("zh-CN"));
    }

    #[test]
    fn test_shallow_replaces_nested_objects() {
        let mut target = Value::object();
        extend(
            &MergeOptions::shallow(),
            &mut target,
            &[v(json!({"a": {"b": 1}})), v(json!({"a": {"c": 2}}))],
        );
        assert_eq!(target, v(json!({"a": {"c": 2}})));
    }

    #[test]
    fn test_shallow_copies_undefined() {
        let mut target = v(json!({"a": 1}));
        let source: Value = vec![("a", Value::Undefined)].into_iter().collect();

        extend(&MergeOptions::shallow(), &mut target, &[source.clone()]);
        assert_eq!(target["a"], Value::Undefined);
        assert!(target.as_object().unwrap().contains_key("a"));

        let mut target = v(json!({"a": 1}));
        extend(&MergeOptions::deep(), &mut target, &[source]);
        assert_eq!(target["a"], Value::Number(1.0));
    }

    #[test]
    fn test_array_merge_is_positional() {
        let mut target = v(json!({"a": [1, 2]}));
        extend(&MergeOptions::deep(), &mut target, &[v(json!({"a": [3]}))]);
        assert_eq!(target, v(json!({"a": [3, 2]})));
    }

    #[test]
    fn test_array_replaces_non_array() {
        let mut target = v(json!({"a": {"x": 1}}));
        extend(&MergeOptions::deep(), &mut target, &[v(json!({"a": [1]}))]);
        assert_eq!(target, v(json!({"a": [1]})));
    }

    #[test]
    fn test_object_replaces_non_object() {
        let mut target = v(json!({"a": [1, 2], "b": "text"}));
        extend(
            &MergeOptions::deep(),
            &mut target,
            &[v(json!({"a": {"x": 1}, "b": {"y": 2}}))],
        );
        assert_eq!(target, v(json!({"a": {"x": 1}, "b": {"y": 2}})));
    }

    #[test]
    fn test_null_override() {
        let mut target = v(json!({"value": 100}));
        extend(&MergeOptions::deep(), &mut target, &[v(json!({"value": null}))]);
        assert_eq!(target["value"], Value::Null);
    }

    #[test]
    fn test_non_object_target_is_substituted() {
        for initial in [Value::Undefined, Value::Null, Value::from(5.0), Value::from("x")] {
            let mut target = initial;
            let merged = extend(&MergeOptions::shallow(), &mut target, &[v(json!({"a": 1}))]);
            assert_eq!(*merged, v(json!({"a": 1})));
        }
    }

    #[test]
    fn test_function_target_is_kept() {
        let f = Value::function(|_| Value::Null);
        let mut target = f.clone();
        extend(&MergeOptions::deep(), &mut target, &[v(json!({"a": 1}))]);
        assert_eq!(target, f);
    }

    #[test]
    fn test_instances_are_assigned_not_merged() {
        let point = Value::Instance(Instance::new("Point").with_field("x", 1.0));
        let mut target = v(json!({"p": {"y": 2}}));
        let source: Value = vec![("p", point.clone())].into_iter().collect();

        extend(&MergeOptions::deep(), &mut target, &[source]);

        assert_eq!(target["p"], point);
    }

    #[test]
    fn test_equal_entry_is_skipped() {
        let shared = v(json!({"b": [1, {"c": 2}]}));
        let mut target: Value = vec![("a", shared.clone())].into_iter().collect();
        let source: Value = vec![("a", target["a"].clone())].into_iter().collect();

        extend(&MergeOptions::deep(), &mut target, &[source]);

        assert_eq!(target["a"], shared);
    }

    #[test]
    fn test_sequence_source_into_mapping_target() {
        let mut target = Value::object();
        extend(&MergeOptions::deep(), &mut target, &[v(json!(["x", "y"]))]);
        assert_eq!(target, v(json!({"0": "x", "1": "y"})));
    }

    #[test]
    fn test_mapping_source_into_array_target() {
        let mut target = v(json!(["a"]));
        extend(
            &MergeOptions::deep(),
            &mut target,
            &[v(json!({"2": "c", "name": "dropped"}))],
        );
        assert_eq!(
            target,
            Value::Array(vec![Value::from("a"), Value::Undefined, Value::from("c")])
        );
    }

    #[test]
    fn test_merge_layers() {
        let defaults = v(json!({"retries": 3, "style": {"theme": "light"}}));
        let site = v(json!({"retries": 4}));
        let page = v(json!({"style": {"theme": "dark"}}));
        let call = v(json!({"retries": 1}));

        let result = merge_layers(&[defaults, site, page, call]);

        assert_eq!(result["retries"], Value::Number(1.0));
        assert_eq!(result["style"]["theme"], Value::from("dark"));
    }

    #[test]
    fn test_nested_deep_merge() {
        let mut target = Value::object();
        extend(
            &MergeOptions::deep(),
            &mut target,
            &[
                v(json!({"level1": {"level2": {"a": 1, "b": 2}}})),
                v(json!({"level1": {"level2": {"b": 3, "c": 4}}})),
            ],
        );

        assert_eq!(target, v(json!({"level1": {"level2": {"a": 1, "b": 3, "c": 4}}})));
    }

    #[test]
    fn test_text_source_contributes_nothing() {
        for options in [MergeOptions::shallow(), MergeOptions::deep()] {
            let mut target = Value::object();
            extend(&options, &mut target, &[Value::from("ab")]);
            assert_eq!(target, Value::object());
        }

        let mut target = v(json!({"a": 1}));
        extend(
            &MergeOptions::deep(),
            &mut target,
            &[Value::from(7), Value::Bool(true), Value::Null, Value::Undefined],
        );
        assert_eq!(target, v(json!({"a": 1})));
    }

    #[test]
    fn test_sources_are_not_modified() {
        let source = v(json!({"a": {"b": [1, 2]}}));
        let before = source.clone();
        let mut target = v(json!({"a": {"b": [9, 9, 9]}}));

        extend(&MergeOptions::deep(), &mut target, std::slice::from_ref(&source));

        assert_eq!(source, before);
        assert_eq!(target, v(json!({"a": {"b": [1, 2, 9]}})));
    }
}
