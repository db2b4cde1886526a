use super::pointer::Pointer;
use serde_json::{Map, Value};

/// JSON object alias used for projections throughout the crate.
pub type JsonObject = Map<String, Value>;

/// Field carrying the authoritative revision of a projection.
pub const REVISION_FIELD: &str = "revision";

/// Field carrying the authoritative policy reference of a projection.
pub const POLICY_ID_FIELD: &str = "policy_id";

/// Applies `patch` onto `base` with merge-patch semantics.
///
/// Object fields merge recursively, `null` deletes the addressed field, and
/// any non-object patch replaces the base wholesale.
pub fn apply_merge(base: &Value, patch: &Value) -> Value {
    match patch {
        Value::Object(patch_map) => {
            let mut result = match base {
                Value::Object(map) => map.clone(),
                _ => Map::new(),
            };
            for (field, patch_value) in patch_map {
                if patch_value.is_null() {
                    result.remove(field);
                } else {
                    let merged =
                        apply_merge(result.get(field).unwrap_or(&Value::Null), patch_value);
                    result.insert(field.clone(), merged);
                }
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

/// Merges `payload` into `base` at `pointer` by expanding the pointer into a
/// singleton patch document and merge-patching it in.
pub fn merge_at(base: &Value, pointer: &Pointer, payload: &Value) -> Value {
    apply_merge(base, &expand_at(pointer, payload.clone()))
}

/// Wraps `payload` in nested singleton objects so that it sits at `pointer`.
pub fn expand_at(pointer: &Pointer, payload: Value) -> Value {
    pointer.segments().iter().rev().fold(payload, |inner, segment| {
        let mut wrapper = Map::new();
        wrapper.insert(segment.clone(), inner);
        Value::Object(wrapper)
    })
}

/// Removes the subtree addressed by `pointer`.
///
/// The root pointer yields the empty object; a missing path is a no-op.
pub fn delete_at(base: &JsonObject, pointer: &Pointer) -> JsonObject {
    if pointer.is_root() {
        return Map::new();
    }
    let mut result = base.clone();
    remove_path(&mut result, pointer.segments());
    result
}

fn remove_path(object: &mut JsonObject, segments: &[String]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        object.remove(head);
        return;
    }
    if let Some(Value::Object(child)) = object.get_mut(head) {
        remove_path(child, rest);
    }
}

/// Sets the subtree at `pointer` to `payload`.
///
/// At the root, an object payload copies its top-level fields into `base`
/// (overwriting per field) while a non-object payload replaces the base
/// wholesale. Below the root, intermediate objects are created as needed and
/// non-object intermediates are replaced.
pub fn overlay_at(base: Value, pointer: &Pointer, payload: &Value) -> Value {
    if pointer.is_root() {
        return match payload {
            Value::Object(fields) => {
                let mut result = match base {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                for (field, value) in fields {
                    result.insert(field.clone(), value.clone());
                }
                Value::Object(result)
            }
            other => other.clone(),
        };
    }
    let object = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Value::Object(set_path(object, pointer.segments(), payload.clone()))
}

fn set_path(mut object: JsonObject, segments: &[String], payload: Value) -> JsonObject {
    let Some((head, rest)) = segments.split_first() else {
        return object;
    };
    if rest.is_empty() {
        object.insert(head.clone(), payload);
        return object;
    }
    let child = match object.remove(head) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    object.insert(head.clone(), Value::Object(set_path(child, rest, payload)));
    object
}

/// Reads the value addressed by `pointer`, if present.
pub fn value_at<'a>(object: &'a JsonObject, pointer: &Pointer) -> Option<&'a Value> {
    let mut current: Option<&Value> = None;
    for segment in pointer.segments() {
        let scope = match current {
            None => object.get(segment),
            Some(Value::Object(map)) => map.get(segment),
            Some(_) => return None,
        };
        current = Some(scope?);
    }
    current
}

/// Extracts the projection revision, defaulting to 0 when absent.
pub fn revision_of(object: &JsonObject) -> u64 {
    object
        .get(REVISION_FIELD)
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// Reads the policy reference recorded in a projection, if any.
pub fn policy_id_of(object: &JsonObject) -> Option<&str> {
    object.get(POLICY_ID_FIELD).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn merge_recurses_and_null_deletes() {
        let base = json!({"a": {"b": 1, "c": 2}, "d": 3});
        let patch = json!({"a": {"b": null, "e": 4}});
        let merged = apply_merge(&base, &patch);
        assert_eq!(merged, json!({"a": {"c": 2, "e": 4}, "d": 3}));
    }

    #[test]
    fn merge_replaces_scalar_base() {
        let merged = apply_merge(&json!(7), &json!({"a": 1}));
        assert_eq!(merged, json!({"a": 1}));
    }

    #[test]
    fn expand_builds_singleton_document() {
        let expanded = expand_at(&Pointer::parse("/a/b"), json!(5));
        assert_eq!(expanded, json!({"a": {"b": 5}}));
        assert_eq!(expand_at(&Pointer::root(), json!(5)), json!(5));
    }

    #[test]
    fn delete_missing_path_is_noop() {
        let base = obj(json!({"a": 1}));
        assert_eq!(delete_at(&base, &Pointer::parse("/b/c")), base);
    }

    #[test]
    fn overlay_creates_intermediates() {
        let result = overlay_at(json!({}), &Pointer::parse("/a/b"), &json!(1));
        assert_eq!(result, json!({"a": {"b": 1}}));
    }

    #[test]
    fn value_at_walks_objects_only() {
        let base = obj(json!({"a": {"b": 2}, "s": "x"}));
        assert_eq!(value_at(&base, &Pointer::parse("/a/b")), Some(&json!(2)));
        assert_eq!(value_at(&base, &Pointer::parse("/s/y")), None);
    }
}
