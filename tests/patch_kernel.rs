use serde_json::{json, Value};
use twincache::{
    apply_merge, delete_at, expand_at, merge_at, overlay_at, revision_of, JsonObject, Pointer,
};

fn obj(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn merge_patch_merges_objects_recursively() {
    let base = json!({"attributes": {"location": "hall-9", "floor": 2}, "revision": 3});
    let patch = json!({"attributes": {"floor": 3}});
    assert_eq!(
        apply_merge(&base, &patch),
        json!({"attributes": {"location": "hall-9", "floor": 3}, "revision": 3})
    );
}

#[test]
fn merge_patch_null_deletes_field() {
    let base = json!({"a": 1, "b": 2});
    assert_eq!(apply_merge(&base, &json!({"a": null})), json!({"b": 2}));
}

#[test]
fn merge_patch_non_object_replaces_wholesale() {
    assert_eq!(apply_merge(&json!({"a": 1}), &json!([1, 2])), json!([1, 2]));
    assert_eq!(apply_merge(&json!("old"), &json!({"a": 1})), json!({"a": 1}));
}

#[test]
fn merge_at_expands_pointer_into_patch_document() {
    let base = json!({"features": {"lamp": {"on": false, "dim": 3}}});
    let merged = merge_at(&base, &Pointer::parse("/features/lamp"), &json!({"on": true}));
    assert_eq!(
        merged,
        json!({"features": {"lamp": {"on": true, "dim": 3}}})
    );
}

#[test]
fn merge_at_root_with_null_payload_deletes_nothing_but_replaces() {
    // a null merge payload at the root is a non-object patch: replacement
    let merged = merge_at(&json!({"a": 1}), &Pointer::root(), &json!(null));
    assert_eq!(merged, json!(null));
}

#[test]
fn expand_at_wraps_payload_in_singletons() {
    assert_eq!(
        expand_at(&Pointer::parse("/a/b/c"), json!(true)),
        json!({"a": {"b": {"c": true}}})
    );
}

#[test]
fn delete_at_root_yields_empty_object() {
    let base = obj(json!({"a": 1, "revision": 5}));
    assert!(delete_at(&base, &Pointer::root()).is_empty());
}

#[test]
fn delete_at_removes_subtree_and_tolerates_missing_paths() {
    let base = obj(json!({"features": {"lamp": {"on": true}, "door": {"open": false}}}));
    let deleted = delete_at(&base, &Pointer::parse("/features/lamp"));
    assert_eq!(
        Value::Object(deleted),
        json!({"features": {"door": {"open": false}}})
    );
    assert_eq!(delete_at(&base, &Pointer::parse("/features/window")), base);
}

#[test]
fn overlay_at_root_with_object_overwrites_per_field() {
    let result = overlay_at(
        json!({"a": 1, "b": 2}),
        &Pointer::root(),
        &json!({"b": 9, "c": 3}),
    );
    assert_eq!(result, json!({"a": 1, "b": 9, "c": 3}));
}

#[test]
fn overlay_at_root_with_scalar_replaces_wholesale() {
    assert_eq!(overlay_at(json!({"a": 1}), &Pointer::root(), &json!(42)), json!(42));
}

#[test]
fn overlay_at_path_replaces_subtree_and_creates_intermediates() {
    let result = overlay_at(
        json!({"features": {"lamp": {"on": true, "dim": 3}}}),
        &Pointer::parse("/features/lamp"),
        &json!({"on": false}),
    );
    assert_eq!(result, json!({"features": {"lamp": {"on": false}}}));

    let created = overlay_at(json!({}), &Pointer::parse("/x/y/z"), &json!(1));
    assert_eq!(created, json!({"x": {"y": {"z": 1}}}));
}

#[test]
fn revision_defaults_to_zero() {
    assert_eq!(revision_of(&obj(json!({"x": 1}))), 0);
    assert_eq!(revision_of(&obj(json!({"revision": 12}))), 12);
    assert_eq!(revision_of(&obj(json!({"revision": "text"}))), 0);
}
