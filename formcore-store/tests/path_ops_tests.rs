use formcore_store::{clone_by_paths, get, remove, set};
use formcore_types::{name_path, NamePath};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

// ── get ──────────────────────────────────────────────────────────

#[test]
fn get_nested_value() {
    let doc = json!({"users": [{"name": "alice"}, {"name": "bob"}]});
    assert_eq!(
        get(&doc, &name_path!["users", 1, "name"]),
        Some(&json!("bob"))
    );
}

#[test]
fn get_root_path_is_whole_document() {
    let doc = json!({"a": 1});
    assert_eq!(get(&doc, &NamePath::root()), Some(&doc));
}

#[test]
fn get_missing_is_none() {
    let doc = json!({"a": {"b": 1}});
    assert_eq!(get(&doc, &name_path!["a", "c"]), None);
    assert_eq!(get(&doc, &name_path!["a", "b", "c"]), None);
    assert_eq!(get(&doc, &name_path!["a", 0]), None);
}

// ── set ──────────────────────────────────────────────────────────

#[test]
fn set_get_roundtrip() {
    let doc = json!({});
    let path = name_path!["users", 0, "name"];
    let next = set(&doc, &path, json!("alice"));
    assert_eq!(get(&next, &path), Some(&json!("alice")));
}

#[test]
fn set_does_not_mutate_previous_document() {
    let doc = json!({"a": {"b": 1}});
    let snapshot = doc.clone();
    let next = set(&doc, &name_path!["a", "b"], json!(2));
    assert_eq!(doc, snapshot);
    assert_eq!(get(&next, &name_path!["a", "b"]), Some(&json!(2)));
}

#[test]
fn set_creates_intermediate_containers_by_segment_kind() {
    let next = set(&json!({}), &name_path!["list", 1, "name"], json!("x"));
    assert_eq!(next, json!({"list": [null, {"name": "x"}]}));
}

#[test]
fn set_replaces_mismatched_container() {
    let doc = json!({"a": "scalar"});
    let next = set(&doc, &name_path!["a", "b"], json!(1));
    assert_eq!(next, json!({"a": {"b": 1}}));

    let doc = json!({"a": {"k": 1}});
    let next = set(&doc, &name_path!["a", 0], json!("x"));
    assert_eq!(next, json!({"a": ["x"]}));
}

#[test]
fn set_at_root_replaces_document() {
    let next = set(&json!({"a": 1}), &NamePath::root(), json!({"b": 2}));
    assert_eq!(next, json!({"b": 2}));
}

#[test]
fn set_preserves_sibling_values() {
    let doc = json!({"a": 1, "b": {"c": 2, "d": 3}});
    let next = set(&doc, &name_path!["b", "c"], json!(9));
    assert_eq!(next, json!({"a": 1, "b": {"c": 9, "d": 3}}));
}

// ── remove ───────────────────────────────────────────────────────

#[test]
fn remove_object_key_drops_it() {
    let doc = json!({"a": 1, "b": 2});
    let next = remove(&doc, &name_path!["a"]);
    assert_eq!(next, json!({"b": 2}));
}

#[test]
fn remove_array_slot_nulls_it() {
    // List items are reset to "absent", not spliced: sibling indices
    // keep their positions.
    let doc = json!({"list": ["a", "b", "c"]});
    let next = remove(&doc, &name_path!["list", 1]);
    assert_eq!(next, json!({"list": ["a", null, "c"]}));
}

#[test]
fn remove_missing_path_is_noop() {
    let doc = json!({"a": {"b": 1}});
    assert_eq!(remove(&doc, &name_path!["a", "x"]), doc);
    assert_eq!(remove(&doc, &name_path!["x", "y"]), doc);
}

// ── clone_by_paths ───────────────────────────────────────────────

#[test]
fn clone_by_paths_contains_exactly_requested_leaves() {
    let doc = json!({
        "user": {"name": "alice", "age": 30},
        "tags": ["a", "b"],
        "extra": true
    });
    let partial = clone_by_paths(
        &doc,
        &[name_path!["user", "name"], name_path!["tags", 1]],
    );
    assert_eq!(partial, json!({"user": {"name": "alice"}, "tags": [null, "b"]}));
}

#[test]
fn clone_by_paths_skips_missing_leaves() {
    let doc = json!({"a": 1});
    let partial = clone_by_paths(&doc, &[name_path!["a"], name_path!["missing"]]);
    assert_eq!(partial, json!({"a": 1}));
}

#[test]
fn clone_by_paths_empty_list_is_empty_document() {
    let doc = json!({"a": 1});
    assert_eq!(clone_by_paths(&doc, &[]), json!({}));
}

#[test]
fn clone_by_paths_clones_subtrees_wholesale() {
    let doc = json!({"user": {"name": "alice", "age": 30}});
    let partial = clone_by_paths(&doc, &[name_path!["user"]]);
    assert_eq!(partial, json!({"user": {"name": "alice", "age": 30}}));
}

// ── null vs absent ───────────────────────────────────────────────

#[test]
fn get_distinguishes_null_from_absent() {
    let doc = json!({"a": null});
    assert_eq!(get(&doc, &name_path!["a"]), Some(&Value::Null));
    assert_eq!(get(&doc, &name_path!["b"]), None);
}
