use formcore_engine::{Field, FieldProps, FormEngine, ListState, HOOK_MARK};
use formcore_types::name_path;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn engine_with_users(initial: serde_json::Value) -> FormEngine {
    let engine = FormEngine::new();
    let hooks = engine.internal_hooks(HOOK_MARK).expect("internal mark");
    hooks.set_initial_values(json!({"users": initial}), true);
    let container = Arc::new(Field::new(
        FieldProps::new(name_path!["users"]).list_field(),
    ));
    hooks.register_field(container);
    engine
}

#[test]
fn remove_first_row_keeps_remaining_values() {
    let engine = engine_with_users(json!(["a", "b"]));
    let hooks = engine.internal_hooks(HOOK_MARK).unwrap();
    hooks.register_field(Arc::new(Field::new(FieldProps::new(name_path!["users", 0]))));
    hooks.register_field(Arc::new(Field::new(FieldProps::new(name_path!["users", 1]))));
    let list = ListState::new(engine.clone(), name_path!["users"]);

    list.remove(0);

    assert_eq!(engine.get_fields_value_all(), json!({"users": ["b"]}));
    // the fields-derived view agrees: the second row slid into index 0
    assert_eq!(engine.get_fields_value(None, None), json!({"users": ["b"]}));
}

#[test]
fn remove_keeps_surviving_keys_stable() {
    let engine = engine_with_users(json!(["a", "b"]));
    let list = ListState::new(engine.clone(), name_path!["users"]);

    let before = list.keys();
    assert_eq!(before.len(), 2);

    list.remove(0);
    let after = list.keys();

    // the surviving row keeps its pre-removal key, not a regenerated one
    assert_eq!(after, vec![before[1]]);
}

#[test]
fn add_appends_and_issues_fresh_keys() {
    let engine = engine_with_users(json!([]));
    let list = ListState::new(engine.clone(), name_path!["users"]);

    list.add(json!("x"), None);
    list.add(json!("y"), None);

    assert_eq!(engine.get_field_value(&name_path!["users"]), Some(json!(["x", "y"])));
    let keys = list.keys();
    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1]);
}

#[test]
fn add_at_index_inserts() {
    let engine = engine_with_users(json!(["a", "c"]));
    let list = ListState::new(engine.clone(), name_path!["users"]);

    list.add(json!("b"), Some(1));

    assert_eq!(
        engine.get_field_value(&name_path!["users"]),
        Some(json!(["a", "b", "c"]))
    );
}

#[test]
fn move_row_carries_its_key() {
    let engine = engine_with_users(json!(["a", "b", "c"]));
    let list = ListState::new(engine.clone(), name_path!["users"]);

    let before = list.keys();
    list.move_row(0, 2);

    assert_eq!(
        engine.get_field_value(&name_path!["users"]),
        Some(json!(["b", "c", "a"]))
    );
    assert_eq!(list.keys(), vec![before[1], before[2], before[0]]);
}

#[test]
fn out_of_range_operations_are_ignored() {
    let engine = engine_with_users(json!(["a"]));
    let list = ListState::new(engine.clone(), name_path!["users"]);

    list.remove(5);
    list.move_row(0, 9);

    assert_eq!(engine.get_field_value(&name_path!["users"]), Some(json!(["a"])));
}

#[test]
fn external_writes_are_reconciled_into_keys() {
    let engine = engine_with_users(json!([]));
    let list = ListState::new(engine.clone(), name_path!["users"]);

    // rows arrive past the controller
    engine.set_fields_value(json!({"users": ["a", "b", "c"]}));

    assert_eq!(list.keys().len(), 3);
    list.remove(1);
    assert_eq!(engine.get_field_value(&name_path!["users"]), Some(json!(["a", "c"])));
}

#[test]
fn list_operations_mark_the_container_touched() {
    let engine = engine_with_users(json!(["a"]));
    let list = ListState::new(engine.clone(), name_path!["users"]);

    assert!(!engine.is_field_touched(&name_path!["users"]));
    list.add(json!("b"), None);
    assert!(engine.is_field_touched(&name_path!["users"]));
}
