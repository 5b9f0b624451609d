use formcore_engine::{
    Field, FieldProps, FormEngine, FormField, UnregisterOptions, HOOK_MARK,
};
use formcore_types::{name_path, FieldId};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn register(engine: &FormEngine, props: FieldProps) -> (FieldId, Arc<Field>) {
    let hooks = engine.internal_hooks(HOOK_MARK).expect("internal mark");
    let field = Arc::new(Field::new(props));
    let id = hooks.register_field(field.clone());
    (id, field)
}

fn unregister(engine: &FormEngine, id: FieldId, options: UnregisterOptions) {
    let hooks = engine.internal_hooks(HOOK_MARK).expect("internal mark");
    hooks.unregister_field(id, options);
}

// ── Preserve on unregister ───────────────────────────────────────

#[test]
fn unregister_with_preserve_keeps_value() {
    let engine = FormEngine::new();
    let (id, _) = register(&engine, FieldProps::new(name_path!["x"]));
    engine.set_field_value(&name_path!["x"], json!("kept"));

    unregister(&engine, id, UnregisterOptions::default());

    assert_eq!(engine.get_field_value(&name_path!["x"]), Some(json!("kept")));
}

#[test]
fn unregister_without_preserve_resets_to_initial_value() {
    let engine = FormEngine::new();
    let hooks = engine.internal_hooks(HOOK_MARK).unwrap();
    hooks.set_initial_values(json!({"x": "initial"}), true);
    let (id, _) = register(&engine, FieldProps::new(name_path!["x"]));
    engine.set_field_value(&name_path!["x"], json!("changed"));

    unregister(
        &engine,
        id,
        UnregisterOptions {
            preserve: Some(false),
            ..Default::default()
        },
    );

    assert_eq!(
        engine.get_field_value(&name_path!["x"]),
        Some(json!("initial"))
    );
}

#[test]
fn unregister_without_preserve_and_no_initial_removes_value() {
    let engine = FormEngine::new();
    let (id, _) = register(&engine, FieldProps::new(name_path!["x"]));
    engine.set_field_value(&name_path!["x"], json!("temp"));

    unregister(
        &engine,
        id,
        UnregisterOptions {
            preserve: Some(false),
            ..Default::default()
        },
    );

    assert_eq!(engine.get_field_value(&name_path!["x"]), None);
}

#[test]
fn unregister_leaves_value_when_sibling_occupies_path() {
    let engine = FormEngine::new();
    let (first, _) = register(&engine, FieldProps::new(name_path!["x"]));
    register(&engine, FieldProps::new(name_path!["x"]));
    engine.set_field_value(&name_path!["x"], json!("shared"));

    unregister(
        &engine,
        first,
        UnregisterOptions {
            preserve: Some(false),
            ..Default::default()
        },
    );

    assert_eq!(
        engine.get_field_value(&name_path!["x"]),
        Some(json!("shared"))
    );
}

#[test]
fn form_level_preserve_default_applies() {
    let engine = FormEngine::new();
    let hooks = engine.internal_hooks(HOOK_MARK).unwrap();
    hooks.set_preserve(Some(false));

    let (id, _) = register(&engine, FieldProps::new(name_path!["x"]));
    engine.set_field_value(&name_path!["x"], json!("temp"));

    // no field-level override: the form default (false) wins
    unregister(&engine, id, UnregisterOptions::default());
    assert_eq!(engine.get_field_value(&name_path!["x"]), None);
}

#[test]
fn field_override_beats_form_default() {
    let engine = FormEngine::new();
    let hooks = engine.internal_hooks(HOOK_MARK).unwrap();
    hooks.set_preserve(Some(false));

    let (id, _) = register(&engine, FieldProps::new(name_path!["x"]).preserve(true));
    engine.set_field_value(&name_path!["x"], json!("kept"));

    unregister(
        &engine,
        id,
        UnregisterOptions {
            preserve: Some(true),
            ..Default::default()
        },
    );
    assert_eq!(engine.get_field_value(&name_path!["x"]), Some(json!("kept")));
}

// ── List items ───────────────────────────────────────────────────

#[test]
fn list_item_resets_to_absent_not_default() {
    let engine = FormEngine::new();
    let hooks = engine.internal_hooks(HOOK_MARK).unwrap();
    hooks.set_initial_values(json!({"users": [{"name": "seed"}]}), true);

    let (id, _) = register(&engine, FieldProps::new(name_path!["users", 0, "name"]));
    engine.set_field_value(&name_path!["users", 0, "name"], json!("edited"));

    unregister(
        &engine,
        id,
        UnregisterOptions {
            is_list_field: true,
            preserve: Some(false),
            sub_name_path: Some(name_path!["users", 0, "name"]),
        },
    );

    // reset to "absent" (null slot semantics), never to the initial value
    assert_eq!(
        engine.get_field_value(&name_path!["users", 0, "name"]),
        None
    );
}

#[test]
fn bare_list_row_skips_cleanup() {
    let engine = FormEngine::new();
    let (id, _) = register(&engine, FieldProps::new(name_path![0]));
    engine.set_field_value(&name_path![0], json!("row"));

    unregister(
        &engine,
        id,
        UnregisterOptions {
            is_list_field: true,
            preserve: Some(false),
            sub_name_path: Some(name_path![0]),
        },
    );

    assert_eq!(engine.get_field_value(&name_path![0]), Some(json!("row")));
}

// ── Batched mark-then-sweep ──────────────────────────────────────

#[test]
fn swap_within_batch_preserves_value() {
    // Two fields exchange one path inside a single update batch: the
    // departing field's cleanup must be judged after the arriving field
    // has registered, so the value survives.
    let engine = FormEngine::new();
    let (old_id, _) = register(&engine, FieldProps::new(name_path!["slot"]));
    engine.set_field_value(&name_path!["slot"], json!("value"));

    engine.batch(|| {
        unregister(
            &engine,
            old_id,
            UnregisterOptions {
                preserve: Some(false),
                ..Default::default()
            },
        );
        register(&engine, FieldProps::new(name_path!["slot"]));
    });

    assert_eq!(
        engine.get_field_value(&name_path!["slot"]),
        Some(json!("value"))
    );
}

#[test]
fn unbatched_swap_loses_value() {
    // The same sequence without a batch sweeps immediately between the
    // two calls; this is exactly what the batch exists to prevent.
    let engine = FormEngine::new();
    let (old_id, _) = register(&engine, FieldProps::new(name_path!["slot"]));
    engine.set_field_value(&name_path!["slot"], json!("value"));

    unregister(
        &engine,
        old_id,
        UnregisterOptions {
            preserve: Some(false),
            ..Default::default()
        },
    );
    register(&engine, FieldProps::new(name_path!["slot"]));

    assert_eq!(engine.get_field_value(&name_path!["slot"]), None);
}

#[test]
fn nested_batches_sweep_once_at_outermost_end() {
    let engine = FormEngine::new();
    let (id, _) = register(&engine, FieldProps::new(name_path!["x"]));
    engine.set_field_value(&name_path!["x"], json!("v"));

    engine.batch(|| {
        engine.batch(|| {
            unregister(
                &engine,
                id,
                UnregisterOptions {
                    preserve: Some(false),
                    ..Default::default()
                },
            );
        });
        // inner batch ended, but the sweep waits for the outermost end
        assert_eq!(engine.get_field_value(&name_path!["x"]), Some(json!("v")));
    });

    assert_eq!(engine.get_field_value(&name_path!["x"]), None);
}

#[test]
fn unknown_field_id_unregister_is_ignored() {
    let engine = FormEngine::new();
    let (id, _) = register(&engine, FieldProps::new(name_path!["x"]));
    unregister(&engine, id, UnregisterOptions::default());
    // second unregister of the same id must not panic
    unregister(&engine, id, UnregisterOptions::default());
}

// ── Meta after unregister ────────────────────────────────────────

#[test]
fn unregistered_entity_no_longer_answers_meta_queries() {
    let engine = FormEngine::new();
    let (id, field) = register(&engine, FieldProps::new(name_path!["x"]));
    field.set_touched(true);
    assert!(engine.is_field_touched(&name_path!["x"]));

    unregister(&engine, id, UnregisterOptions::default());
    assert!(!engine.is_field_touched(&name_path!["x"]));
}
