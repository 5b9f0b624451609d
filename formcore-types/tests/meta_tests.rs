use formcore_types::{name_path, FieldData, FieldMeta};
use serde_json::json;

#[test]
fn meta_new_is_clean() {
    let meta = FieldMeta::new(name_path!["user", "email"]);
    assert_eq!(meta.name, name_path!["user", "email"]);
    assert!(!meta.touched);
    assert!(!meta.validating);
    assert!(!meta.validated);
    assert!(meta.errors.is_empty());
    assert!(meta.warnings.is_empty());
}

#[test]
fn field_data_builders() {
    let data = FieldData::new("age")
        .with_value(json!("2"))
        .with_touched(false)
        .with_errors(vec!["bad".into()]);

    assert_eq!(data.name, name_path!["age"]);
    assert_eq!(data.value, Some(json!("2")));
    assert_eq!(data.touched, Some(false));
    assert_eq!(data.errors, Some(vec!["bad".to_string()]));
    assert_eq!(data.validating, None);
    assert_eq!(data.warnings, None);
}

#[test]
fn field_data_serde_roundtrip() {
    let data = FieldData::new(name_path!["users", 0, "name"])
        .with_value(json!("alice"))
        .with_touched(true);
    let json = serde_json::to_string(&data).unwrap();
    let parsed: FieldData = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, data);
}

#[test]
fn meta_serde_roundtrip() {
    let meta = FieldMeta {
        name: name_path!["a"],
        touched: true,
        validating: false,
        validated: true,
        errors: vec!["required".into()],
        warnings: vec!["short".into()],
    };
    let json = serde_json::to_string(&meta).unwrap();
    let parsed: FieldMeta = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, meta);
}
