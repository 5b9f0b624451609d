use formcore_rules::{fill_template, ValidateMessages};
use pretty_assertions::assert_eq;

#[test]
fn fill_substitutes_known_placeholders() {
    let out = fill_template(
        "${name} must be at least ${min} characters",
        &[("name", "password".into()), ("min", "8".into())],
    );
    assert_eq!(out, "password must be at least 8 characters");
}

#[test]
fn fill_leaves_unknown_placeholders_visible() {
    let out = fill_template("${name} bad ${mystery}", &[("name", "x".into())]);
    assert_eq!(out, "x bad ${mystery}");
}

#[test]
fn defaults_cover_the_template_map() {
    let messages = ValidateMessages::defaults();
    assert!(messages.required.is_some());
    assert!(messages.default.is_some());
    assert!(messages.enum_values.is_some());
    assert!(messages.pattern.mismatch.is_some());
    assert!(messages.types.string.is_some());
    assert!(messages.string.range.is_some());
    assert!(messages.number.max.is_some());
    assert!(messages.array.len.is_some());
}

#[test]
fn merged_override_wins_where_present() {
    let overrides = ValidateMessages {
        required: Some("need ${name}!".into()),
        ..ValidateMessages::default()
    };
    let merged = ValidateMessages::defaults().merged(&overrides);
    assert_eq!(merged.required.as_deref(), Some("need ${name}!"));
    // untouched templates keep their defaults
    assert_eq!(
        merged.enum_values,
        ValidateMessages::defaults().enum_values
    );
}

#[test]
fn merged_nested_override() {
    let overrides = ValidateMessages {
        string: formcore_rules::RangeMessages {
            min: Some("too short".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    let merged = ValidateMessages::defaults().merged(&overrides);
    assert_eq!(merged.string.min.as_deref(), Some("too short"));
    assert_eq!(merged.string.max, ValidateMessages::defaults().string.max);
}

#[test]
fn serde_uses_enum_key() {
    let messages = ValidateMessages {
        enum_values: Some("pick one of ${enum}".into()),
        ..Default::default()
    };
    let json = serde_json::to_value(&messages).unwrap();
    assert_eq!(json["enum"], "pick one of ${enum}");
}
