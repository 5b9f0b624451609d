use formcore_engine::{FormApi, NullForm, ValidateOptions};
use formcore_types::{name_path, FieldData};
use serde_json::json;

#[test]
fn null_form_getters_return_defaults() {
    let form = NullForm::new();

    assert_eq!(form.get_field_value(&name_path!["a"]), None);
    assert_eq!(form.get_fields_value(None, None), json!({}));
    assert_eq!(form.get_fields_value_all(), json!({}));
    assert!(form.get_field_error(&name_path!["a"]).is_empty());
    assert!(form.get_field_warning(&name_path!["a"]).is_empty());
    assert!(form.get_fields_error(None).is_empty());
    assert!(!form.is_field_touched(&name_path!["a"]));
    assert!(!form.is_fields_touched(None, true));
    assert!(!form.is_field_validating(&name_path!["a"]));
}

#[test]
fn null_form_mutators_are_inert() {
    let form = NullForm::new();

    form.set_field_value(&name_path!["a"], json!(1));
    form.set_fields_value(json!({"a": 1}));
    form.set_fields(vec![FieldData::new("a").with_touched(true)]);
    form.reset_fields(None);
    form.submit();

    // still nothing behind it
    assert_eq!(form.get_field_value(&name_path!["a"]), None);
}

#[tokio::test]
async fn null_form_validation_resolves_empty() {
    let form = NullForm::new();
    let values = form
        .validate_fields(None, ValidateOptions::default())
        .await
        .expect("null form never fails validation");
    assert_eq!(values, json!({}));
}

#[test]
fn null_form_is_injectable_behind_the_trait() {
    // the point of the null object: callers hold a &dyn FormApi and never
    // branch on "is there a form?"
    fn read_through(form: &dyn FormApi) -> Option<serde_json::Value> {
        form.get_field_value(&name_path!["x"])
    }

    let null = NullForm::new();
    assert_eq!(read_through(&null), None);
}
