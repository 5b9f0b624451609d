use formcore_rules::{Rule, RuleEntry, RuleType};
use serde_json::json;

// ── Builders ─────────────────────────────────────────────────────

#[test]
fn required_shorthand() {
    let rule = Rule::required();
    assert!(rule.required);
    assert!(!rule.warning_only);
    assert!(rule.validator.is_none());
}

#[test]
fn chained_builders() {
    let rule = Rule::required()
        .and_type(RuleType::String)
        .and_min(2.0)
        .and_max(10.0)
        .with_message("bad ${name}")
        .warning_only();

    assert!(rule.required);
    assert_eq!(rule.rule_type, Some(RuleType::String));
    assert_eq!(rule.min, Some(2.0));
    assert_eq!(rule.max, Some(10.0));
    assert_eq!(rule.message.as_deref(), Some("bad ${name}"));
    assert!(rule.warning_only);
}

// ── Trigger filtering ────────────────────────────────────────────

#[test]
fn explicit_validation_runs_every_rule() {
    let rule = Rule::required().with_trigger(vec!["onBlur".into()]);
    assert!(rule.runs_on(None, None));
}

#[test]
fn rule_trigger_list_wins_over_field_default() {
    let rule = Rule::required().with_trigger(vec!["onBlur".into()]);
    let field_triggers = vec!["onChange".to_string()];
    assert!(rule.runs_on(Some("onBlur"), Some(&field_triggers)));
    assert!(!rule.runs_on(Some("onChange"), Some(&field_triggers)));
}

#[test]
fn rule_without_trigger_falls_back_to_field_default() {
    let rule = Rule::required();
    let field_triggers = vec!["onChange".to_string()];
    assert!(rule.runs_on(Some("onChange"), Some(&field_triggers)));
    assert!(!rule.runs_on(Some("onBlur"), Some(&field_triggers)));
}

#[test]
fn no_triggers_anywhere_runs_on_everything() {
    let rule = Rule::required();
    assert!(rule.runs_on(Some("onChange"), None));
    assert!(rule.runs_on(Some("anything"), None));
}

// ── RuleEntry ────────────────────────────────────────────────────

#[test]
fn literal_entry_resolves_to_itself() {
    let entry = RuleEntry::from(Rule::min(3.0));
    let rule = entry.resolve(&json!({}));
    assert_eq!(rule.min, Some(3.0));
}

#[test]
fn dynamic_entry_reads_the_value_tree() {
    // "confirm must equal password", the classic cross-field rule.
    let entry = RuleEntry::dynamic(|values| {
        let expected = values["password"].clone();
        Rule {
            enum_values: vec![expected],
            ..Rule::new()
        }
    });

    let rule = entry.resolve(&json!({"password": "hunter2"}));
    assert_eq!(rule.enum_values, vec![json!("hunter2")]);
}
