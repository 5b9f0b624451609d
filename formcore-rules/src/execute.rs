//! Rule execution: declarative checks plus the three pipeline modes.

use crate::{fill_template, Rule, RuleType, TypeMessages, ValidateFirst, ValidateMessages};
use formcore_types::NamePath;
use futures::future::{join_all, select_all, BoxFuture};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("valid url pattern"));

/// The outcome of running one field's rule list: blocking errors and
/// `warning_only` warnings, already split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleReport {
    /// Blocking errors; any entry gates submission.
    pub errors: Vec<String>,
    /// Informational warnings; never block.
    pub warnings: Vec<String>,
}

impl RuleReport {
    /// True when at least one blocking error was produced.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// True when the value counts as empty for `required` purposes: absent,
/// null, the empty string, or an empty array.
#[must_use]
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

fn format_bound(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_template(types: &TypeMessages, rule_type: RuleType) -> &Option<String> {
    match rule_type {
        RuleType::String => &types.string,
        RuleType::Number => &types.number,
        RuleType::Integer => &types.integer,
        RuleType::Float => &types.float,
        RuleType::Boolean => &types.boolean,
        RuleType::Array => &types.array,
        RuleType::Object => &types.object,
        RuleType::Email => &types.email,
        RuleType::Url => &types.url,
    }
}

fn type_matches(rule_type: RuleType, value: &Value) -> bool {
    match rule_type {
        RuleType::String => value.is_string(),
        RuleType::Number => value.is_number(),
        RuleType::Integer => value.is_i64() || value.is_u64(),
        RuleType::Float => value.is_f64(),
        RuleType::Boolean => value.is_boolean(),
        RuleType::Array => value.is_array(),
        RuleType::Object => value.is_object(),
        RuleType::Email => value.as_str().is_some_and(|s| EMAIL_RE.is_match(s)),
        RuleType::Url => value.as_str().is_some_and(|s| URL_RE.is_match(s)),
    }
}

enum MeasureKind {
    String,
    Number,
    Array,
}

fn measure(value: &Value) -> Option<(MeasureKind, f64)> {
    match value {
        Value::String(s) => Some((MeasureKind::String, s.chars().count() as f64)),
        Value::Number(n) => n.as_f64().map(|f| (MeasureKind::Number, f)),
        Value::Array(items) => Some((MeasureKind::Array, items.len() as f64)),
        _ => None,
    }
}

struct MessageContext<'a> {
    messages: &'a ValidateMessages,
    vars: Vec<(&'static str, String)>,
}

impl MessageContext<'_> {
    fn render(&self, template: &Option<String>) -> String {
        let template = template
            .as_deref()
            .or(self.messages.default.as_deref())
            .unwrap_or("Validation error on field ${name}");
        fill_template(template, &self.vars)
    }
}

/// Runs one rule against a value, returning its raw message list.
///
/// Declarative checks run first; an empty value short-circuits them
/// (`required` aside), but a custom validator always runs so it can
/// implement its own presence semantics. When the rule declares a
/// `message`, it replaces everything the rule produced.
pub async fn execute_rule(
    name: &NamePath,
    rule: &Rule,
    value: Option<&Value>,
    messages: &ValidateMessages,
) -> Vec<String> {
    let mut vars: Vec<(&'static str, String)> = vec![("name", name.to_string())];
    if let Some(rule_type) = rule.rule_type {
        vars.push(("type", rule_type.to_string()));
    }
    if let Some(min) = rule.min {
        vars.push(("min", format_bound(min)));
    }
    if let Some(max) = rule.max {
        vars.push(("max", format_bound(max)));
    }
    if let Some(len) = rule.len {
        vars.push(("len", format_bound(len)));
    }
    if let Some(pattern) = &rule.pattern {
        vars.push(("pattern", pattern.as_str().to_string()));
    }
    if !rule.enum_values.is_empty() {
        let joined = rule
            .enum_values
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", ");
        vars.push(("enum", joined));
    }
    let ctx = MessageContext { messages, vars };

    let mut errors = Vec::new();

    if rule.required && is_empty_value(value) {
        errors.push(ctx.render(&messages.required));
    } else if let Some(value) = value.filter(|v| !v.is_null()) {
        // Absent and null values skip the declarative checks; empty strings
        // and arrays still run them (an empty string violates `min`).

        if let Some(rule_type) = rule.rule_type {
            if !type_matches(rule_type, value) {
                errors.push(ctx.render(type_template(&messages.types, rule_type)));
            }
        }

        if let Some((kind, measured)) = measure(value) {
            let range_messages = match kind {
                MeasureKind::String => &messages.string,
                MeasureKind::Number => &messages.number,
                MeasureKind::Array => &messages.array,
            };
            if let Some(len) = rule.len {
                if measured != len {
                    errors.push(ctx.render(&range_messages.len));
                }
            } else {
                let below = rule.min.is_some_and(|min| measured < min);
                let above = rule.max.is_some_and(|max| measured > max);
                if rule.min.is_some() && rule.max.is_some() && (below || above) {
                    errors.push(ctx.render(&range_messages.range));
                } else if below {
                    errors.push(ctx.render(&range_messages.min));
                } else if above {
                    errors.push(ctx.render(&range_messages.max));
                }
            }
        }

        if !rule.enum_values.is_empty() && !rule.enum_values.contains(value) {
            errors.push(ctx.render(&messages.enum_values));
        }

        if let Some(pattern) = &rule.pattern {
            if value.as_str().is_some_and(|s| !pattern.is_match(s)) {
                errors.push(ctx.render(&messages.pattern.mismatch));
            }
        }

        if rule.whitespace && value.as_str().is_some_and(|s| s.trim().is_empty()) {
            errors.push(ctx.render(&messages.whitespace));
        }
    }

    if let Some(validator) = &rule.validator {
        let subject = value.unwrap_or(&Value::Null);
        if let Err(mut custom) = validator.validate(rule, subject).await {
            if custom.is_empty() {
                custom.push(ctx.render(&messages.default));
            }
            errors.append(&mut custom);
        }
    }

    if !errors.is_empty() {
        if let Some(message) = &rule.message {
            return vec![fill_template(message, &ctx.vars)];
        }
    }
    errors
}

/// Runs a field's rule list in the given mode.
///
/// Warnings from `warning_only` rules accumulate in every mode and never
/// settle the pipeline; blocking errors settle it according to the mode.
pub async fn run_rules(
    name: &NamePath,
    rules: &[Rule],
    value: Option<&Value>,
    messages: &ValidateMessages,
    mode: ValidateFirst,
) -> RuleReport {
    let mut report = RuleReport::default();

    match mode {
        ValidateFirst::Serial => {
            for rule in rules {
                let errors = execute_rule(name, rule, value, messages).await;
                if errors.is_empty() {
                    continue;
                }
                if rule.warning_only {
                    report.warnings.extend(errors);
                } else {
                    report.errors.extend(errors);
                    break;
                }
            }
        }
        ValidateFirst::Parallel => {
            let mut pending: Vec<BoxFuture<'_, (usize, Vec<String>)>> = rules
                .iter()
                .enumerate()
                .map(|(index, rule)| {
                    let fut: BoxFuture<'_, (usize, Vec<String>)> = Box::pin(async move {
                        (index, execute_rule(name, rule, value, messages).await)
                    });
                    fut
                })
                .collect();

            while !pending.is_empty() {
                let ((index, errors), _, remaining) = select_all(pending).await;
                pending = remaining;
                if errors.is_empty() {
                    continue;
                }
                if rules[index].warning_only {
                    report.warnings.extend(errors);
                } else {
                    // First failing rule settles the pipeline; still-pending
                    // rules are dropped.
                    report.errors.extend(errors);
                    break;
                }
            }
        }
        ValidateFirst::Off => {
            let outcomes = join_all(
                rules
                    .iter()
                    .map(|rule| execute_rule(name, rule, value, messages)),
            )
            .await;
            for (rule, errors) in rules.iter().zip(outcomes) {
                if rule.warning_only {
                    report.warnings.extend(errors);
                } else {
                    report.errors.extend(errors);
                }
            }
        }
    }

    report
}
