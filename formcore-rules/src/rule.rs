//! Rule declarations.

use crate::Validator;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The expected value kind for a `type` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    String,
    Number,
    Integer,
    Float,
    Boolean,
    Array,
    Object,
    Email,
    Url,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Email => "email",
            Self::Url => "url",
        };
        write!(f, "{name}")
    }
}

/// How a field's rule list is executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidateFirst {
    /// All rules run concurrently; the result waits for every rule and
    /// concatenates all errors.
    #[default]
    Off,
    /// Rules run strictly in order; the first rule producing blocking
    /// errors stops the chain and later validators never run.
    Serial,
    /// All rules start concurrently; the pipeline settles with the first
    /// failing rule's errors, regardless of rules still pending.
    Parallel,
}

/// One validation constraint on a field.
///
/// Declarative members and the optional async [`Validator`] feed the same
/// outcome. When `message` is set, it replaces whatever this rule produced.
/// `warning_only` failures become warnings and never block submission.
#[derive(Clone, Default)]
pub struct Rule {
    /// The value must be present and non-empty.
    pub required: bool,
    /// The value must be of this kind.
    pub rule_type: Option<RuleType>,
    /// Strings must match this pattern.
    pub pattern: Option<Regex>,
    /// Lower bound: string length, numeric value, or array length.
    pub min: Option<f64>,
    /// Upper bound: string length, numeric value, or array length.
    pub max: Option<f64>,
    /// Exact measure: string length, numeric value, or array length.
    pub len: Option<f64>,
    /// The value must be one of these.
    pub enum_values: Vec<Value>,
    /// Whitespace-only strings count as empty.
    pub whitespace: bool,
    /// Replaces all of this rule's produced messages.
    pub message: Option<String>,
    /// Failures become warnings instead of blocking errors.
    pub warning_only: bool,
    /// Triggers this rule runs on; `None` falls back to the field default.
    pub validate_trigger: Option<Vec<String>>,
    /// Custom async constraint, run after the declarative checks pass.
    pub validator: Option<Arc<dyn Validator>>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("required", &self.required)
            .field("rule_type", &self.rule_type)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("min", &self.min)
            .field("max", &self.max)
            .field("len", &self.len)
            .field("enum_values", &self.enum_values)
            .field("whitespace", &self.whitespace)
            .field("message", &self.message)
            .field("warning_only", &self.warning_only)
            .field("validate_trigger", &self.validate_trigger)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl Rule {
    /// An empty rule (always passes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a required-value rule.
    #[must_use]
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// Shorthand for a type-constraint rule.
    #[must_use]
    pub fn typed(rule_type: RuleType) -> Self {
        Self {
            rule_type: Some(rule_type),
            ..Self::default()
        }
    }

    /// Shorthand for a lower-bound rule.
    #[must_use]
    pub fn min(min: f64) -> Self {
        Self {
            min: Some(min),
            ..Self::default()
        }
    }

    /// Shorthand for an upper-bound rule.
    #[must_use]
    pub fn max(max: f64) -> Self {
        Self {
            max: Some(max),
            ..Self::default()
        }
    }

    /// Shorthand for an exact-measure rule.
    #[must_use]
    pub fn len(len: f64) -> Self {
        Self {
            len: Some(len),
            ..Self::default()
        }
    }

    /// Shorthand for a pattern rule.
    #[must_use]
    pub fn pattern(pattern: Regex) -> Self {
        Self {
            pattern: Some(pattern),
            ..Self::default()
        }
    }

    /// Shorthand for an enum rule.
    #[must_use]
    pub fn enumeration(values: Vec<Value>) -> Self {
        Self {
            enum_values: values,
            ..Self::default()
        }
    }

    /// Shorthand for a custom-validator rule.
    #[must_use]
    pub fn with_validator(validator: Arc<dyn Validator>) -> Self {
        Self {
            validator: Some(validator),
            ..Self::default()
        }
    }

    /// Attaches a type constraint.
    #[must_use]
    pub fn and_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = Some(rule_type);
        self
    }

    /// Attaches a lower bound.
    #[must_use]
    pub fn and_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Attaches an upper bound.
    #[must_use]
    pub fn and_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Overrides every message this rule produces.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Demotes failures of this rule to warnings.
    #[must_use]
    pub fn warning_only(mut self) -> Self {
        self.warning_only = true;
        self
    }

    /// Restricts this rule to specific triggers.
    #[must_use]
    pub fn with_trigger(mut self, triggers: Vec<String>) -> Self {
        self.validate_trigger = Some(triggers);
        self
    }

    /// Attaches a custom validator.
    #[must_use]
    pub fn and_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// True when this rule runs for the given trigger.
    ///
    /// `trigger == None` (explicit validation) runs every rule. A rule
    /// without its own trigger list falls back to `field_triggers`; an
    /// empty fallback means "run on everything".
    #[must_use]
    pub fn runs_on(&self, trigger: Option<&str>, field_triggers: Option<&[String]>) -> bool {
        let Some(trigger) = trigger else {
            return true;
        };
        let effective = self
            .validate_trigger
            .as_deref()
            .or(field_triggers);
        match effective {
            Some(list) => list.iter().any(|t| t == trigger),
            None => true,
        }
    }
}

/// A rule list entry: either a literal rule or a function producing one
/// from the current value tree (for constraints that depend on other
/// fields, e.g. "matches the password field").
#[derive(Clone)]
pub enum RuleEntry {
    /// A literal rule.
    Literal(Rule),
    /// A rule computed from the full current values at validation time.
    Dynamic(Arc<dyn Fn(&Value) -> Rule + Send + Sync>),
}

impl RuleEntry {
    /// Resolves this entry against the current value tree.
    #[must_use]
    pub fn resolve(&self, full_values: &Value) -> Rule {
        match self {
            Self::Literal(rule) => rule.clone(),
            Self::Dynamic(build) => build(full_values),
        }
    }

    /// Creates a dynamic entry from a closure.
    pub fn dynamic(build: impl Fn(&Value) -> Rule + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(build))
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(rule) => f.debug_tuple("Literal").field(rule).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<Rule> for RuleEntry {
    fn from(rule: Rule) -> Self {
        Self::Literal(rule)
    }
}
