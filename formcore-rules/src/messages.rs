//! Validation message templates.
//!
//! A nested map of message templates with `${var}` placeholder substitution.
//! The engine carries the built-in defaults; per-form overrides merge over
//! them field by field (a `None` override keeps the default).

use serde::{Deserialize, Serialize};

/// Messages for pattern constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternMessages {
    /// The value does not match the declared pattern.
    pub mismatch: Option<String>,
}

/// Messages for `type` constraints, one per [`RuleType`](crate::RuleType).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeMessages {
    pub string: Option<String>,
    pub number: Option<String>,
    pub integer: Option<String>,
    pub float: Option<String>,
    pub boolean: Option<String>,
    pub array: Option<String>,
    pub object: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

/// Messages for `min`/`max`/`len` constraints of one value kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeMessages {
    /// Exact-measure violation.
    pub len: Option<String>,
    /// Lower-bound violation.
    pub min: Option<String>,
    /// Upper-bound violation.
    pub max: Option<String>,
    /// Both bounds declared and violated.
    pub range: Option<String>,
}

/// The full message template map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidateMessages {
    /// Fallback for anything without a more specific template.
    pub default: Option<String>,
    /// Required-value violation.
    pub required: Option<String>,
    /// Enum-membership violation.
    #[serde(rename = "enum")]
    pub enum_values: Option<String>,
    /// Whitespace-only string under the `whitespace` flag.
    pub whitespace: Option<String>,
    /// Pattern constraint messages.
    #[serde(default)]
    pub pattern: PatternMessages,
    /// Type constraint messages.
    #[serde(default)]
    pub types: TypeMessages,
    /// String-length constraint messages.
    #[serde(default)]
    pub string: RangeMessages,
    /// Numeric-value constraint messages.
    #[serde(default)]
    pub number: RangeMessages,
    /// Array-length constraint messages.
    #[serde(default)]
    pub array: RangeMessages,
}

impl ValidateMessages {
    /// The built-in default templates.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            default: Some("Validation error on field ${name}".into()),
            required: Some("${name} is required".into()),
            enum_values: Some("${name} must be one of [${enum}]".into()),
            whitespace: Some("${name} cannot be empty".into()),
            pattern: PatternMessages {
                mismatch: Some("${name} does not match pattern ${pattern}".into()),
            },
            types: TypeMessages {
                string: Some("${name} is not a valid ${type}".into()),
                number: Some("${name} is not a valid ${type}".into()),
                integer: Some("${name} is not a valid ${type}".into()),
                float: Some("${name} is not a valid ${type}".into()),
                boolean: Some("${name} is not a valid ${type}".into()),
                array: Some("${name} is not a valid ${type}".into()),
                object: Some("${name} is not a valid ${type}".into()),
                email: Some("${name} is not a valid ${type}".into()),
                url: Some("${name} is not a valid ${type}".into()),
            },
            string: RangeMessages {
                len: Some("${name} must be exactly ${len} characters".into()),
                min: Some("${name} must be at least ${min} characters".into()),
                max: Some("${name} cannot be longer than ${max} characters".into()),
                range: Some("${name} must be between ${min} and ${max} characters".into()),
            },
            number: RangeMessages {
                len: Some("${name} must equal ${len}".into()),
                min: Some("${name} cannot be less than ${min}".into()),
                max: Some("${name} cannot be greater than ${max}".into()),
                range: Some("${name} must be between ${min} and ${max}".into()),
            },
            array: RangeMessages {
                len: Some("${name} must be exactly ${len} in length".into()),
                min: Some("${name} cannot be less than ${min} in length".into()),
                max: Some("${name} cannot be greater than ${max} in length".into()),
                range: Some("${name} must be between ${min} and ${max} in length".into()),
            },
        }
    }

    /// Merges `overrides` over `self`: a `Some` override wins, a `None`
    /// keeps the existing template.
    #[must_use]
    pub fn merged(&self, overrides: &ValidateMessages) -> Self {
        fn pick(base: &Option<String>, over: &Option<String>) -> Option<String> {
            over.clone().or_else(|| base.clone())
        }
        fn pick_range(base: &RangeMessages, over: &RangeMessages) -> RangeMessages {
            RangeMessages {
                len: pick(&base.len, &over.len),
                min: pick(&base.min, &over.min),
                max: pick(&base.max, &over.max),
                range: pick(&base.range, &over.range),
            }
        }

        Self {
            default: pick(&self.default, &overrides.default),
            required: pick(&self.required, &overrides.required),
            enum_values: pick(&self.enum_values, &overrides.enum_values),
            whitespace: pick(&self.whitespace, &overrides.whitespace),
            pattern: PatternMessages {
                mismatch: pick(&self.pattern.mismatch, &overrides.pattern.mismatch),
            },
            types: TypeMessages {
                string: pick(&self.types.string, &overrides.types.string),
                number: pick(&self.types.number, &overrides.types.number),
                integer: pick(&self.types.integer, &overrides.types.integer),
                float: pick(&self.types.float, &overrides.types.float),
                boolean: pick(&self.types.boolean, &overrides.types.boolean),
                array: pick(&self.types.array, &overrides.types.array),
                object: pick(&self.types.object, &overrides.types.object),
                email: pick(&self.types.email, &overrides.types.email),
                url: pick(&self.types.url, &overrides.types.url),
            },
            string: pick_range(&self.string, &overrides.string),
            number: pick_range(&self.number, &overrides.number),
            array: pick_range(&self.array, &overrides.array),
        }
    }
}

/// Substitutes `${key}` placeholders in a template.
///
/// Unknown placeholders are left in place so a half-configured template is
/// visible rather than silently blank.
#[must_use]
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("${{{key}}}"), value);
    }
    out
}
