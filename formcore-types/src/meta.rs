//! Field metadata and patch payloads.

use crate::NamePath;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A snapshot of one field's runtime state, as exposed to the rendering
/// layer and to `get_fields_value` filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// The field's declared name path.
    pub name: NamePath,
    /// The user has interacted with the field since mount or last reset.
    pub touched: bool,
    /// A validation run is currently in flight for this field.
    pub validating: bool,
    /// At least one validation run has settled since mount or last reset.
    pub validated: bool,
    /// Blocking errors from the last settled validation.
    pub errors: Vec<String>,
    /// Non-blocking warnings from the last settled validation.
    pub warnings: Vec<String>,
}

impl FieldMeta {
    /// Creates empty metadata for a field at `name`.
    #[must_use]
    pub fn new(name: NamePath) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }
}

/// A partial field patch, as accepted by `set_fields`.
///
/// Absent members leave the corresponding state untouched; present members
/// overwrite it. `value` writes through to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    /// The field to patch.
    pub name: NamePath,
    /// New store value at the field's path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// New touched state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touched: Option<bool>,
    /// New validating state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validating: Option<bool>,
    /// New error list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// New warning list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl FieldData {
    /// Creates an empty patch for the field at `name`.
    #[must_use]
    pub fn new(name: impl Into<NamePath>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the store value.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the touched state.
    #[must_use]
    pub fn with_touched(mut self, touched: bool) -> Self {
        self.touched = Some(touched);
        self
    }

    /// Sets the validating state.
    #[must_use]
    pub fn with_validating(mut self, validating: bool) -> Self {
        self.validating = Some(validating);
        self
    }

    /// Sets the error list.
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Sets the warning list.
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = Some(warnings);
        self
    }
}
