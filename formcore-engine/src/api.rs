//! The public form surface as a trait, plus the null object.
//!
//! [`FormApi`] is implemented by the real engine, by scoped views, and by
//! [`NullForm`] — the explicit "no form found" instance injected wherever
//! no real engine is supplied. Every `NullForm` method logs a warning and
//! returns an empty default; nothing panics.

use crate::engine::MetaFilter;
use crate::{FieldError, FormEngine, ValidateFailure, ValidateOptions};
use async_trait::async_trait;
use formcore_types::{FieldData, NamePath};
use serde_json::Value;
use tracing::warn;

/// The form instance contract exposed to the rendering layer.
#[async_trait]
pub trait FormApi: Send + Sync {
    /// Reads the value at `path`.
    fn get_field_value(&self, path: &NamePath) -> Option<Value>;

    /// Builds a restricted value document (see
    /// [`FormEngine::get_fields_value`]).
    fn get_fields_value(&self, paths: Option<&[NamePath]>, filter: Option<&MetaFilter>) -> Value;

    /// The raw store document.
    fn get_fields_value_all(&self) -> Value;

    /// Blocking errors at `path`.
    fn get_field_error(&self, path: &NamePath) -> Vec<String>;

    /// Warnings at `path`.
    fn get_field_warning(&self, path: &NamePath) -> Vec<String>;

    /// Error state for the given paths, or for every registered field.
    fn get_fields_error(&self, paths: Option<&[NamePath]>) -> Vec<FieldError>;

    /// True when the field at `path` has been interacted with.
    fn is_field_touched(&self, path: &NamePath) -> bool;

    /// Touched state over namespaces.
    fn is_fields_touched(&self, paths: Option<&[NamePath]>, all_touched: bool) -> bool;

    /// True while the field at `path` is validating.
    fn is_field_validating(&self, path: &NamePath) -> bool;

    /// Resets paths (or everything) to initial values.
    fn reset_fields(&self, paths: Option<&[NamePath]>);

    /// Applies direct field patches.
    fn set_fields(&self, fields: Vec<FieldData>);

    /// Writes one value (external source).
    fn set_field_value(&self, path: &NamePath, value: Value);

    /// Deep-merges a partial value tree (external source).
    fn set_fields_value(&self, values: Value);

    /// Validates paths (or everything); resolves with the filtered values.
    async fn validate_fields(
        &self,
        paths: Option<&[NamePath]>,
        options: ValidateOptions,
    ) -> Result<Value, ValidateFailure>;

    /// Validates everything and fires the finish callbacks.
    fn submit(&self);
}

#[async_trait]
impl FormApi for FormEngine {
    fn get_field_value(&self, path: &NamePath) -> Option<Value> {
        FormEngine::get_field_value(self, path)
    }

    fn get_fields_value(&self, paths: Option<&[NamePath]>, filter: Option<&MetaFilter>) -> Value {
        FormEngine::get_fields_value(self, paths, filter)
    }

    fn get_fields_value_all(&self) -> Value {
        FormEngine::get_fields_value_all(self)
    }

    fn get_field_error(&self, path: &NamePath) -> Vec<String> {
        FormEngine::get_field_error(self, path)
    }

    fn get_field_warning(&self, path: &NamePath) -> Vec<String> {
        FormEngine::get_field_warning(self, path)
    }

    fn get_fields_error(&self, paths: Option<&[NamePath]>) -> Vec<FieldError> {
        FormEngine::get_fields_error(self, paths)
    }

    fn is_field_touched(&self, path: &NamePath) -> bool {
        FormEngine::is_field_touched(self, path)
    }

    fn is_fields_touched(&self, paths: Option<&[NamePath]>, all_touched: bool) -> bool {
        FormEngine::is_fields_touched(self, paths, all_touched)
    }

    fn is_field_validating(&self, path: &NamePath) -> bool {
        FormEngine::is_field_validating(self, path)
    }

    fn reset_fields(&self, paths: Option<&[NamePath]>) {
        FormEngine::reset_fields(self, paths);
    }

    fn set_fields(&self, fields: Vec<FieldData>) {
        FormEngine::set_fields(self, fields);
    }

    fn set_field_value(&self, path: &NamePath, value: Value) {
        FormEngine::set_field_value(self, path, value);
    }

    fn set_fields_value(&self, values: Value) {
        FormEngine::set_fields_value(self, values);
    }

    async fn validate_fields(
        &self,
        paths: Option<&[NamePath]>,
        options: ValidateOptions,
    ) -> Result<Value, ValidateFailure> {
        FormEngine::validate_fields(self, paths, options).await
    }

    fn submit(&self) {
        FormEngine::submit(self);
    }
}

/// The explicit null object: a form surface with no engine behind it.
///
/// Constructed once by the caller and injected where no real form is in
/// scope; a language-level global would hide the dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullForm;

impl NullForm {
    /// Creates the null form.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn complain(method: &str) {
        warn!("{method} called on a form instance with no engine attached; ignoring");
    }
}

#[async_trait]
impl FormApi for NullForm {
    fn get_field_value(&self, _path: &NamePath) -> Option<Value> {
        Self::complain("get_field_value");
        None
    }

    fn get_fields_value(&self, _paths: Option<&[NamePath]>, _filter: Option<&MetaFilter>) -> Value {
        Self::complain("get_fields_value");
        Value::Object(serde_json::Map::new())
    }

    fn get_fields_value_all(&self) -> Value {
        Self::complain("get_fields_value_all");
        Value::Object(serde_json::Map::new())
    }

    fn get_field_error(&self, _path: &NamePath) -> Vec<String> {
        Self::complain("get_field_error");
        Vec::new()
    }

    fn get_field_warning(&self, _path: &NamePath) -> Vec<String> {
        Self::complain("get_field_warning");
        Vec::new()
    }

    fn get_fields_error(&self, _paths: Option<&[NamePath]>) -> Vec<FieldError> {
        Self::complain("get_fields_error");
        Vec::new()
    }

    fn is_field_touched(&self, _path: &NamePath) -> bool {
        Self::complain("is_field_touched");
        false
    }

    fn is_fields_touched(&self, _paths: Option<&[NamePath]>, _all_touched: bool) -> bool {
        Self::complain("is_fields_touched");
        false
    }

    fn is_field_validating(&self, _path: &NamePath) -> bool {
        Self::complain("is_field_validating");
        false
    }

    fn reset_fields(&self, _paths: Option<&[NamePath]>) {
        Self::complain("reset_fields");
    }

    fn set_fields(&self, _fields: Vec<FieldData>) {
        Self::complain("set_fields");
    }

    fn set_field_value(&self, _path: &NamePath, _value: Value) {
        Self::complain("set_field_value");
    }

    fn set_fields_value(&self, _values: Value) {
        Self::complain("set_fields_value");
    }

    async fn validate_fields(
        &self,
        _paths: Option<&[NamePath]>,
        _options: ValidateOptions,
    ) -> Result<Value, ValidateFailure> {
        Self::complain("validate_fields");
        Ok(Value::Object(serde_json::Map::new()))
    }

    fn submit(&self) {
        Self::complain("submit");
    }
}
