//! Prefix-scoped projection of the engine.
//!
//! A sub-tree of the form behaving as its own top-level form: incoming
//! paths gain the prefix before delegating, outgoing values and names are
//! projected back. The adapter holds no state beyond the engine handle and
//! the prefix.

use crate::engine::MetaFilter;
use crate::{FieldError, FormApi, FormEngine, ValidateFailure, ValidateOptions};
use async_trait::async_trait;
use formcore_store::{get, set};
use formcore_types::{FieldData, NamePath};
use serde_json::Value;

/// A read/write view of the engine rooted at a name-path prefix.
#[derive(Clone)]
pub struct ScopedForm {
    engine: FormEngine,
    prefix: NamePath,
}

impl ScopedForm {
    /// Creates a view of `engine` rooted at `prefix`.
    #[must_use]
    pub fn new(engine: FormEngine, prefix: NamePath) -> Self {
        Self { engine, prefix }
    }

    /// The view's prefix.
    #[must_use]
    pub fn prefix(&self) -> &NamePath {
        &self.prefix
    }

    fn prefixed(&self, path: &NamePath) -> NamePath {
        self.prefix.concat(path)
    }

    fn prefixed_all(&self, paths: &[NamePath]) -> Vec<NamePath> {
        paths.iter().map(|path| self.prefixed(path)).collect()
    }

    /// Projects a full-tree value down to this scope.
    fn project(&self, values: &Value) -> Value {
        get(values, &self.prefix)
            .cloned()
            .unwrap_or(Value::Object(serde_json::Map::new()))
    }

    fn project_name(&self, name: NamePath) -> NamePath {
        name.strip_prefix(&self.prefix).unwrap_or(name)
    }

    fn project_field_error(&self, field: FieldError) -> FieldError {
        let FieldError {
            name,
            errors,
            warnings,
        } = field;
        FieldError {
            name: self.project_name(name),
            errors,
            warnings,
        }
    }

    fn project_failure(&self, failure: ValidateFailure) -> ValidateFailure {
        ValidateFailure {
            values: self.project(&failure.values),
            error_fields: failure
                .error_fields
                .into_iter()
                .map(|field| self.project_field_error(field))
                .collect(),
            out_of_date: failure.out_of_date,
        }
    }
}

#[async_trait]
impl FormApi for ScopedForm {
    fn get_field_value(&self, path: &NamePath) -> Option<Value> {
        self.engine.get_field_value(&self.prefixed(path))
    }

    fn get_fields_value(&self, paths: Option<&[NamePath]>, filter: Option<&MetaFilter>) -> Value {
        let values = match paths {
            None => self.engine.get_fields_value(None, filter),
            Some(list) => self
                .engine
                .get_fields_value(Some(&self.prefixed_all(list)), filter),
        };
        self.project(&values)
    }

    fn get_fields_value_all(&self) -> Value {
        self.project(&self.engine.get_fields_value_all())
    }

    fn get_field_error(&self, path: &NamePath) -> Vec<String> {
        self.engine.get_field_error(&self.prefixed(path))
    }

    fn get_field_warning(&self, path: &NamePath) -> Vec<String> {
        self.engine.get_field_warning(&self.prefixed(path))
    }

    fn get_fields_error(&self, paths: Option<&[NamePath]>) -> Vec<FieldError> {
        let errors = match paths {
            None => self.engine.get_fields_error(None),
            Some(list) => self.engine.get_fields_error(Some(&self.prefixed_all(list))),
        };
        errors
            .into_iter()
            .map(|field| self.project_field_error(field))
            .collect()
    }

    fn is_field_touched(&self, path: &NamePath) -> bool {
        self.engine.is_field_touched(&self.prefixed(path))
    }

    fn is_fields_touched(&self, paths: Option<&[NamePath]>, all_touched: bool) -> bool {
        match paths {
            None => self
                .engine
                .is_fields_touched(Some(std::slice::from_ref(&self.prefix)), all_touched),
            Some(list) => self
                .engine
                .is_fields_touched(Some(&self.prefixed_all(list)), all_touched),
        }
    }

    fn is_field_validating(&self, path: &NamePath) -> bool {
        self.engine.is_field_validating(&self.prefixed(path))
    }

    fn reset_fields(&self, paths: Option<&[NamePath]>) {
        match paths {
            None => self
                .engine
                .reset_fields(Some(std::slice::from_ref(&self.prefix))),
            Some(list) => self.engine.reset_fields(Some(&self.prefixed_all(list))),
        }
    }

    fn set_fields(&self, fields: Vec<FieldData>) {
        let fields = fields
            .into_iter()
            .map(|data| FieldData {
                name: self.prefixed(&data.name),
                ..data
            })
            .collect();
        self.engine.set_fields(fields);
    }

    fn set_field_value(&self, path: &NamePath, value: Value) {
        self.engine.set_field_value(&self.prefixed(path), value);
    }

    fn set_fields_value(&self, values: Value) {
        let wrapped = set(
            &Value::Object(serde_json::Map::new()),
            &self.prefix,
            values,
        );
        self.engine.set_fields_value(wrapped);
    }

    async fn validate_fields(
        &self,
        paths: Option<&[NamePath]>,
        options: ValidateOptions,
    ) -> Result<Value, ValidateFailure> {
        let result = match paths {
            // No explicit paths: the whole scope, descendants included.
            None => {
                let scope = [self.prefix.clone()];
                self.engine
                    .validate_fields(
                        Some(&scope),
                        ValidateOptions {
                            recursive: true,
                            ..options
                        },
                    )
                    .await
            }
            Some(list) => {
                self.engine
                    .validate_fields(Some(&self.prefixed_all(list)), options)
                    .await
            }
        };

        match result {
            Ok(values) => Ok(self.project(&values)),
            Err(failure) => Err(self.project_failure(failure)),
        }
    }

    fn submit(&self) {
        self.engine.submit();
    }
}
