//! Validation failure types.

use formcore_types::NamePath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One field's error state, as reported by `get_fields_error` and carried
/// in a [`ValidateFailure`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// The field's name path.
    pub name: NamePath,
    /// Blocking errors.
    pub errors: Vec<String>,
    /// Non-blocking warnings.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// The rejection payload of `validate_fields`.
///
/// `out_of_date` marks a run that was superseded by a later validation
/// before it settled; its result must not be treated as authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidateFailure {
    /// The (path-filtered) values at settlement time.
    pub values: Value,
    /// Fields that produced blocking errors.
    pub error_fields: Vec<FieldError>,
    /// The run was superseded by a later validation.
    pub out_of_date: bool,
}

impl fmt::Display for ValidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation failed for {} field(s)",
            self.error_fields.len()
        )?;
        if self.out_of_date {
            write!(f, " (out of date)")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidateFailure {}
