//! Form-level callbacks, set through the internal hooks.

use crate::ValidateFailure;
use formcore_types::FieldMeta;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Fired after an internal value update: `(changed_values, all_values)`.
pub type ValuesChangeCallback = Arc<dyn Fn(&Value, &Value) + Send + Sync>;

/// Fired when field metadata changes: `(changed_metas, all_metas)`.
pub type FieldsChangeCallback = Arc<dyn Fn(&[FieldMeta], &[FieldMeta]) + Send + Sync>;

/// Fired by `submit` on successful validation. An error return is logged,
/// never propagated: a failing finish handler must not crash the engine.
pub type FinishCallback = Arc<dyn Fn(Value) -> anyhow::Result<()> + Send + Sync>;

/// Fired by `submit` when validation fails.
pub type FinishFailedCallback = Arc<dyn Fn(ValidateFailure) + Send + Sync>;

/// The rendering layer's callback bundle.
#[derive(Clone, Default)]
pub struct FormCallbacks {
    pub on_values_change: Option<ValuesChangeCallback>,
    pub on_fields_change: Option<FieldsChangeCallback>,
    pub on_finish: Option<FinishCallback>,
    pub on_finish_failed: Option<FinishFailedCallback>,
}

impl fmt::Debug for FormCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormCallbacks")
            .field("on_values_change", &self.on_values_change.is_some())
            .field("on_fields_change", &self.on_fields_change.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .field("on_finish_failed", &self.on_finish_failed.is_some())
            .finish()
    }
}
