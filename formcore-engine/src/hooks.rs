//! The gated internal-hooks surface.
//!
//! The rendering glue needs registration, dispatch, and configuration
//! entry points that the public surface must not expose. The gate is the
//! well-known mark string: any other mark logs a warning and gets `None`
//! back — never a panic.

use crate::callbacks::FormCallbacks;
use crate::engine::FormEngine;
use crate::field::FormField;
use crate::registry::UnregisterOptions;
use crate::watch::WatchCallback;
use formcore_rules::ValidateMessages;
use formcore_types::{FieldId, FieldMeta, NamePath, WatchId};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// The mark that unlocks [`FormEngine::internal_hooks`].
pub const HOOK_MARK: &str = "FORMCORE_INTERNAL_HOOKS";

/// An internal-source action dispatched by the rendering glue.
#[derive(Debug, Clone)]
pub enum Action {
    /// A field's input event produced a new value.
    UpdateValue {
        /// The field's path.
        name: NamePath,
        /// The new value.
        value: Value,
    },
    /// A field event asks for validation under a trigger name.
    ValidateField {
        /// The field paths to validate.
        names: Vec<NamePath>,
        /// The firing trigger (e.g. `"onChange"`).
        trigger: Option<String>,
    },
}

/// The internal surface handed to the rendering glue.
pub struct InternalHooks {
    engine: FormEngine,
}

impl FormEngine {
    /// Unlocks the internal hooks with the well-known mark.
    ///
    /// Any other mark returns `None` and logs a warning; external callers
    /// have no business here.
    #[must_use]
    pub fn internal_hooks(&self, mark: &str) -> Option<InternalHooks> {
        if mark == HOOK_MARK {
            Some(InternalHooks {
                engine: self.clone(),
            })
        } else {
            warn!("internal_hooks called without the internal mark; returning None");
            None
        }
    }
}

impl InternalHooks {
    /// Dispatches an internal-source action.
    pub fn dispatch(&self, action: Action) {
        match action {
            Action::UpdateValue { name, value } => {
                self.engine.update_value(&name, value);
            }
            Action::ValidateField { names, trigger } => {
                // implicit: debounce applies
                self.engine.trigger_validation(names, trigger, false);
            }
        }
    }

    /// Registers a field entity; returns the id used to unregister.
    pub fn register_field(&self, entity: Arc<dyn FormField>) -> FieldId {
        self.engine.register_field_entity(entity)
    }

    /// Unregisters a field entity.
    pub fn unregister_field(&self, id: FieldId, options: UnregisterOptions) {
        self.engine.unregister_field_entity(id, options);
    }

    /// Registers a watch callback.
    pub fn register_watch(
        &self,
        callback: impl Fn(&Value, &Value, &[NamePath]) + Send + Sync + 'static,
    ) -> WatchId {
        let callback: WatchCallback = Arc::new(callback);
        self.engine.register_watch(callback)
    }

    /// Unregisters a watch callback.
    pub fn unregister_watch(&self, id: WatchId) {
        self.engine.unregister_watch(id);
    }

    /// Sets the form-level initial values; with `init` the store is
    /// initialized from them (existing values win).
    pub fn set_initial_values(&self, values: Value, init: bool) {
        self.engine.set_initial_values(values, init);
    }

    /// Reads a form-level initial value.
    #[must_use]
    pub fn get_initial_value(&self, path: &NamePath) -> Option<Value> {
        self.engine.get_initial_value(path)
    }

    /// Installs the form callbacks.
    pub fn set_callbacks(&self, callbacks: FormCallbacks) {
        self.engine.set_callbacks(callbacks);
    }

    /// Installs per-form validation message overrides.
    pub fn set_validate_messages(&self, messages: ValidateMessages) {
        self.engine.set_validate_messages(messages);
    }

    /// Sets the form-level preserve default.
    pub fn set_preserve(&self, preserve: Option<bool>) {
        self.engine.set_preserve(preserve);
    }

    /// Toggles subscribable mode. Off means the engine is driven by an
    /// externally supplied field list and notifies via the whole-tree
    /// signal only.
    pub fn set_subscribable(&self, subscribable: bool) {
        self.engine.set_subscribable(subscribable);
    }

    /// Metadata snapshots of every registered, path-bearing field.
    #[must_use]
    pub fn get_fields_meta(&self) -> Vec<FieldMeta> {
        self.engine
            .entities()
            .iter()
            .filter(|entity| !entity.name_path().is_empty())
            .map(|entity| entity.meta())
            .collect()
    }

    /// Tears the form down; with `clear_on_destroy` the store is emptied,
    /// otherwise only non-preserved values are dropped.
    pub fn destroy_form(&self, clear_on_destroy: bool) {
        self.engine.destroy_form(clear_on_destroy);
    }
}
