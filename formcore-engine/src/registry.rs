//! Field registration lifecycle.
//!
//! Registration seeds field-level initial values (deferring to form-level
//! values on conflict, with a warning). Unregistration is two-phase: the
//! entity leaves the live list immediately and a cleanup mark is queued;
//! the sweep runs at the end of the current update batch so that a pair of
//! fields swapping one path within a single batch is judged against the
//! final registry state.

use crate::engine::FormEngine;
use crate::field::FormField;
use formcore_store::{get, remove, set};
use formcore_types::{FieldId, NamePath, NotifyInfo, ValueSource};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

pub(crate) struct RegisteredField {
    pub(crate) id: FieldId,
    pub(crate) entity: Arc<dyn FormField>,
}

/// What `unregister_field` was told about the departing entity.
#[derive(Debug, Clone, Default)]
pub struct UnregisterOptions {
    /// The entity was a list row (or list container).
    pub is_list_field: bool,
    /// Field-level preserve override captured at unmount.
    pub preserve: Option<bool>,
    /// The entity's path as seen from its list, when nested.
    pub sub_name_path: Option<NamePath>,
}

/// A deferred cleanup decision, swept at batch end.
#[derive(Debug, Clone)]
pub(crate) struct CleanupMark {
    pub(crate) name_path: NamePath,
    pub(crate) is_list_field: bool,
    pub(crate) preserve: Option<bool>,
    pub(crate) sub_name_path: Option<NamePath>,
}

impl FormEngine {
    /// Registers a field entity and seeds its initial value.
    pub(crate) fn register_field_entity(&self, entity: Arc<dyn FormField>) -> FieldId {
        let id = FieldId::new();
        let name = entity.name_path();
        let initial_value = entity.props().initial_value.clone();

        let seeded_prev = {
            let mut inner = self.write_inner();
            inner.fields.push(RegisteredField {
                id,
                entity: entity.clone(),
            });

            match initial_value {
                Some(value) if !name.is_empty() && inner.store.get(&name).is_none() => {
                    if get(&inner.initial_values, &name).is_some() {
                        warn!(
                            field = %name,
                            "field-level initial value conflicts with form-level initialValues; form-level wins"
                        );
                        None
                    } else {
                        let prev = inner.store.snapshot();
                        inner.store.set(&name, value);
                        Some(prev)
                    }
                }
                _ => None,
            }
        };

        if let Some(prev) = seeded_prev {
            self.notify_observers(
                prev,
                Some(vec![name.clone()]),
                NotifyInfo::ValueUpdate {
                    source: ValueSource::Internal,
                },
            );
            self.notify_watch(vec![name]);
        }

        id
    }

    /// Removes the entity from the live list and marks it for cleanup.
    ///
    /// Outside a batch the mark is swept immediately (a one-call batch).
    pub(crate) fn unregister_field_entity(&self, id: FieldId, options: UnregisterOptions) {
        let mark = {
            let mut inner = self.write_inner();
            let Some(position) = inner.fields.iter().position(|field| field.id == id) else {
                warn!(%id, "unregister of unknown field id ignored");
                return;
            };
            let field = inner.fields.remove(position);
            let mark = CleanupMark {
                name_path: field.entity.name_path(),
                is_list_field: options.is_list_field,
                preserve: options.preserve,
                sub_name_path: options.sub_name_path,
            };
            if inner.batch_depth > 0 {
                inner.pending_cleanup.push(mark);
                None
            } else {
                Some(mark)
            }
        };

        if let Some(mark) = mark {
            self.sweep_cleanup(mark);
        }
    }

    /// Applies one cleanup decision against the post-batch registry state.
    pub(crate) fn sweep_cleanup(&self, mark: CleanupMark) {
        if mark.name_path.is_empty() {
            return;
        }

        let swept = {
            let mut inner = self.write_inner();

            let effective_preserve = mark
                .preserve
                .or(inner.preserve_default)
                .unwrap_or(true);
            if effective_preserve {
                return;
            }
            // A bare top-level list row keeps its slot; only nested list
            // entities reset it.
            if mark.is_list_field
                && mark
                    .sub_name_path
                    .as_ref()
                    .is_none_or(|sub| sub.len() <= 1)
            {
                return;
            }
            // Another live entity still occupies the path (the swap case).
            if inner
                .fields
                .iter()
                .any(|field| field.entity.name_path() == mark.name_path)
            {
                return;
            }

            // List items reset to absent, never to a default value.
            let default_value = if mark.is_list_field {
                None
            } else {
                get(&inner.initial_values, &mark.name_path).cloned()
            };

            if inner.store.get(&mark.name_path).cloned() == default_value {
                return;
            }

            let prev = inner.store.snapshot();
            let next = match default_value {
                Some(value) => set(&prev, &mark.name_path, value),
                None => remove(&prev, &mark.name_path),
            };
            inner.store.replace_root(next);
            prev
        };

        self.notify_observers(
            swept.clone(),
            Some(vec![mark.name_path.clone()]),
            NotifyInfo::Remove,
        );
        self.trigger_dependencies_update(&swept, &mark.name_path);
        self.notify_watch(vec![mark.name_path]);
    }

    /// Seeds field-level initial values into the store for every live
    /// entity (optionally restricted to `scope` paths): only where the
    /// store has no value yet, and only when no form-level initial value
    /// claims the same path.
    pub(crate) fn seed_field_initial_values(&self, scope: Option<&[NamePath]>) {
        let mut inner = self.write_inner();

        let seeds: Vec<(NamePath, Value)> = inner
            .fields
            .iter()
            .filter_map(|field| {
                let name = field.entity.name_path();
                let value = field.entity.props().initial_value.clone()?;
                if name.is_empty() {
                    return None;
                }
                if let Some(scope) = scope {
                    if !scope.iter().any(|path| name.starts_with(path)) {
                        return None;
                    }
                }
                Some((name, value))
            })
            .collect();

        for (name, value) in seeds {
            if inner.store.get(&name).is_some() {
                continue;
            }
            if get(&inner.initial_values, &name).is_some() {
                warn!(
                    field = %name,
                    "field-level initial value conflicts with form-level initialValues; form-level wins"
                );
                continue;
            }
            inner.store.set(&name, value);
        }
    }
}
