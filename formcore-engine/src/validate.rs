//! Cross-field validation orchestration.
//!
//! `validate_fields` fans out to every candidate field's own rule pipeline,
//! waits for all of them, and reconciles the result against the newest
//! validation generation: a run that was superseded before settling is
//! tagged `out_of_date` and rejected as non-authoritative, mirroring the
//! cooperative-cancellation model — nothing is interrupted, stale results
//! are discarded after the fact.

use crate::engine::FormEngine;
use crate::field::{FormField, ValidateContext};
use crate::{FieldError, ValidateFailure};
use formcore_rules::{RuleReport, ValidateMessages};
use formcore_store::{clone_by_paths, get};
use formcore_types::{NamePath, NotifyInfo};
use futures::future::join_all;
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Options for `validate_fields`.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Restrict rules to those matching this trigger name.
    pub trigger: Option<String>,
    /// Also validate fields whose path is prefix-contained by a requested
    /// path (used by scoped views).
    pub recursive: bool,
}

impl ValidateOptions {
    /// Options with a trigger name.
    #[must_use]
    pub fn with_trigger(trigger: impl Into<String>) -> Self {
        Self {
            trigger: Some(trigger.into()),
            ..Self::default()
        }
    }

    /// Options with prefix-recursive candidate matching.
    #[must_use]
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            ..Self::default()
        }
    }
}

impl FormEngine {
    /// Validates the given paths, or every registered path-bearing field,
    /// and resolves with the (path-filtered) values on success.
    ///
    /// Fails with [`ValidateFailure`] when any candidate produced blocking
    /// errors, or when this run was superseded by a newer one before it
    /// settled (`out_of_date`).
    pub async fn validate_fields(
        &self,
        paths: Option<&[NamePath]>,
        options: ValidateOptions,
    ) -> Result<Value, ValidateFailure> {
        let generation = self
            .shared
            .validate_generation
            .fetch_add(1, Ordering::SeqCst)
            + 1;

        let (candidates, full_values, messages) =
            self.validation_snapshot(paths, options.recursive);

        let runs = candidates.into_iter().map(|(entity, name)| {
            let ctx = ValidateContext {
                value: get(&full_values, &name).cloned(),
                full_values: full_values.clone(),
                trigger: options.trigger.clone(),
                messages: messages.clone(),
                explicit: true,
            };
            async move {
                let report = entity.validate_rules(ctx).await;
                (name, report)
            }
        });
        let outcomes: Vec<(NamePath, RuleReport)> = join_all(runs).await;

        let out_of_date =
            self.shared.validate_generation.load(Ordering::SeqCst) != generation;

        let names: Vec<NamePath> = outcomes.iter().map(|(name, _)| name.clone()).collect();
        let current = self.get_fields_value_all();
        self.notify_observers(current.clone(), Some(names.clone()), NotifyInfo::ValidateFinish);
        self.fire_fields_change(&names);

        let error_fields: Vec<FieldError> = outcomes
            .into_iter()
            .filter(|(_, report)| report.has_errors())
            .map(|(name, report)| FieldError {
                name,
                errors: report.errors,
                warnings: report.warnings,
            })
            .collect();

        let values = match paths {
            None => current,
            Some(list) => clone_by_paths(&current, list),
        };

        if error_fields.is_empty() && !out_of_date {
            Ok(values)
        } else {
            if out_of_date {
                debug!(generation, "validation run superseded; result is out of date");
            }
            Err(ValidateFailure {
                values,
                error_fields,
                out_of_date,
            })
        }
    }

    /// Out-of-band validation of specific fields (input events, dependency
    /// cascades). Implicit runs honor per-field debounce; explicit ones
    /// bypass it. No whole-form generation is consumed; only
    /// `validate_fields` competes for authority.
    pub(crate) fn trigger_validation(
        &self,
        names: Vec<NamePath>,
        trigger: Option<String>,
        explicit: bool,
    ) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("no async runtime; skipping out-of-band validation");
            return;
        };
        let engine = self.clone();
        handle.spawn(async move {
            let (candidates, full_values, messages) =
                engine.validation_snapshot(Some(&names), false);
            let runs = candidates.into_iter().map(|(entity, name)| {
                let ctx = ValidateContext {
                    value: get(&full_values, &name).cloned(),
                    full_values: full_values.clone(),
                    trigger: trigger.clone(),
                    messages: messages.clone(),
                    explicit,
                };
                async move {
                    entity.validate_rules(ctx).await;
                }
            });
            join_all(runs).await;

            let current = engine.get_fields_value_all();
            engine.notify_observers(current, Some(names.clone()), NotifyInfo::ValidateFinish);
            engine.fire_fields_change(&names);
        });
    }

    #[allow(clippy::type_complexity)]
    fn validation_snapshot(
        &self,
        paths: Option<&[NamePath]>,
        recursive: bool,
    ) -> (
        Vec<(Arc<dyn FormField>, NamePath)>,
        Value,
        ValidateMessages,
    ) {
        let inner = self.read_inner();
        let full_values = inner.store.snapshot();
        let messages = ValidateMessages::defaults().merged(&inner.validate_messages);
        let candidates = inner
            .fields
            .iter()
            .filter_map(|field| {
                let name = field.entity.name_path();
                if name.is_empty() {
                    return None;
                }
                let selected = match paths {
                    None => true,
                    Some(list) => list
                        .iter()
                        .any(|path| name == *path || (recursive && name.starts_with(path))),
                };
                selected.then(|| (field.entity.clone(), name))
            })
            .collect();
        (candidates, full_values, messages)
    }
}
