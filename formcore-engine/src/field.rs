//! Field entities.
//!
//! A field is the engine's unit of registration: a declared name path, a
//! rule list, dependencies, and mutable runtime metadata. Fields are
//! polymorphic only in how they decide to re-render, so the seam is a
//! single capability trait ([`FormField`]) with one concrete
//! implementation ([`Field`]) — not a hierarchy.

use async_trait::async_trait;
use formcore_rules::{run_rules, Rule, RuleEntry, RuleReport, ValidateFirst, ValidateMessages};
use formcore_store::get;
use formcore_types::{paths_contain, FieldMeta, NamePath, NotifyInfo, StoreChange};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Custom re-render predicate over `(prev_values, next_values)`.
pub type UpdatePredicate = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Hook invoked whenever the field decides it needs to re-render; this is
/// where the rendering layer plugs in.
pub type RenderHook = Arc<dyn Fn(&StoreChange) + Send + Sync>;

/// A field's declared, immutable properties.
#[derive(Clone, Default)]
pub struct FieldProps {
    /// Name path; empty means "no value of its own, observes everything".
    pub name: NamePath,
    /// Ordered rule list.
    pub rules: Vec<RuleEntry>,
    /// Paths whose change forces this field to re-validate and re-render
    /// even without its own value changing.
    pub dependencies: Vec<NamePath>,
    /// Keep the value on unregister; `None` defers to the form default.
    pub preserve: Option<bool>,
    /// Field-level initial value, seeded on registration.
    pub initial_value: Option<Value>,
    /// Default triggers for rules without their own trigger list.
    pub validate_trigger: Option<Vec<String>>,
    /// Rule pipeline mode.
    pub validate_first: ValidateFirst,
    /// Debounce for validation triggered by live input events.
    pub validate_debounce: Option<Duration>,
    /// This entity is a list container (or bare list row).
    pub is_list_field: bool,
    /// Custom re-render predicate.
    pub should_update: Option<UpdatePredicate>,
}

impl fmt::Debug for FieldProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldProps")
            .field("name", &self.name)
            .field("rules", &self.rules.len())
            .field("dependencies", &self.dependencies)
            .field("preserve", &self.preserve)
            .field("initial_value", &self.initial_value)
            .field("validate_trigger", &self.validate_trigger)
            .field("validate_first", &self.validate_first)
            .field("validate_debounce", &self.validate_debounce)
            .field("is_list_field", &self.is_list_field)
            .field("should_update", &self.should_update.is_some())
            .finish()
    }
}

impl FieldProps {
    /// Props for a plain field at `name`.
    #[must_use]
    pub fn new(name: NamePath) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule(mut self, rule: impl Into<RuleEntry>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Declares dependencies.
    #[must_use]
    pub fn dependencies(mut self, dependencies: Vec<NamePath>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Sets the preserve override.
    #[must_use]
    pub fn preserve(mut self, preserve: bool) -> Self {
        self.preserve = Some(preserve);
        self
    }

    /// Sets the field-level initial value.
    #[must_use]
    pub fn initial_value(mut self, value: Value) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Sets the field default triggers.
    #[must_use]
    pub fn validate_trigger(mut self, triggers: Vec<String>) -> Self {
        self.validate_trigger = Some(triggers);
        self
    }

    /// Sets the rule pipeline mode.
    #[must_use]
    pub fn validate_first(mut self, mode: ValidateFirst) -> Self {
        self.validate_first = mode;
        self
    }

    /// Sets the input-event validation debounce.
    #[must_use]
    pub fn validate_debounce(mut self, debounce: Duration) -> Self {
        self.validate_debounce = Some(debounce);
        self
    }

    /// Marks this entity as a list container.
    #[must_use]
    pub fn list_field(mut self) -> Self {
        self.is_list_field = true;
        self
    }

    /// Sets a custom re-render predicate.
    #[must_use]
    pub fn should_update(mut self, predicate: UpdatePredicate) -> Self {
        self.should_update = Some(predicate);
        self
    }
}

/// Everything a field needs to run its rules once.
#[derive(Clone)]
pub struct ValidateContext {
    /// The field's current value.
    pub value: Option<Value>,
    /// The full current value tree (for dynamic rules).
    pub full_values: Value,
    /// The firing trigger; `None` runs every rule.
    pub trigger: Option<String>,
    /// The merged message templates.
    pub messages: ValidateMessages,
    /// Explicit runs (`validate_fields`, submit) bypass debounce.
    pub explicit: bool,
}

/// The field entity contract consumed by the engine.
#[async_trait]
pub trait FormField: Send + Sync {
    /// The field's declared name path.
    fn name_path(&self) -> NamePath;

    /// The field's declared props.
    fn props(&self) -> &FieldProps;

    /// A snapshot of the field's runtime metadata.
    fn meta(&self) -> FieldMeta;

    /// Delivered synchronously for every store mutation.
    fn on_store_change(&self, change: &StoreChange);

    /// Runs this field's rules under `ctx` and records the outcome in the
    /// field's metadata (unless superseded by a newer run).
    async fn validate_rules(&self, ctx: ValidateContext) -> RuleReport;

    /// Marks the field as interacted-with.
    fn set_touched(&self, touched: bool);

    /// True when the user has interacted with the field.
    fn is_touched(&self) -> bool {
        self.meta().touched
    }

    /// True while a validation run is in flight.
    fn is_validating(&self) -> bool {
        self.meta().validating
    }
}

#[derive(Debug, Default)]
struct FieldRuntime {
    touched: bool,
    validating: bool,
    validated: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// The concrete field implementation.
///
/// Runtime metadata lives behind a mutex; the render hook and counter are
/// how the rendering layer (and tests) observe re-render decisions.
pub struct Field {
    props: FieldProps,
    runtime: Mutex<FieldRuntime>,
    /// Supersession counter for debounced/overlapping validation runs.
    validate_seq: AtomicU64,
    render_count: AtomicU64,
    on_render: Option<RenderHook>,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("props", &self.props)
            .field("render_count", &self.render_count.load(Ordering::SeqCst))
            .finish()
    }
}

impl Field {
    /// Creates a field from its props.
    #[must_use]
    pub fn new(props: FieldProps) -> Self {
        Self {
            props,
            runtime: Mutex::new(FieldRuntime::default()),
            validate_seq: AtomicU64::new(0),
            render_count: AtomicU64::new(0),
            on_render: None,
        }
    }

    /// Creates a field with a render hook.
    #[must_use]
    pub fn with_render_hook(props: FieldProps, hook: RenderHook) -> Self {
        Self {
            on_render: Some(hook),
            ..Self::new(props)
        }
    }

    /// How many times this field decided to re-render.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.render_count.load(Ordering::SeqCst)
    }

    fn rerender(&self, change: &StoreChange) {
        self.render_count.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = &self.on_render {
            hook(change);
        }
    }

    fn lock_runtime(&self) -> std::sync::MutexGuard<'_, FieldRuntime> {
        self.runtime.lock().expect("field runtime lock poisoned")
    }

    fn should_update_fires(&self, change: &StoreChange) -> bool {
        self.props
            .should_update
            .as_ref()
            .is_some_and(|predicate| predicate(&change.prev, &change.current))
    }

    /// Value-diff check at the field's own path.
    fn dirty_in(&self, change: &StoreChange) -> bool {
        !self.props.name.is_empty()
            && get(&change.prev, &self.props.name) != get(&change.current, &self.props.name)
    }
}

#[async_trait]
impl FormField for Field {
    fn name_path(&self) -> NamePath {
        self.props.name.clone()
    }

    fn props(&self) -> &FieldProps {
        &self.props
    }

    fn meta(&self) -> FieldMeta {
        let runtime = self.lock_runtime();
        FieldMeta {
            name: self.props.name.clone(),
            touched: runtime.touched,
            validating: runtime.validating,
            validated: runtime.validated,
            errors: runtime.errors.clone(),
            warnings: runtime.warnings.clone(),
        }
    }

    fn on_store_change(&self, change: &StoreChange) {
        let name = &self.props.name;
        match &change.info {
            NotifyInfo::Reset => {
                if change.is_global() || change.affects(name) {
                    {
                        let mut runtime = self.lock_runtime();
                        *runtime = FieldRuntime::default();
                    }
                    // supersede any in-flight validation of the old value
                    self.validate_seq.fetch_add(1, Ordering::SeqCst);
                    self.rerender(change);
                }
            }
            NotifyInfo::SetField { data } => {
                if data.name == *name {
                    {
                        let mut runtime = self.lock_runtime();
                        if let Some(touched) = data.touched {
                            runtime.touched = touched;
                        }
                        if let Some(validating) = data.validating {
                            runtime.validating = validating;
                        }
                        if let Some(errors) = &data.errors {
                            runtime.errors = errors.clone();
                        }
                        if let Some(warnings) = &data.warnings {
                            runtime.warnings = warnings.clone();
                        }
                    }
                    self.rerender(change);
                } else if self.should_update_fires(change) {
                    self.rerender(change);
                }
            }
            NotifyInfo::DependenciesUpdate { related_fields } => {
                if paths_contain(related_fields, name) {
                    self.rerender(change);
                }
            }
            NotifyInfo::ValueUpdate { .. } | NotifyInfo::Remove | NotifyInfo::ValidateFinish => {
                if change.affects(name)
                    || change.affects_any(&self.props.dependencies)
                    || name.is_empty()
                    || self.dirty_in(change)
                    || self.should_update_fires(change)
                {
                    self.rerender(change);
                }
            }
        }
    }

    async fn validate_rules(&self, ctx: ValidateContext) -> RuleReport {
        let seq = self.validate_seq.fetch_add(1, Ordering::SeqCst) + 1;

        if !ctx.explicit {
            if let Some(debounce) = self.props.validate_debounce {
                tokio::time::sleep(debounce).await;
                if self.validate_seq.load(Ordering::SeqCst) != seq {
                    // a newer input event superseded this run
                    return RuleReport::default();
                }
            }
        }

        let rules: Vec<Rule> = self
            .props
            .rules
            .iter()
            .map(|entry| entry.resolve(&ctx.full_values))
            .filter(|rule| {
                rule.runs_on(ctx.trigger.as_deref(), self.props.validate_trigger.as_deref())
            })
            .collect();

        self.lock_runtime().validating = true;

        let report = run_rules(
            &self.props.name,
            &rules,
            ctx.value.as_ref(),
            &ctx.messages,
            self.props.validate_first,
        )
        .await;

        if self.validate_seq.load(Ordering::SeqCst) != seq {
            // superseded while running; the newer run owns the metadata
            return report;
        }

        let mut runtime = self.lock_runtime();
        runtime.validating = false;
        runtime.validated = true;
        runtime.errors = report.errors.clone();
        runtime.warnings = report.warnings.clone();
        drop(runtime);

        report
    }

    fn set_touched(&self, touched: bool) {
        self.lock_runtime().touched = touched;
    }
}
