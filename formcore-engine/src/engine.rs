//! The form engine — store ownership, mutation, and notification.
//!
//! The engine owns the value store and the field registry behind one lock.
//! Mutations are synchronous and atomic: take the lock, clone the previous
//! document, apply the change, release the lock, then dispatch
//! notifications — so every registered field observes the change before the
//! mutating call returns, and reentrant reads from inside a callback cannot
//! deadlock. Validation is the only asynchronous boundary.

use crate::callbacks::FormCallbacks;
use crate::field::FormField;
use crate::registry::{CleanupMark, RegisteredField};
use crate::watch::{WatchCallback, WatchScheduler};
use crate::FieldError;
use formcore_rules::ValidateMessages;
use formcore_store::{clone_by_paths, get, merge, set, ValueStore};
use formcore_types::{
    FieldData, FieldMeta, NamePath, NotifyInfo, StoreChange, ValueSource, WatchId,
};
use serde_json::Value;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// Re-render signal for the "fully controlled externally" mode: when
/// subscribable is off, every mutation collapses into one whole-tree
/// re-evaluation instead of fine-grained per-field events.
pub type ForceRootUpdate = Arc<dyn Fn() + Send + Sync>;

/// Meta predicate for `get_fields_value` filtering.
pub type MetaFilter = dyn Fn(&FieldMeta) -> bool;

pub(crate) struct EngineInner {
    pub(crate) store: ValueStore,
    pub(crate) initial_values: Value,
    pub(crate) fields: Vec<RegisteredField>,
    pub(crate) preserve_default: Option<bool>,
    pub(crate) validate_messages: ValidateMessages,
    pub(crate) callbacks: FormCallbacks,
    pub(crate) subscribable: bool,
    pub(crate) pending_cleanup: Vec<CleanupMark>,
    pub(crate) batch_depth: usize,
}

impl EngineInner {
    fn new() -> Self {
        Self {
            store: ValueStore::new(),
            initial_values: Value::Object(serde_json::Map::new()),
            fields: Vec::new(),
            preserve_default: None,
            validate_messages: ValidateMessages::default(),
            callbacks: FormCallbacks::default(),
            subscribable: true,
            pending_cleanup: Vec::new(),
            batch_depth: 0,
        }
    }
}

pub(crate) struct Shared {
    pub(crate) inner: RwLock<EngineInner>,
    pub(crate) watch: WatchScheduler,
    pub(crate) validate_generation: AtomicU64,
    pub(crate) force_root_update: Option<ForceRootUpdate>,
}

/// The form state engine. Cheap to clone; all clones share one store and
/// registry. Each engine exclusively owns its state; scoped views only
/// ever hold a reference.
#[derive(Clone)]
pub struct FormEngine {
    pub(crate) shared: Arc<Shared>,
}

impl Default for FormEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FormEngine {
    /// Creates an engine with an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: RwLock::new(EngineInner::new()),
                watch: WatchScheduler::default(),
                validate_generation: AtomicU64::new(0),
                force_root_update: None,
            }),
        }
    }

    /// Creates an engine wired to a whole-tree re-render signal, used when
    /// subscribable mode is turned off.
    #[must_use]
    pub fn with_force_update(force_root_update: ForceRootUpdate) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: RwLock::new(EngineInner::new()),
                watch: WatchScheduler::default(),
                validate_generation: AtomicU64::new(0),
                force_root_update: Some(force_root_update),
            }),
        }
    }

    pub(crate) fn read_inner(&self) -> RwLockReadGuard<'_, EngineInner> {
        self.shared.inner.read().expect("engine lock poisoned")
    }

    pub(crate) fn write_inner(&self) -> RwLockWriteGuard<'_, EngineInner> {
        self.shared.inner.write().expect("engine lock poisoned")
    }

    pub(crate) fn watch_scheduler(&self) -> &WatchScheduler {
        &self.shared.watch
    }

    pub(crate) fn entities(&self) -> Vec<Arc<dyn FormField>> {
        self.read_inner()
            .fields
            .iter()
            .map(|field| field.entity.clone())
            .collect()
    }

    pub(crate) fn entity_at(&self, path: &NamePath) -> Option<Arc<dyn FormField>> {
        self.read_inner()
            .fields
            .iter()
            .map(|field| field.entity.clone())
            .find(|entity| entity.name_path() == *path)
    }

    // ── Value getters ────────────────────────────────────────────

    /// Reads the value at `path`.
    #[must_use]
    pub fn get_field_value(&self, path: &NamePath) -> Option<Value> {
        self.read_inner().store.get(path).cloned()
    }

    /// The raw store document.
    #[must_use]
    pub fn get_fields_value_all(&self) -> Value {
        self.read_inner().store.snapshot()
    }

    /// Builds a restricted value document.
    ///
    /// With no path list, every path-bearing registered field contributes,
    /// except list containers, which would duplicate their own leaves. An
    /// optional predicate over each candidate's metadata decides inclusion.
    /// With a path list and no filter, the paths are cloned whether or not
    /// a field occupies them.
    #[must_use]
    pub fn get_fields_value(
        &self,
        paths: Option<&[NamePath]>,
        filter: Option<&MetaFilter>,
    ) -> Value {
        let entities = self.entities();
        let store = self.get_fields_value_all();

        let selected: Vec<NamePath> = match paths {
            None => entities
                .iter()
                .filter(|entity| {
                    let name = entity.name_path();
                    if name.is_empty() || entity.props().is_list_field {
                        return false;
                    }
                    filter.is_none_or(|pass| pass(&entity.meta()))
                })
                .map(|entity| entity.name_path())
                .collect(),
            Some(list) => list
                .iter()
                .filter(|path| match filter {
                    None => true,
                    Some(pass) => entities
                        .iter()
                        .find(|entity| entity.name_path() == **path)
                        .is_some_and(|entity| pass(&entity.meta())),
                })
                .cloned()
                .collect(),
        };

        clone_by_paths(&store, &selected)
    }

    // ── Meta getters ─────────────────────────────────────────────

    /// Blocking errors of the field at `path` (empty when unregistered).
    #[must_use]
    pub fn get_field_error(&self, path: &NamePath) -> Vec<String> {
        self.entity_at(path)
            .map(|entity| entity.meta().errors)
            .unwrap_or_default()
    }

    /// Warnings of the field at `path`.
    #[must_use]
    pub fn get_field_warning(&self, path: &NamePath) -> Vec<String> {
        self.entity_at(path)
            .map(|entity| entity.meta().warnings)
            .unwrap_or_default()
    }

    /// Error state for the given paths, or for every registered field.
    #[must_use]
    pub fn get_fields_error(&self, paths: Option<&[NamePath]>) -> Vec<FieldError> {
        match paths {
            None => self
                .entities()
                .into_iter()
                .filter(|entity| !entity.name_path().is_empty())
                .map(|entity| {
                    let meta = entity.meta();
                    FieldError {
                        name: meta.name,
                        errors: meta.errors,
                        warnings: meta.warnings,
                    }
                })
                .collect(),
            Some(list) => list
                .iter()
                .map(|path| match self.entity_at(path) {
                    Some(entity) => {
                        let meta = entity.meta();
                        FieldError {
                            name: meta.name,
                            errors: meta.errors,
                            warnings: meta.warnings,
                        }
                    }
                    None => FieldError {
                        name: path.clone(),
                        ..FieldError::default()
                    },
                })
                .collect(),
        }
    }

    /// True when the field at `path` has been interacted with.
    #[must_use]
    pub fn is_field_touched(&self, path: &NamePath) -> bool {
        self.entity_at(path).is_some_and(|entity| entity.is_touched())
    }

    /// Touched state over namespaces.
    ///
    /// With paths: candidates are fields whose name starts with any given
    /// path. `all_touched` requires every namespace to contain a touched
    /// field; otherwise any touched candidate suffices. Without paths the
    /// check spans every path-bearing field.
    #[must_use]
    pub fn is_fields_touched(&self, paths: Option<&[NamePath]>, all_touched: bool) -> bool {
        let entities: Vec<_> = self
            .entities()
            .into_iter()
            .filter(|entity| !entity.name_path().is_empty())
            .collect();

        match paths {
            None => {
                if all_touched {
                    !entities.is_empty() && entities.iter().all(|entity| entity.is_touched())
                } else {
                    entities.iter().any(|entity| entity.is_touched())
                }
            }
            Some(list) => {
                if all_touched {
                    list.iter().all(|prefix| {
                        entities
                            .iter()
                            .filter(|entity| entity.name_path().starts_with(prefix))
                            .any(|entity| entity.is_touched())
                    })
                } else {
                    entities
                        .iter()
                        .filter(|entity| {
                            list.iter().any(|prefix| entity.name_path().starts_with(prefix))
                        })
                        .any(|entity| entity.is_touched())
                }
            }
        }
    }

    /// True while the field at `path` has a validation run in flight.
    #[must_use]
    pub fn is_field_validating(&self, path: &NamePath) -> bool {
        self.entity_at(path).is_some_and(|entity| entity.is_validating())
    }

    // ── Mutators ─────────────────────────────────────────────────

    /// Deep-merges a partial value tree into the store (external source).
    ///
    /// Treated as global: fields re-render based on their own value diff
    /// or `should_update` predicate, not a path list.
    pub fn set_fields_value(&self, values: Value) {
        let prev = {
            let mut inner = self.write_inner();
            let prev = inner.store.snapshot();
            inner.store.apply_merge(values);
            prev
        };
        self.notify_observers(
            prev,
            None,
            NotifyInfo::ValueUpdate {
                source: ValueSource::External,
            },
        );
        self.notify_watch(Vec::new());
    }

    /// Writes one value (external source), clearing the field's error
    /// state like any direct programmatic overwrite.
    pub fn set_field_value(&self, path: &NamePath, value: Value) {
        self.set_fields(vec![FieldData::new(path.clone())
            .with_value(value)
            .with_errors(Vec::new())
            .with_warnings(Vec::new())]);
    }

    /// Applies direct field patches: values write through to the store,
    /// metadata members patch the matching field without value diffing.
    pub fn set_fields(&self, fields: Vec<FieldData>) {
        let prev = self.read_inner().store.snapshot();
        let mut changed_paths = Vec::with_capacity(fields.len());

        for data in fields {
            let path = data.name.clone();
            if let Some(value) = &data.value {
                let mut inner = self.write_inner();
                let root = inner.store.snapshot();
                inner.store.replace_root(set(&root, &path, value.clone()));
            }
            self.notify_observers(
                prev.clone(),
                Some(vec![path.clone()]),
                NotifyInfo::SetField { data },
            );
            changed_paths.push(path);
        }

        self.fire_fields_change(&changed_paths);
        self.notify_watch(changed_paths);
    }

    /// Resets the given paths (or the whole form) to initial values.
    pub fn reset_fields(&self, paths: Option<&[NamePath]>) {
        match paths {
            None => {
                let prev = {
                    let mut inner = self.write_inner();
                    let prev = inner.store.snapshot();
                    let initial = inner.initial_values.clone();
                    inner.store.replace_root(initial);
                    prev
                };
                self.seed_field_initial_values(None);
                self.notify_observers(prev, None, NotifyInfo::Reset);
                self.notify_watch(self.registered_paths());
            }
            Some(list) => {
                let prev = {
                    let mut inner = self.write_inner();
                    let prev = inner.store.snapshot();
                    for path in list {
                        let initial = get(&inner.initial_values, path).cloned();
                        let root = inner.store.snapshot();
                        let next = match initial {
                            Some(value) => set(&root, path, value),
                            None => formcore_store::remove(&root, path),
                        };
                        inner.store.replace_root(next);
                    }
                    prev
                };
                self.seed_field_initial_values(Some(list));
                self.notify_observers(prev, Some(list.to_vec()), NotifyInfo::Reset);
                self.notify_watch(list.to_vec());
            }
        }
    }

    /// Internal-source value update: writes the value, marks matching
    /// fields touched, notifies, then runs the dependency cascade.
    pub(crate) fn update_value(&self, path: &NamePath, value: Value) {
        let (prev, current) = {
            let mut inner = self.write_inner();
            let prev = inner.store.snapshot();
            inner.store.set(path, value);
            (prev, inner.store.snapshot())
        };

        for entity in self.entities() {
            if entity.name_path() == *path {
                entity.set_touched(true);
            }
        }

        self.notify_observers(
            prev.clone(),
            Some(vec![path.clone()]),
            NotifyInfo::ValueUpdate {
                source: ValueSource::Internal,
            },
        );
        self.trigger_dependencies_update(&prev, path);

        let (changed, callbacks) = {
            let inner = self.read_inner();
            (
                clone_by_paths(inner.store.root(), std::slice::from_ref(path)),
                inner.callbacks.clone(),
            )
        };
        if let Some(on_values_change) = &callbacks.on_values_change {
            on_values_change(&changed, &current);
        }

        self.notify_watch(vec![path.clone()]);
    }

    /// Runs the dependency resolver from `root` and broadcasts the
    /// cascade; cascade members re-validate out of band.
    pub(crate) fn trigger_dependencies_update(&self, prev: &Value, root: &NamePath) -> Vec<NamePath> {
        let cascade = {
            let inner = self.read_inner();
            let declared: Vec<(NamePath, Vec<NamePath>)> = inner
                .fields
                .iter()
                .map(|field| {
                    (
                        field.entity.name_path(),
                        field.entity.props().dependencies.clone(),
                    )
                })
                .collect();
            crate::deps::collect_dependency_cascade(
                &declared,
                prev,
                inner.store.root(),
                root,
            )
        };

        if !cascade.is_empty() {
            self.trigger_validation(cascade.clone(), None, true);
            let mut related = Vec::with_capacity(cascade.len() + 1);
            related.push(root.clone());
            related.extend(cascade.iter().cloned());
            self.notify_observers(
                prev.clone(),
                Some(cascade.clone()),
                NotifyInfo::DependenciesUpdate {
                    related_fields: related,
                },
            );
        }
        cascade
    }

    // ── Batching ─────────────────────────────────────────────────

    /// Runs `f` inside an update batch.
    ///
    /// Unregister cleanup is marked during the batch and swept once at its
    /// end, so two fields that momentarily share a path while being
    /// swapped resolve against the final registry state, not the
    /// intermediate one. Batches nest; the outermost end sweeps.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        self.write_inner().batch_depth += 1;
        let result = f();
        let marks = {
            let mut inner = self.write_inner();
            inner.batch_depth -= 1;
            if inner.batch_depth == 0 {
                std::mem::take(&mut inner.pending_cleanup)
            } else {
                Vec::new()
            }
        };
        for mark in marks {
            self.sweep_cleanup(mark);
        }
        result
    }

    // ── Configuration (internal hooks) ───────────────────────────

    pub(crate) fn set_initial_values(&self, values: Value, init: bool) {
        let mut inner = self.write_inner();
        inner.initial_values = values.clone();
        if init {
            let current = inner.store.snapshot();
            inner.store.replace_root(merge(values, current));
        }
    }

    pub(crate) fn get_initial_value(&self, path: &NamePath) -> Option<Value> {
        get(&self.read_inner().initial_values, path).cloned()
    }

    pub(crate) fn set_callbacks(&self, callbacks: FormCallbacks) {
        self.write_inner().callbacks = callbacks;
    }

    pub(crate) fn set_validate_messages(&self, messages: ValidateMessages) {
        self.write_inner().validate_messages = messages;
    }

    pub(crate) fn set_preserve(&self, preserve: Option<bool>) {
        self.write_inner().preserve_default = preserve;
    }

    pub(crate) fn set_subscribable(&self, subscribable: bool) {
        self.write_inner().subscribable = subscribable;
    }

    pub(crate) fn destroy_form(&self, clear_on_destroy: bool) {
        if clear_on_destroy {
            let mut inner = self.write_inner();
            inner.store.replace_root(Value::Object(serde_json::Map::new()));
            return;
        }
        // Drop only the values of fields that do not preserve.
        let doomed: Vec<NamePath> = {
            let inner = self.read_inner();
            inner
                .fields
                .iter()
                .filter(|field| {
                    let effective = field
                        .entity
                        .props()
                        .preserve
                        .or(inner.preserve_default)
                        .unwrap_or(true);
                    !effective && !field.entity.name_path().is_empty()
                })
                .map(|field| field.entity.name_path())
                .collect()
        };
        let mut inner = self.write_inner();
        for path in doomed {
            let root = inner.store.snapshot();
            inner.store.replace_root(formcore_store::remove(&root, &path));
        }
    }

    // ── Watch ────────────────────────────────────────────────────

    pub(crate) fn register_watch(&self, callback: WatchCallback) -> WatchId {
        self.shared.watch.register(callback)
    }

    pub(crate) fn unregister_watch(&self, id: WatchId) {
        self.shared.watch.unregister(id);
    }

    pub(crate) fn notify_watch(&self, paths: Vec<NamePath>) {
        self.shared.watch.notify(self, paths);
    }

    // ── Notification ─────────────────────────────────────────────

    /// Broadcasts a store change to every registered field, synchronously.
    ///
    /// In subscribable mode each entity decides its own re-render; with it
    /// off, the whole-tree signal fires once instead. The lock is released
    /// before any callback runs.
    pub(crate) fn notify_observers(
        &self,
        prev: Value,
        affected: Option<Vec<NamePath>>,
        info: NotifyInfo,
    ) {
        let (subscribable, entities, current) = {
            let inner = self.read_inner();
            (
                inner.subscribable,
                inner
                    .fields
                    .iter()
                    .map(|field| field.entity.clone())
                    .collect::<Vec<_>>(),
                inner.store.snapshot(),
            )
        };

        if subscribable {
            let change = StoreChange {
                prev,
                current,
                affected,
                info,
            };
            for entity in entities {
                entity.on_store_change(&change);
            }
        } else if let Some(force_root_update) = &self.shared.force_root_update {
            force_root_update();
        } else {
            warn!("subscribable disabled but no force_root_update signal is wired");
        }
    }

    pub(crate) fn fire_fields_change(&self, changed: &[NamePath]) {
        let callbacks = self.read_inner().callbacks.clone();
        let Some(on_fields_change) = &callbacks.on_fields_change else {
            return;
        };
        let all_metas: Vec<FieldMeta> = self
            .entities()
            .iter()
            .filter(|entity| !entity.name_path().is_empty())
            .map(|entity| entity.meta())
            .collect();
        let changed_metas: Vec<FieldMeta> = all_metas
            .iter()
            .filter(|meta| changed.iter().any(|path| *path == meta.name))
            .cloned()
            .collect();
        on_fields_change(&changed_metas, &all_metas);
    }

    pub(crate) fn registered_paths(&self) -> Vec<NamePath> {
        self.entities()
            .iter()
            .map(|entity| entity.name_path())
            .filter(|name| !name.is_empty())
            .collect()
    }

    // ── Submit ───────────────────────────────────────────────────

    /// Validates everything, then fires `on_finish` / `on_finish_failed`.
    ///
    /// A failing `on_finish` is logged, never propagated.
    pub async fn submit_async(&self) {
        let callbacks = self.read_inner().callbacks.clone();
        match self
            .validate_fields(None, crate::ValidateOptions::default())
            .await
        {
            Ok(values) => {
                if let Some(on_finish) = &callbacks.on_finish {
                    if let Err(error) = on_finish(values) {
                        warn!("on_finish callback failed: {error:#}");
                    }
                }
            }
            Err(failure) => {
                if let Some(on_finish_failed) = &callbacks.on_finish_failed {
                    on_finish_failed(failure);
                }
            }
        }
    }

    /// Fire-and-forget submit; requires an ambient async runtime.
    pub fn submit(&self) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let engine = self.clone();
                handle.spawn(async move { engine.submit_async().await });
            }
            Err(_) => warn!("submit called outside an async runtime; ignored"),
        }
    }
}
