//! Store-change notifications.
//!
//! Every store mutation is broadcast to registered fields as a
//! [`StoreChange`]: the previous document, the post-mutation snapshot, the
//! affected paths (or `None` for "treat as global"), and a tagged
//! [`NotifyInfo`] describing why the change happened. Fields use the three
//! together to decide whether they need to re-render.

use crate::{FieldData, NamePath};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a value update originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// A field's own input event, dispatched through the engine.
    Internal,
    /// A programmatic setter (`set_fields_value`, `set_field_value`).
    External,
}

/// The reason fields are being notified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifyInfo {
    /// One or more values changed.
    ValueUpdate {
        /// Whether the change came from a field event or a programmatic call.
        source: ValueSource,
    },

    /// The form (or a subset of paths) was reset to initial values.
    Reset,

    /// A direct field patch via `set_fields`; carries the patch so fields
    /// can apply metadata directly instead of diffing values.
    SetField {
        /// The patch that was applied.
        data: FieldData,
    },

    /// Fields are being notified because a path they declared in
    /// `dependencies` changed.
    DependenciesUpdate {
        /// The full dependency cascade, in discovery order.
        related_fields: Vec<NamePath>,
    },

    /// A field was unregistered and its value cleaned up.
    Remove,

    /// A validation run settled and error/warning state may have changed.
    ValidateFinish,
}

/// A store mutation, as delivered to every registered field.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreChange {
    /// The document before the mutation.
    pub prev: Value,
    /// The document after the mutation.
    pub current: Value,
    /// Paths the mutation touched. `None` means "treat as global": every
    /// field with a `should_update` predicate fires even without a match.
    pub affected: Option<Vec<NamePath>>,
    /// Why the notification happened.
    pub info: NotifyInfo,
}

impl StoreChange {
    /// True when the change carries no affected-path list and must be
    /// treated as global.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.affected.is_none()
    }

    /// True when the affected-path list contains `path` exactly.
    ///
    /// A global change matches no specific path; global handling is the
    /// field's decision, not a path match.
    #[must_use]
    pub fn affects(&self, path: &NamePath) -> bool {
        self.affected
            .as_deref()
            .is_some_and(|paths| paths.iter().any(|p| p == path))
    }

    /// True when any affected path equals any of the given paths.
    #[must_use]
    pub fn affects_any(&self, paths: &[NamePath]) -> bool {
        paths.iter().any(|p| self.affects(p))
    }
}
