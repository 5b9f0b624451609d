//! The owning store wrapper used by the engine.

use crate::{merge, path_ops};
use formcore_types::NamePath;
use serde_json::Value;

/// An owned value document with path-addressed accessors.
///
/// Mutating methods rebuild the root through the pure operations in this
/// crate; callers that need a pre-mutation snapshot clone the root first
/// (mutation never reaches back into a previously cloned document).
#[derive(Debug, Clone, PartialEq)]
pub struct ValueStore {
    root: Value,
}

impl Default for ValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueStore {
    /// Creates an empty store (an empty object document).
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Value::Object(serde_json::Map::new()),
        }
    }

    /// Creates a store over an existing document.
    #[must_use]
    pub fn with_root(root: Value) -> Self {
        Self { root }
    }

    /// Returns the current document.
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Returns an owned snapshot of the current document.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        self.root.clone()
    }

    /// Replaces the whole document.
    pub fn replace_root(&mut self, root: Value) {
        self.root = root;
    }

    /// Reads the value at `path`.
    #[must_use]
    pub fn get(&self, path: &NamePath) -> Option<&Value> {
        path_ops::get(&self.root, path)
    }

    /// Writes `value` at `path`.
    pub fn set(&mut self, path: &NamePath, value: Value) {
        let root = std::mem::take(&mut self.root);
        self.root = path_ops::set_owned(root, path, value);
    }

    /// Removes the value at `path` (object key dropped, array slot nulled).
    pub fn remove(&mut self, path: &NamePath) {
        let root = std::mem::take(&mut self.root);
        self.root = path_ops::remove_owned(root, path);
    }

    /// Deep-merges `partial` into the document.
    pub fn apply_merge(&mut self, partial: Value) {
        let root = std::mem::take(&mut self.root);
        self.root = merge(root, partial);
    }

    /// Builds the minimal document containing the leaves at `paths`.
    #[must_use]
    pub fn clone_by_paths(&self, paths: &[NamePath]) -> Value {
        path_ops::clone_by_paths(&self.root, paths)
    }
}
