//! Dynamic list bookkeeping.
//!
//! A list container owns an array in the store plus one stable key per
//! row. Keys are issued from a monotonic counter and survive unrelated
//! splices — removing row 0 leaves every other row's key untouched, so the
//! rendering layer never remounts surviving rows.

use crate::FormEngine;
use formcore_types::NamePath;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Stable-key state for one list container path.
pub struct ListState {
    engine: FormEngine,
    path: NamePath,
    keys: Mutex<Vec<u64>>,
    next_key: AtomicU64,
}

impl ListState {
    /// Creates list state over the array at `path`.
    #[must_use]
    pub fn new(engine: FormEngine, path: NamePath) -> Self {
        let state = Self {
            engine,
            path,
            keys: Mutex::new(Vec::new()),
            next_key: AtomicU64::new(0),
        };
        state.sync_keys();
        state
    }

    /// The container path.
    #[must_use]
    pub fn path(&self) -> &NamePath {
        &self.path
    }

    /// The current row keys, index-aligned with the array.
    #[must_use]
    pub fn keys(&self) -> Vec<u64> {
        self.sync_keys();
        self.keys.lock().expect("list keys lock poisoned").clone()
    }

    fn issue_key(&self) -> u64 {
        self.next_key.fetch_add(1, Ordering::SeqCst)
    }

    fn current_rows(&self) -> Vec<Value> {
        match self.engine.get_field_value(&self.path) {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        }
    }

    /// Reconciles key count with the array length (values may have been
    /// written past this controller, e.g. by `set_fields_value`).
    fn sync_keys(&self) {
        let rows = self.current_rows().len();
        let mut keys = self.keys.lock().expect("list keys lock poisoned");
        while keys.len() < rows {
            keys.push(self.next_key.fetch_add(1, Ordering::SeqCst));
        }
        keys.truncate(rows);
    }

    fn write_rows(&self, rows: Vec<Value>) {
        self.engine.update_value(&self.path, Value::Array(rows));
    }

    /// Appends a row, or inserts it at `index`.
    pub fn add(&self, value: Value, index: Option<usize>) {
        self.sync_keys();
        let mut rows = self.current_rows();
        let at = index.unwrap_or(rows.len()).min(rows.len());
        rows.insert(at, value);
        {
            let mut keys = self.keys.lock().expect("list keys lock poisoned");
            keys.insert(at, self.issue_key());
        }
        self.write_rows(rows);
    }

    /// Removes the row at `index`; out-of-range indices are ignored.
    pub fn remove(&self, index: usize) {
        self.sync_keys();
        let mut rows = self.current_rows();
        if index >= rows.len() {
            return;
        }
        rows.remove(index);
        {
            let mut keys = self.keys.lock().expect("list keys lock poisoned");
            keys.remove(index);
        }
        self.write_rows(rows);
    }

    /// Moves the row at `from` to position `to`.
    pub fn move_row(&self, from: usize, to: usize) {
        self.sync_keys();
        let mut rows = self.current_rows();
        if from == to || from >= rows.len() || to >= rows.len() {
            return;
        }
        let row = rows.remove(from);
        rows.insert(to, row);
        {
            let mut keys = self.keys.lock().expect("list keys lock poisoned");
            let key = keys.remove(from);
            keys.insert(to, key);
        }
        self.write_rows(rows);
    }
}
