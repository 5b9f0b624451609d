//! Point reads and writes into a nested value document.

use formcore_types::{NamePath, NameSeg};
use serde_json::Value;

/// Reads the value at `path`, if present.
///
/// The empty path addresses the whole document. A key segment into anything
/// but an object, or an index segment into anything but an array, reads as
/// absent.
#[must_use]
pub fn get<'a>(root: &'a Value, path: &NamePath) -> Option<&'a Value> {
    let mut current = root;
    for seg in path.iter() {
        current = match (current, seg) {
            (Value::Object(map), NameSeg::Key(key)) => map.get(key)?,
            (Value::Array(items), NameSeg::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, returning the new document.
///
/// The input document is not mutated. Missing intermediate containers are
/// created according to the next segment's kind (object for keys, array for
/// indices, padding with `Null`); a container of the wrong kind, or a
/// scalar in the way, is replaced wholesale. Setting at the empty path
/// replaces the whole document.
#[must_use]
pub fn set(root: &Value, path: &NamePath, value: Value) -> Value {
    set_owned(root.clone(), path, value)
}

/// `set` over an owned document, avoiding the defensive clone.
pub(crate) fn set_owned(mut root: Value, path: &NamePath, value: Value) -> Value {
    if path.is_empty() {
        return value;
    }
    set_in_place(&mut root, path.segments(), value);
    root
}

fn set_in_place(target: &mut Value, segments: &[NameSeg], value: Value) {
    let (seg, rest) = match segments.split_first() {
        Some(parts) => parts,
        None => {
            *target = value;
            return;
        }
    };

    match seg {
        NameSeg::Key(key) => {
            if !target.is_object() {
                *target = Value::Object(serde_json::Map::new());
            }
            if let Value::Object(map) = target {
                let slot = map.entry(key.clone()).or_insert(Value::Null);
                set_in_place(slot, rest, value);
            }
        }
        NameSeg::Index(index) => {
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            if let Value::Array(items) = target {
                if items.len() <= *index {
                    items.resize(*index + 1, Value::Null);
                }
                set_in_place(&mut items[*index], rest, value);
            }
        }
    }
}

/// Removes the value at `path`, returning the new document.
///
/// Object keys are removed outright; array slots are set to `Null` so
/// sibling indices keep their positions (a list item is reset to "absent",
/// never spliced out here). A missing path leaves the document unchanged.
/// Removing at the empty path yields `Null`.
#[must_use]
pub fn remove(root: &Value, path: &NamePath) -> Value {
    remove_owned(root.clone(), path)
}

pub(crate) fn remove_owned(mut root: Value, path: &NamePath) -> Value {
    if path.is_empty() {
        return Value::Null;
    }
    remove_in_place(&mut root, path.segments());
    root
}

fn remove_in_place(target: &mut Value, segments: &[NameSeg]) {
    let (seg, rest) = match segments.split_first() {
        Some(parts) => parts,
        None => return,
    };

    if rest.is_empty() {
        match (target, seg) {
            (Value::Object(map), NameSeg::Key(key)) => {
                map.remove(key);
            }
            (Value::Array(items), NameSeg::Index(index)) => {
                if let Some(slot) = items.get_mut(*index) {
                    *slot = Value::Null;
                }
            }
            _ => {}
        }
        return;
    }

    match (target, seg) {
        (Value::Object(map), NameSeg::Key(key)) => {
            if let Some(next) = map.get_mut(key) {
                remove_in_place(next, rest);
            }
        }
        (Value::Array(items), NameSeg::Index(index)) => {
            if let Some(next) = items.get_mut(*index) {
                remove_in_place(next, rest);
            }
        }
        _ => {}
    }
}

/// Builds the minimal document containing exactly the leaves at `paths`
/// that exist in `root`. Missing paths contribute nothing.
#[must_use]
pub fn clone_by_paths(root: &Value, paths: &[NamePath]) -> Value {
    let mut out = Value::Object(serde_json::Map::new());
    for path in paths {
        if let Some(value) = get(root, path) {
            out = set_owned(out, path, value.clone());
        }
    }
    out
}
