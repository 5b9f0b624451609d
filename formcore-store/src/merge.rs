//! Deep merge for partial value documents.
//!
//! Objects merge recursively; arrays — and any object/array kind mismatch —
//! are replaced wholesale. The array rule is load-bearing: a partial
//! initial-values update must not splice unrelated indices into an existing
//! list.

use serde_json::Value;

/// Merges `partial` into `base`, returning the combined document.
///
/// Merge is associative but not commutative: when keys collide, the last
/// writer wins per leaf.
#[must_use]
pub fn merge(base: Value, partial: Value) -> Value {
    match (base, partial) {
        (Value::Object(mut base_map), Value::Object(partial_map)) => {
            for (key, incoming) in partial_map {
                let merged = match base_map.remove(&key) {
                    Some(existing) => merge(existing, incoming),
                    None => incoming,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        // Arrays, scalars, and kind mismatches: the partial wins wholesale.
        (_, partial) => partial,
    }
}

/// Folds a sequence of partials into `base`, left to right.
#[must_use]
pub fn merge_all(base: Value, partials: impl IntoIterator<Item = Value>) -> Value {
    partials.into_iter().fold(base, merge)
}
