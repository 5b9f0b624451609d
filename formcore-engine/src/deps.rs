//! Dependency cascade resolution.

use formcore_store::get;
use formcore_types::NamePath;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};

/// Computes the transitive set of fields affected by a change at `root`.
///
/// Builds a reverse index `dependency path -> declaring field paths` and
/// runs a closure search from `root`. A dependent field joins the cascade
/// only if it is dirty (its own value actually differs between `prev` and
/// `current`) and has a non-empty path; its path then becomes the next
/// search key. A dependency edge alone does not propagate silence.
///
/// The visited set makes dependency cycles terminate: each field is
/// expanded at most once.
///
/// Returns affected paths in discovery order.
pub(crate) fn collect_dependency_cascade(
    fields: &[(NamePath, Vec<NamePath>)],
    prev: &Value,
    current: &Value,
    root: &NamePath,
) -> Vec<NamePath> {
    let mut by_dependency: HashMap<&NamePath, Vec<&NamePath>> = HashMap::new();
    for (field_path, dependencies) in fields {
        for dependency in dependencies {
            by_dependency.entry(dependency).or_default().push(field_path);
        }
    }

    let mut cascade = Vec::new();
    let mut visited: HashSet<NamePath> = HashSet::from([root.clone()]);
    let mut queue = VecDeque::from([root.clone()]);

    while let Some(key) = queue.pop_front() {
        let Some(dependents) = by_dependency.get(&key) else {
            continue;
        };
        for field_path in dependents {
            if field_path.is_empty() || visited.contains(*field_path) {
                continue;
            }
            visited.insert((*field_path).clone());

            let dirty = get(prev, field_path) != get(current, field_path);
            if dirty {
                cascade.push((*field_path).clone());
                queue.push_back((*field_path).clone());
            }
        }
    }

    cascade
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcore_types::name_path;
    use serde_json::json;

    #[test]
    fn dependency_without_dirty_value_does_not_cascade() {
        // b depends on a, but b's own value did not change
        let fields = vec![(name_path!["b"], vec![name_path!["a"]])];
        let prev = json!({"a": 1, "b": 2});
        let current = json!({"a": 9, "b": 2});

        let cascade = collect_dependency_cascade(&fields, &prev, &current, &name_path!["a"]);
        assert!(cascade.is_empty());
    }

    #[test]
    fn dirty_dependent_joins_and_propagates() {
        let fields = vec![
            (name_path!["b"], vec![name_path!["a"]]),
            (name_path!["c"], vec![name_path!["b"]]),
        ];
        let prev = json!({"a": 1, "b": 2, "c": 3});
        let current = json!({"a": 9, "b": 8, "c": 7});

        let cascade = collect_dependency_cascade(&fields, &prev, &current, &name_path!["a"]);
        assert_eq!(cascade, vec![name_path!["b"], name_path!["c"]]);
    }

    #[test]
    fn cascade_stops_at_clean_link() {
        // a -> b -> c, but b is clean: c never enters the cascade even
        // though c changed.
        let fields = vec![
            (name_path!["b"], vec![name_path!["a"]]),
            (name_path!["c"], vec![name_path!["b"]]),
        ];
        let prev = json!({"a": 1, "b": 2, "c": 3});
        let current = json!({"a": 9, "b": 2, "c": 7});

        let cascade = collect_dependency_cascade(&fields, &prev, &current, &name_path!["a"]);
        assert!(cascade.is_empty());
    }

    #[test]
    fn dependency_cycle_terminates() {
        // a and b depend on each other and both are dirty
        let fields = vec![
            (name_path!["a"], vec![name_path!["b"]]),
            (name_path!["b"], vec![name_path!["a"]]),
        ];
        let prev = json!({"a": 1, "b": 1});
        let current = json!({"a": 2, "b": 2});

        let cascade = collect_dependency_cascade(&fields, &prev, &current, &name_path!["a"]);
        assert_eq!(cascade, vec![name_path!["b"]]);
    }

    #[test]
    fn empty_path_fields_never_cascade() {
        let fields = vec![(name_path![], vec![name_path!["a"]])];
        let prev = json!({"a": 1});
        let current = json!({"a": 2});

        let cascade = collect_dependency_cascade(&fields, &prev, &current, &name_path!["a"]);
        assert!(cascade.is_empty());
    }
}
