//! Name paths — hierarchical addresses into the value tree.
//!
//! A [`NamePath`] is an ordered sequence of segments, each either an object
//! key or an array index (e.g. `users.0.name`). Paths are the engine's only
//! addressing scheme: fields declare one, mutations target one, and
//! notifications carry lists of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One segment of a name path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameSeg {
    /// An array index.
    Index(usize),
    /// An object key.
    Key(String),
}

impl From<&str> for NameSeg {
    fn from(s: &str) -> Self {
        Self::Key(s.to_string())
    }
}

impl From<String> for NameSeg {
    fn from(s: String) -> Self {
        Self::Key(s)
    }
}

impl From<usize> for NameSeg {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl fmt::Display for NameSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{k}"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// An ordered sequence of segments identifying a location in the store.
///
/// Equality is segment-wise. One path "contains" another when it is a
/// positional prefix of it; see [`NamePath::starts_with`]. The empty path
/// addresses the whole tree; a field registered with an empty path has no
/// value of its own and observes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamePath(Vec<NameSeg>);

impl NamePath {
    /// The empty path (the root of the tree).
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Creates a path from a list of segments.
    #[must_use]
    pub fn from_segments(segments: Vec<NameSeg>) -> Self {
        Self(segments)
    }

    /// Returns the segments of this path.
    #[must_use]
    pub fn segments(&self) -> &[NameSeg] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a segment in place.
    pub fn push(&mut self, seg: impl Into<NameSeg>) {
        self.0.push(seg.into());
    }

    /// Returns a new path with the segment appended.
    #[must_use]
    pub fn join(&self, seg: impl Into<NameSeg>) -> Self {
        let mut segments = self.0.clone();
        segments.push(seg.into());
        Self(segments)
    }

    /// Returns a new path with all of `suffix`'s segments appended.
    #[must_use]
    pub fn concat(&self, suffix: &NamePath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(suffix.0.iter().cloned());
        Self(segments)
    }

    /// True when `prefix` is a positional prefix of this path.
    ///
    /// Every path starts with the root path. Equal paths contain each other.
    #[must_use]
    pub fn starts_with(&self, prefix: &NamePath) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    /// Strips `prefix` from the front, returning the remainder.
    ///
    /// Returns `None` when this path does not start with `prefix`.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &NamePath) -> Option<NamePath> {
        if self.starts_with(prefix) {
            Some(Self(self.0[prefix.0.len()..].to_vec()))
        } else {
            None
        }
    }

    /// Returns the last segment, if any.
    #[must_use]
    pub fn last(&self) -> Option<&NameSeg> {
        self.0.last()
    }

    /// Iterates over the segments.
    pub fn iter(&self) -> impl Iterator<Item = &NameSeg> {
        self.0.iter()
    }
}

impl fmt::Display for NamePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl From<&str> for NamePath {
    fn from(key: &str) -> Self {
        Self(vec![NameSeg::from(key)])
    }
}

impl From<String> for NamePath {
    fn from(key: String) -> Self {
        Self(vec![NameSeg::from(key)])
    }
}

impl From<usize> for NamePath {
    fn from(index: usize) -> Self {
        Self(vec![NameSeg::from(index)])
    }
}

impl From<Vec<NameSeg>> for NamePath {
    fn from(segments: Vec<NameSeg>) -> Self {
        Self(segments)
    }
}

impl FromIterator<NameSeg> for NamePath {
    fn from_iter<I: IntoIterator<Item = NameSeg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// True when `list` contains a path equal to `path` (segment-wise).
#[must_use]
pub fn paths_contain(list: &[NamePath], path: &NamePath) -> bool {
    list.iter().any(|p| p == path)
}

/// Builds a [`NamePath`] from key and index literals.
///
/// ```
/// use formcore_types::name_path;
///
/// let path = name_path!["users", 0, "name"];
/// assert_eq!(path.to_string(), "users.0.name");
/// ```
#[macro_export]
macro_rules! name_path {
    () => {
        $crate::NamePath::root()
    };
    ($($seg:expr),+ $(,)?) => {
        $crate::NamePath::from_segments(vec![$($crate::NameSeg::from($seg)),+])
    };
}
