//! Nested value-document operations for formcore.
//!
//! The store is an arbitrarily nested [`serde_json::Value`] document
//! addressed by [`NamePath`](formcore_types::NamePath). This crate provides
//! the pure tree operations the engine is built on:
//!
//! - [`get`] / [`set`] / [`remove`] — point reads and writes
//! - [`clone_by_paths`] — minimal document containing only requested leaves
//! - [`merge`] — deep object merge with wholesale array replacement
//! - [`ValueStore`] — the owning wrapper used by the engine
//!
//! `set` never mutates its input document; it returns a new root, so a
//! snapshot taken before a mutation stays valid for diffing afterwards.

mod merge;
mod path_ops;
mod store;

pub use merge::{merge, merge_all};
pub use path_ops::{clone_by_paths, get, remove, set};
pub use store::ValueStore;
