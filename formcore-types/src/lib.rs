//! Core type definitions for formcore.
//!
//! This crate defines the fundamental, renderer-agnostic types used
//! throughout the form engine:
//! - Name paths (ordered string-or-index segments addressing the value tree)
//! - Field and watcher identifiers (UUID v7)
//! - Field metadata and patch payloads
//! - Store-change notifications
//!
//! Everything renderer-specific (component wiring, event binding, markup)
//! belongs in the rendering layer, not here.

mod ids;
mod meta;
mod namepath;
mod notify;

pub use ids::{FieldId, WatchId};
pub use meta::{FieldData, FieldMeta};
pub use namepath::{paths_contain, NamePath, NameSeg};
pub use notify::{NotifyInfo, StoreChange, ValueSource};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid name path: {0}")]
    InvalidPath(String),
}
