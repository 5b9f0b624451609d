//! The formcore form state engine.
//!
//! A headless, reactive state engine for form UIs:
//!
//! - **Store**: a tree-shaped value document addressed by name paths, with
//!   synchronous, read-after-write-consistent access
//! - **Registry**: live field entities with initial-value seeding and
//!   two-phase preserve cleanup on unregister
//! - **Dependency resolver**: dirty-gated, cycle-safe cascade of dependent
//!   fields on every internal value update
//! - **Validation orchestrator**: per-field async rule pipelines with
//!   serial / parallel-first-failure / all modes, debounce, and
//!   stale-run detection
//! - **Notification dispatcher**: synchronous, per-field scoped re-render
//!   signals (or one whole-tree signal in externally driven mode)
//! - **Watch scheduler**: coalesced value observation for non-field
//!   subscribers
//! - **Scoped views**: the same API projected onto a sub-tree
//!
//! # Example
//!
//! ```
//! use formcore_engine::{Field, FieldProps, FormEngine, HOOK_MARK};
//! use formcore_rules::Rule;
//! use formcore_types::name_path;
//! use std::sync::Arc;
//!
//! let engine = FormEngine::new();
//! let hooks = engine.internal_hooks(HOOK_MARK).expect("internal mark");
//!
//! let field = Arc::new(Field::new(
//!     FieldProps::new(name_path!["user", "email"]).rule(Rule::required()),
//! ));
//! hooks.register_field(field);
//!
//! engine.set_field_value(&name_path!["user", "email"], "a@b.co".into());
//! assert_eq!(
//!     engine.get_field_value(&name_path!["user", "email"]),
//!     Some("a@b.co".into())
//! );
//! ```

mod api;
mod callbacks;
mod deps;
mod engine;
mod error;
mod field;
mod hooks;
mod list;
mod registry;
mod scoped;
mod validate;
mod watch;

pub use api::{FormApi, NullForm};
pub use callbacks::{
    FieldsChangeCallback, FinishCallback, FinishFailedCallback, FormCallbacks,
    ValuesChangeCallback,
};
pub use engine::{ForceRootUpdate, FormEngine, MetaFilter};
pub use error::{FieldError, ValidateFailure};
pub use field::{Field, FieldProps, FormField, RenderHook, UpdatePredicate, ValidateContext};
pub use hooks::{Action, InternalHooks, HOOK_MARK};
pub use list::ListState;
pub use registry::UnregisterOptions;
pub use scoped::ScopedForm;
pub use validate::ValidateOptions;
pub use watch::WatchCallback;
