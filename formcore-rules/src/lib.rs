//! Validation rules and the per-field rule pipeline for formcore.
//!
//! A field declares an ordered list of [`RuleEntry`]s. Each resolves to a
//! [`Rule`]: declarative constraints (`required`, `type`, `pattern`,
//! `min`/`max`/`len`, `enum`, `whitespace`) plus an optional async
//! [`Validator`]. [`run_rules`] executes a field's rule list in one of three
//! modes — serial, parallel-first-failure, or all — and splits the outcome
//! into blocking errors and `warning_only` warnings.
//!
//! Messages are rendered through a [`ValidateMessages`] template map with
//! `${name}` / `${type}` / `${min}` / … substitution; per-form overrides
//! merge over the built-in defaults.

mod execute;
mod messages;
mod rule;
mod validator;

pub use execute::{execute_rule, is_empty_value, run_rules, RuleReport};
pub use messages::{fill_template, PatternMessages, RangeMessages, TypeMessages, ValidateMessages};
pub use rule::{Rule, RuleEntry, RuleType, ValidateFirst};
pub use validator::{FnValidator, Validator};
