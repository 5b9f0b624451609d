//! Custom validator extension point.

use crate::Rule;
use async_trait::async_trait;
use serde_json::Value;

/// A custom constraint attached to a rule.
///
/// Runs after the rule's declarative checks pass. Returning `Err` with an
/// empty list is rendered through the rule's default message; a non-empty
/// list is used verbatim (unless the rule's `message` overrides it).
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validates `value` under `rule`.
    async fn validate(&self, rule: &Rule, value: &Value) -> Result<(), Vec<String>>;
}

/// Adapts a synchronous closure into the async pipeline.
///
/// The closure's error is converted into the rule's message chain like any
/// other failure; it never escapes as a panic.
pub struct FnValidator<F>(pub F);

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&Rule, &Value) -> Result<(), String> + Send + Sync,
{
    async fn validate(&self, rule: &Rule, value: &Value) -> Result<(), Vec<String>> {
        (self.0)(rule, value).map_err(|message| vec![message])
    }
}
