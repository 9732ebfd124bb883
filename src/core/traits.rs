//! Core validator trait
//!
//! Everything that can decide whether a value matches a specification
//! implements [`Validate`]. Validators are constructed once per declared
//! callable, are immutable afterwards, and are shared across concurrent
//! invocations; the only mutable state a check may touch is the explicitly
//! passed [`BindingContext`].

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::value::Value;

/// Decides whether a value matches a specification, given a binding context.
///
/// # Examples
///
/// ```rust,ignore
/// use callguard::core::Validate;
///
/// struct NonEmptyStr;
///
/// impl Validate for NonEmptyStr {
///     fn check(&self, value: &Value, _ctx: &mut BindingContext<'_>) -> bool {
///         matches!(value, Value::Str(s) if !s.is_empty())
///     }
/// }
/// ```
pub trait Validate: Send + Sync {
    /// Returns true if `value` satisfies this validator.
    ///
    /// Type-variable checks record and consult bindings through `ctx`; all
    /// other validators merely thread it through to their children.
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool;

    /// Name used for debugging and tracing.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl std::fmt::Debug for dyn Validate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared handle to a validator.
///
/// Created once per declared callable and reused across all its invocations.
pub type SharedValidator = Arc<dyn Validate>;

impl Validate for SharedValidator {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        self.as_ref().check(value, ctx)
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }
}
