//! Optional wrapper

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::Spec;
use crate::value::Value;

/// Makes an inner validator tolerate omission and null.
///
/// Accepts the no-value sentinel, null, or anything the inner validator
/// accepts. This intentionally overrides any narrower semantics the inner
/// validator might apply to null.
pub struct Optional {
    inner: SharedValidator,
}

impl Optional {
    #[must_use]
    pub fn new(inner: SharedValidator) -> Self {
        Self { inner }
    }
}

impl Validate for Optional {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        matches!(value, Value::NoValue | Value::Null) || self.inner.check(value, ctx)
    }
}

/// Builds an optional specification around `spec`.
///
/// # Examples
///
/// ```rust,ignore
/// let spec = optional(&registry, Spec::Type(builtins.int))?;
/// ```
pub fn optional(registry: &ValidatorRegistry, spec: Spec) -> Result<Spec, SpecError> {
    let inner = registry.create(&spec)?;
    Ok(Spec::Checker(Arc::new(Optional::new(inner))))
}
