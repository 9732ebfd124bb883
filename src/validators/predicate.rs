//! Predicate and pass-everything validators

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::{SharedPredicate, Spec};
use crate::value::Value;

/// Wraps an arbitrary boolean predicate over values.
pub struct PredicateFn {
    func: SharedPredicate,
}

impl PredicateFn {
    pub fn new(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self { func: Arc::new(f) }
    }

    #[must_use]
    pub fn from_shared(func: SharedPredicate) -> Self {
        Self { func }
    }

    pub(crate) fn from_spec(
        spec: &Spec,
        _registry: &ValidatorRegistry,
    ) -> Result<SharedValidator, SpecError> {
        match spec {
            Spec::Predicate(func) => Ok(Arc::new(PredicateFn::from_shared(func.clone()))),
            other => Err(SpecError::Unrecognized {
                spec: format!("{other:?}"),
            }),
        }
    }
}

impl Validate for PredicateFn {
    fn check(&self, value: &Value, _ctx: &mut BindingContext<'_>) -> bool {
        (self.func)(value)
    }

    fn name(&self) -> &str {
        "PredicateFn"
    }
}

/// Accepts every value. The validator behind [`Spec::Anything`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Anything;

impl Anything {
    pub(crate) fn from_spec(
        spec: &Spec,
        _registry: &ValidatorRegistry,
    ) -> Result<SharedValidator, SpecError> {
        match spec {
            Spec::Anything => Ok(Arc::new(Anything)),
            other => Err(SpecError::Unrecognized {
                spec: format!("{other:?}"),
            }),
        }
    }
}

impl Validate for Anything {
    fn check(&self, _value: &Value, _ctx: &mut BindingContext<'_>) -> bool {
        true
    }
}
