//! NONE combinator - no sub-validator may pass

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::Spec;
use crate::value::Value;

/// Succeeds if no sub-validator succeeds.
///
/// An empty set always succeeds: there is nothing to violate.
pub struct NoneOf {
    checks: Vec<SharedValidator>,
}

impl NoneOf {
    #[must_use]
    pub fn new(checks: Vec<SharedValidator>) -> Self {
        Self { checks }
    }

    /// Resolves each sub-specification through the registry.
    pub fn from_specs(registry: &ValidatorRegistry, specs: Vec<Spec>) -> Result<Self, SpecError> {
        let checks = specs
            .iter()
            .map(|spec| registry.create(spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(checks))
    }
}

impl Validate for NoneOf {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        !self.checks.iter().any(|check| check.check(value, ctx))
    }
}

/// Builds a none-of specification from sub-specifications.
pub fn none_of(registry: &ValidatorRegistry, specs: Vec<Spec>) -> Result<Spec, SpecError> {
    Ok(Spec::Checker(Arc::new(NoneOf::from_specs(
        registry, specs,
    )?)))
}
