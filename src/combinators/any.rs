//! ANY combinator - at least one sub-validator must pass

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::Spec;
use crate::value::Value;

/// Succeeds if at least one sub-validator succeeds.
///
/// An empty set never succeeds: with nothing to satisfy the disjunction,
/// every value is rejected.
pub struct AnyOf {
    checks: Vec<SharedValidator>,
}

impl AnyOf {
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

impl Validate for AnyOf {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        self.checks.iter().any(|check| check.check(value, ctx))
    }
}

/// Builds an any-of specification from sub-specifications.
pub fn any_of(registry: &ValidatorRegistry, specs: Vec<Spec>) -> Result<Spec, SpecError> {
    Ok(Spec::Checker(Arc::new(AnyOf::from_specs(registry, specs)?)))
}
