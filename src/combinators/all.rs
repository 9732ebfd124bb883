//! ALL combinator - every sub-validator must pass

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::Spec;
use crate::value::Value;

/// Succeeds if every sub-validator succeeds.
///
/// An empty set always succeeds: the conjunction is vacuously true.
pub struct AllOf {
    checks: Vec<SharedValidator>,
}

impl AllOf {
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

impl Validate for AllOf {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        self.checks.iter().all(|check| check.check(value, ctx))
    }
}

/// Builds an all-of specification from sub-specifications.
pub fn all_of(registry: &ValidatorRegistry, specs: Vec<Spec>) -> Result<Spec, SpecError> {
    Ok(Spec::Checker(Arc::new(AllOf::from_specs(registry, specs)?)))
}
