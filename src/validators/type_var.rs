//! Type-variable validator

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::Spec;
use crate::types::TypeVarId;
use crate::value::Value;

/// Checks a value against a type variable by unifying the value's runtime
/// type with the variable's current binding.
///
/// The whole state lives in the [`BindingContext`]; the validator itself is
/// immutable and shared like any other. A unification failure is reported
/// exactly like any other failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeVarCheck {
    var: TypeVarId,
}

impl TypeVarCheck {
    #[must_use]
    pub fn new(var: TypeVarId) -> Self {
        Self { var }
    }

    pub(crate) fn from_spec(
        spec: &Spec,
        _registry: &ValidatorRegistry,
    ) -> Result<SharedValidator, SpecError> {
        match spec {
            Spec::Var(var) => Ok(Arc::new(TypeVarCheck::new(*var))),
            other => Err(SpecError::Unrecognized {
                spec: format!("{other:?}"),
            }),
        }
    }
}

impl Validate for TypeVarCheck {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        let actual = ctx.types().type_of(value);
        ctx.is_compatible(self.var, actual)
    }
}
