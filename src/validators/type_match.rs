//! Plain runtime-type validator

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::Spec;
use crate::types::TypeId;
use crate::value::Value;

/// Accepts values whose runtime type is the wrapped type or a subtype of it.
///
/// Registered last among the type-shaped recognizers, so more specific ones
/// (the generic-container recognizer in particular) get first refusal: a
/// generic type is also a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMatch {
    ty: TypeId,
}

impl TypeMatch {
    #[must_use]
    pub fn new(ty: TypeId) -> Self {
        Self { ty }
    }

    /// Registry factory. Also accepts `Spec::Generic`, ignoring its content
    /// arguments, which is what a shadowed plain-type entry falls back to.
    pub(crate) fn from_spec(
        spec: &Spec,
        _registry: &ValidatorRegistry,
    ) -> Result<SharedValidator, SpecError> {
        match spec {
            Spec::Type(ty) | Spec::Generic { ty, .. } => Ok(Arc::new(TypeMatch::new(*ty))),
            other => Err(SpecError::Unrecognized {
                spec: format!("{other:?}"),
            }),
        }
    }
}

impl Validate for TypeMatch {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        let actual = ctx.types().type_of(value);
        ctx.types().is_subtype(actual, self.ty)
    }
}
