//! Generic-container validator

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::combinators::{MapOf, SequenceOf};
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::Spec;
use crate::types::TypeId;
use crate::value::Value;

enum Content {
    Sequence(SequenceOf),
    Mapping(MapOf),
    Opaque,
}

/// Validates an instance of a generic type plus, where possible, its content.
///
/// The value's runtime type must be the declared type or a subtype of it. A
/// one-argument specification checks ordered-container elements, a
/// two-argument one checks mapping keys and values (both sampled); any other
/// shape passes content-unchecked, since reading an opaque iteration protocol
/// would exhaust it and guessing container elements is not possible.
///
/// Registered ahead of the plain type recognizer: a generic type is also a
/// type, and must get first refusal.
pub struct GenericContainer {
    ty: TypeId,
    content: Content,
}

impl GenericContainer {
    pub(crate) fn from_spec(
        spec: &Spec,
        registry: &ValidatorRegistry,
    ) -> Result<SharedValidator, SpecError> {
        match spec {
            Spec::Generic { ty, args } => {
                let content = match args.as_slice() {
                    [element] => Content::Sequence(SequenceOf::new(registry.create(element)?)),
                    [key, value] => {
                        Content::Mapping(MapOf::new(registry.create(key)?, registry.create(value)?))
                    }
                    _ => Content::Opaque,
                };
                Ok(Arc::new(GenericContainer { ty: *ty, content }))
            }
            other => Err(SpecError::Unrecognized {
                spec: format!("{other:?}"),
            }),
        }
    }
}

impl Validate for GenericContainer {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        let actual = ctx.types().type_of(value);
        if !ctx.types().is_subtype(actual, self.ty) {
            return false;
        }
        match (&self.content, value) {
            (Content::Sequence(elements), Value::List(_) | Value::Tuple(_)) => {
                elements.check(value, ctx)
            }
            (Content::Mapping(entries), Value::Map(_)) => entries.check(value, ctx),
            _ => true,
        }
    }
}
