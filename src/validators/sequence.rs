//! Fixed-length ordered-container validator

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::{SeqKind, Spec};
use crate::value::Value;

/// Element-wise validation of an ordered container of known length.
///
/// The specification's own container kind controls strictness: an unqualified
/// sequence specification accepts any ordered container of matching length,
/// while a list or tuple specification additionally requires the value's
/// concrete container kind to match.
pub struct FixedSequence {
    kind: Option<SeqKind>,
    checks: Vec<SharedValidator>,
}

impl FixedSequence {
    #[must_use]
    pub fn new(kind: Option<SeqKind>, checks: Vec<SharedValidator>) -> Self {
        Self { kind, checks }
    }

    pub(crate) fn from_spec(
        spec: &Spec,
        registry: &ValidatorRegistry,
    ) -> Result<SharedValidator, SpecError> {
        match spec {
            Spec::FixedSeq { kind, items } => {
                let checks = items
                    .iter()
                    .map(|item| registry.create(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Arc::new(FixedSequence::new(*kind, checks)))
            }
            other => Err(SpecError::Unrecognized {
                spec: format!("{other:?}"),
            }),
        }
    }
}

impl Validate for FixedSequence {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        let (actual_kind, items) = match value {
            Value::List(items) => (SeqKind::List, items),
            Value::Tuple(items) => (SeqKind::Tuple, items),
            _ => return false,
        };
        if !SeqKind::admits(self.kind, actual_kind) || items.len() != self.checks.len() {
            return false;
        }
        self.checks
            .iter()
            .zip(items)
            .all(|(check, item)| check.check(item, ctx))
    }
}
