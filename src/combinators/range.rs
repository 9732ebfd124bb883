//! Inclusive range combinator

use std::cmp::Ordering;
use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::Validate;
use crate::spec::Spec;
use crate::value::Value;

/// Succeeds if the value has the bounds' type and `low <= value <= high`.
///
/// Construction fails — a specification error, not a runtime check — when
/// the bounds have different types, when `low >= high`, or when the type has
/// no total ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct InRange {
    low: Value,
    high: Value,
}

impl InRange {
    pub fn new(low: Value, high: Value) -> Result<Self, SpecError> {
        if low.kind() != high.kind() {
            return Err(SpecError::Invalid(format!(
                "range bounds must have one type, got {low} and {high}"
            )));
        }
        if !low.is_ordered_scalar() {
            return Err(SpecError::Invalid(format!(
                "range bounds of kind {:?} have no total ordering",
                low.kind()
            )));
        }
        match low.compare(&high) {
            Some(Ordering::Less) => Ok(Self { low, high }),
            _ => Err(SpecError::Invalid(format!(
                "range lower bound {low} must be strictly below upper bound {high}"
            ))),
        }
    }
}

impl Validate for InRange {
    fn check(&self, value: &Value, _ctx: &mut BindingContext<'_>) -> bool {
        if value.kind() != self.high.kind() {
            return false;
        }
        matches!(
            self.low.compare(value),
            Some(Ordering::Less | Ordering::Equal)
        ) && matches!(
            value.compare(&self.high),
            Some(Ordering::Less | Ordering::Equal)
        )
    }
}

/// Builds an inclusive-range specification.
pub fn range(low: Value, high: Value) -> Result<Spec, SpecError> {
    Ok(Spec::Checker(Arc::new(InRange::new(low, high)?)))
}
