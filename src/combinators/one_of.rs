//! Enumeration combinator - membership in a fixed literal set

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::traits::Validate;
use crate::spec::Spec;
use crate::value::Value;

/// Succeeds if the value is member-equal to one of a fixed literal set.
///
/// Equality is [`Value`] equality: kinds never compare equal across
/// variants, so `Int(1)` is not a member of a set containing `Float(1.0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    values: Vec<Value>,
}

impl OneOf {
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl Validate for OneOf {
    fn check(&self, value: &Value, _ctx: &mut BindingContext<'_>) -> bool {
        self.values.iter().any(|member| member == value)
    }
}

/// Builds an enumeration specification from literal values.
#[must_use]
pub fn one_of(values: Vec<Value>) -> Spec {
    Spec::Checker(Arc::new(OneOf::new(values)))
}
