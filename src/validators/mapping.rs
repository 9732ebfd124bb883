//! Fixed-mapping validator

use std::sync::Arc;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::Spec;
use crate::value::Value;

/// Key-by-key validation of a mapping of known shape.
///
/// The value must be a mapping — or a record, which is convertible to one —
/// of exactly the same size, with every key present in the specification and
/// its value matching the key's sub-validator.
pub struct FixedMapping {
    checks: Vec<(Value, SharedValidator)>,
}

impl FixedMapping {
    #[must_use]
    pub fn new(checks: Vec<(Value, SharedValidator)>) -> Self {
        Self { checks }
    }

    pub(crate) fn from_spec(
        spec: &Spec,
        registry: &ValidatorRegistry,
    ) -> Result<SharedValidator, SpecError> {
        match spec {
            Spec::FixedMap(entries) => {
                let checks = entries
                    .iter()
                    .map(|(key, sub)| Ok((key.clone(), registry.create(sub)?)))
                    .collect::<Result<Vec<_>, SpecError>>()?;
                Ok(Arc::new(FixedMapping::new(checks)))
            }
            other => Err(SpecError::Unrecognized {
                spec: format!("{other:?}"),
            }),
        }
    }

    fn check_for(&self, key: &Value) -> Option<&SharedValidator> {
        self.checks
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, check)| check)
    }
}

impl Validate for FixedMapping {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        let converted;
        let entries: &[(Value, Value)] = match value {
            Value::Map(entries) => entries,
            Value::Record(record) => {
                converted = record
                    .fields
                    .iter()
                    .map(|(name, v)| (Value::Str(name.clone()), v.clone()))
                    .collect::<Vec<_>>();
                &converted
            }
            _ => return false,
        };
        if entries.len() != self.checks.len() {
            return false;
        }
        entries.iter().all(|(key, v)| {
            self.check_for(key)
                .is_some_and(|check| check.check(v, ctx))
        })
    }
}
