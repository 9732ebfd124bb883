//! Attribute-presence validator

use crate::binding::BindingContext;
use crate::core::traits::Validate;
use crate::value::Value;

/// Accepts records and mappings that carry all of the named fields.
///
/// For records the field names are checked; for mappings the string keys.
/// Field values are not inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasFields {
    names: Vec<String>,
}

impl HasFields {
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validate for HasFields {
    fn check(&self, value: &Value, _ctx: &mut BindingContext<'_>) -> bool {
        match value {
            Value::Record(record) => self
                .names
                .iter()
                .all(|name| record.field(name).is_some()),
            Value::Map(entries) => self.names.iter().all(|name| {
                entries
                    .iter()
                    .any(|(k, _)| matches!(k, Value::Str(s) if s == name))
            }),
            _ => false,
        }
    }
}
