//! Regular-expression validator

use regex::Regex;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::Validate;
use crate::value::Value;

/// Accepts string values matched by a regular expression.
///
/// A pattern anchored with a trailing `$` additionally rejects values that
/// end in a newline, so the anchor cannot be satisfied by a line break the
/// author did not mean to admit.
#[derive(Debug, Clone)]
pub struct RegexMatch {
    regex: Regex,
    rejects_trailing_newline: bool,
}

impl RegexMatch {
    /// Compiles `pattern`; fails specification construction on a bad pattern.
    pub fn new(pattern: &str) -> Result<Self, SpecError> {
        let regex = Regex::new(pattern)
            .map_err(|e| SpecError::Invalid(format!("invalid regex pattern: {e}")))?;
        Ok(Self {
            regex,
            rejects_trailing_newline: pattern.ends_with('$'),
        })
    }
}

impl Validate for RegexMatch {
    fn check(&self, value: &Value, _ctx: &mut BindingContext<'_>) -> bool {
        match value {
            Value::Str(s) => {
                (!self.rejects_trailing_newline || !s.ends_with('\n')) && self.regex.is_match(s)
            }
            _ => false,
        }
    }
}
