//! Sampling container combinators
//!
//! For large containers these check only a bounded number of elements,
//! trading soundness for speed. This is a deliberate, documented
//! incompleteness of the engine, not a bug: a sampled check that passes says
//! "no counterexample was found", not "all elements conform". Sequences are
//! sampled by reservoir over the interior with the first and last element
//! always included; mappings check their first entries in iteration order.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::binding::BindingContext;
use crate::core::error::SpecError;
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::{SeqKind, Spec};
use crate::value::Value;

/// Default number of elements checked per container.
pub const DEFAULT_CHECK_LIMIT: usize = 4;

// ============================================================================
// SEQUENCE OF
// ============================================================================

/// Homogeneous ordered-container combinator with bounded sampling.
pub struct SequenceOf {
    element: SharedValidator,
    kind: Option<SeqKind>,
    check_limit: usize,
}

impl SequenceOf {
    /// Accepts any ordered container (list or tuple).
    #[must_use]
    pub fn new(element: SharedValidator) -> Self {
        Self {
            element,
            kind: None,
            check_limit: DEFAULT_CHECK_LIMIT,
        }
    }

    /// Accepts lists only.
    #[must_use]
    pub fn list(element: SharedValidator) -> Self {
        Self {
            kind: Some(SeqKind::List),
            ..Self::new(element)
        }
    }

    /// Accepts tuples only.
    #[must_use]
    pub fn tuple(element: SharedValidator) -> Self {
        Self {
            kind: Some(SeqKind::Tuple),
            ..Self::new(element)
        }
    }

    /// Overrides how many elements are checked. Clamped to at least 2 so the
    /// first and last element can always be included.
    #[must_use]
    pub fn with_check_limit(mut self, limit: usize) -> Self {
        self.check_limit = limit.max(2);
        self
    }
}

impl Validate for SequenceOf {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        let (actual_kind, items) = match value {
            Value::List(items) => (SeqKind::List, items),
            Value::Tuple(items) => (SeqKind::Tuple, items),
            _ => return false,
        };
        if !SeqKind::admits(self.kind, actual_kind) {
            return false;
        }
        if items.len() <= self.check_limit {
            return items.iter().all(|item| self.element.check(item, ctx));
        }
        // Reservoir-sample the interior; first and last are always checked.
        let mut rng = rand::rng();
        let mut indices: SmallVec<[usize; 8]> =
            rand::seq::index::sample(&mut rng, items.len() - 2, self.check_limit - 2)
                .iter()
                .map(|i| i + 1)
                .collect();
        indices.push(0);
        indices.push(items.len() - 1);
        indices
            .iter()
            .all(|&i| self.element.check(&items[i], ctx))
    }
}

// ============================================================================
// MAP OF
// ============================================================================

/// Homogeneous mapping combinator with bounded checking.
pub struct MapOf {
    key: SharedValidator,
    value: SharedValidator,
    check_limit: usize,
}

impl MapOf {
    #[must_use]
    pub fn new(key: SharedValidator, value: SharedValidator) -> Self {
        Self {
            key,
            value,
            check_limit: DEFAULT_CHECK_LIMIT,
        }
    }

    /// Overrides how many entries are checked (at least 1).
    #[must_use]
    pub fn with_check_limit(mut self, limit: usize) -> Self {
        self.check_limit = limit.max(1);
        self
    }
}

impl Validate for MapOf {
    fn check(&self, value: &Value, ctx: &mut BindingContext<'_>) -> bool {
        let Value::Map(entries) = value else {
            return false;
        };
        entries
            .iter()
            .take(self.check_limit)
            .all(|(k, v)| self.key.check(k, ctx) && self.value.check(v, ctx))
    }
}

// ============================================================================
// SPEC CONSTRUCTORS
// ============================================================================

/// Homogeneous ordered-container specification (any container kind).
///
/// The free constructors use [`DEFAULT_CHECK_LIMIT`]; for a different limit
/// build the combinator directly and wrap it:
///
/// ```rust,ignore
/// let spec = Spec::checker(SequenceOf::list(element).with_check_limit(16));
/// ```
pub fn sequence_of(registry: &ValidatorRegistry, element: Spec) -> Result<Spec, SpecError> {
    Ok(Spec::Checker(Arc::new(SequenceOf::new(
        registry.create(&element)?,
    ))))
}

/// Homogeneous list specification.
pub fn list_of(registry: &ValidatorRegistry, element: Spec) -> Result<Spec, SpecError> {
    Ok(Spec::Checker(Arc::new(SequenceOf::list(
        registry.create(&element)?,
    ))))
}

/// Homogeneous tuple specification.
pub fn tuple_of(registry: &ValidatorRegistry, element: Spec) -> Result<Spec, SpecError> {
    Ok(Spec::Checker(Arc::new(SequenceOf::tuple(
        registry.create(&element)?,
    ))))
}

/// Homogeneous mapping specification.
pub fn map_of(registry: &ValidatorRegistry, key: Spec, value: Spec) -> Result<Spec, SpecError> {
    Ok(Spec::Checker(Arc::new(MapOf::new(
        registry.create(&key)?,
        registry.create(&value)?,
    ))))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeRegistry;

    fn int_check(types: &TypeRegistry) -> SharedValidator {
        ValidatorRegistry::new()
            .create(&Spec::Type(types.builtins().int))
            .unwrap()
    }

    #[test]
    fn small_sequences_are_checked_exhaustively() {
        let types = TypeRegistry::new();
        let check = SequenceOf::new(int_check(&types));
        let mut ctx = BindingContext::new(&types);

        assert!(check.check(&Value::List(vec![]), &mut ctx));
        assert!(check.check(&Value::List(vec![Value::Int(1)]), &mut ctx));
        let bad = Value::List(vec![Value::Int(1), Value::Str("x".into()), Value::Int(3)]);
        assert!(!check.check(&bad, &mut ctx));
    }

    #[test]
    fn first_and_last_are_always_sampled() {
        let types = TypeRegistry::new();
        let check = SequenceOf::new(int_check(&types));
        let mut ctx = BindingContext::new(&types);

        let mut items: Vec<Value> = (0..100).map(Value::Int).collect();
        items[99] = Value::Str("bad".into());
        assert!(!check.check(&Value::List(items.clone()), &mut ctx));
        items[99] = Value::Int(99);
        items[0] = Value::Str("bad".into());
        assert!(!check.check(&Value::List(items), &mut ctx));
    }

    #[test]
    fn sampling_may_miss_an_interior_offender() {
        // 1 bad element among 1000, limit 4: the two sampled interior slots
        // hit it rarely; over 30 runs at least one pass is all but certain.
        let types = TypeRegistry::new();
        let check = SequenceOf::new(int_check(&types));
        let mut ctx = BindingContext::new(&types);

        let mut items: Vec<Value> = (0..1000).map(Value::Int).collect();
        items[500] = Value::Str("bad".into());
        let big = Value::List(items);
        let passes = (0..30).filter(|_| check.check(&big, &mut ctx)).count();
        assert!(passes > 0);
    }

    #[test]
    fn sequence_check_limit_is_honored_and_clamped() {
        let types = TypeRegistry::new();
        let element = int_check(&types);
        let mut ctx = BindingContext::new(&types);

        // Limit 2 leaves no interior samples: only the endpoints are seen.
        let check = SequenceOf::new(element.clone()).with_check_limit(2);
        let mut items: Vec<Value> = (0..50).map(Value::Int).collect();
        for slot in items.iter_mut().take(49).skip(1) {
            *slot = Value::Str("bad".into());
        }
        assert!(check.check(&Value::List(items.clone()), &mut ctx));
        items[0] = Value::Str("bad".into());
        assert!(!check.check(&Value::List(items), &mut ctx));

        // Anything below 2 clamps up, keeping the endpoints checkable.
        let clamped = SequenceOf::new(element).with_check_limit(0);
        let mut items: Vec<Value> = (0..50).map(Value::Int).collect();
        items[49] = Value::Str("bad".into());
        assert!(!clamped.check(&Value::List(items), &mut ctx));
    }

    #[test]
    fn map_check_limit_is_honored() {
        let types = TypeRegistry::new();
        let b = *types.builtins();
        let registry = ValidatorRegistry::new();
        let check = MapOf::new(
            registry.create(&Spec::Type(b.str_)).unwrap(),
            registry.create(&Spec::Type(b.int)).unwrap(),
        )
        .with_check_limit(1);
        let mut ctx = BindingContext::new(&types);

        let second_bad = Value::Map(vec![
            (Value::Str("a".into()), Value::Int(1)),
            (Value::Str("b".into()), Value::Str("bad".into())),
        ]);
        assert!(check.check(&second_bad, &mut ctx));
        let first_bad = Value::Map(vec![
            (Value::Int(0), Value::Int(1)),
            (Value::Str("b".into()), Value::Int(2)),
        ]);
        assert!(!check.check(&first_bad, &mut ctx));
    }

    #[test]
    fn kind_restricted_constructors() {
        let types = TypeRegistry::new();
        let list_check = SequenceOf::list(int_check(&types));
        let tuple_check = SequenceOf::tuple(int_check(&types));
        let mut ctx = BindingContext::new(&types);

        let as_list = Value::List(vec![Value::Int(1)]);
        let as_tuple = Value::Tuple(vec![Value::Int(1)]);
        assert!(list_check.check(&as_list, &mut ctx));
        assert!(!list_check.check(&as_tuple, &mut ctx));
        assert!(tuple_check.check(&as_tuple, &mut ctx));
        assert!(!tuple_check.check(&as_list, &mut ctx));
    }

    #[test]
    fn map_of_checks_bounded_entries() {
        let types = TypeRegistry::new();
        let b = *types.builtins();
        let registry = ValidatorRegistry::new();
        let check = MapOf::new(
            registry.create(&Spec::Type(b.str_)).unwrap(),
            registry.create(&Spec::Type(b.int)).unwrap(),
        );
        let mut ctx = BindingContext::new(&types);

        let good = Value::Map(vec![
            (Value::Str("a".into()), Value::Int(1)),
            (Value::Str("b".into()), Value::Int(2)),
        ]);
        assert!(check.check(&good, &mut ctx));

        let bad_early = Value::Map(vec![(Value::Int(0), Value::Int(1))]);
        assert!(!check.check(&bad_early, &mut ctx));
        assert!(!check.check(&Value::Int(1), &mut ctx));

        // An offender beyond the check limit is deliberately not seen.
        let mut entries: Vec<(Value, Value)> = (0..10)
            .map(|i| (Value::Str(format!("k{i}")), Value::Int(i)))
            .collect();
        entries.push((Value::Str("bad".into()), Value::Str("bad".into())));
        assert!(check.check(&Value::Map(entries), &mut ctx));
    }
}
