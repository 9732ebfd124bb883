//! Specification-to-validator registry
//!
//! An ordered list of `(predicate, factory)` entries turns a declarative
//! [`Spec`] into an executable validator. Entries are tried in registration
//! order; [`ValidatorRegistry::register_first`] prepends, letting a more
//! specific recognizer shadow a more general one (the generic-container
//! recognizer must run before the plain-type recognizer, since a generic
//! type is also a type).
//!
//! Registration is additive-only and expected to happen during start-up,
//! before any invocation is guarded. For a given registered set and order,
//! [`ValidatorRegistry::create`] is a pure function of the specification.

use std::sync::Arc;

use tracing::debug;

use crate::core::error::SpecError;
use crate::core::traits::SharedValidator;
use crate::spec::Spec;
use crate::validators::{
    Anything, FixedMapping, FixedSequence, GenericContainer, PredicateFn, TypeMatch, TypeVarCheck,
};

type SpecPredicate = Arc<dyn Fn(&Spec) -> bool + Send + Sync>;
type ValidatorFactory =
    Arc<dyn Fn(&Spec, &ValidatorRegistry) -> Result<SharedValidator, SpecError> + Send + Sync>;

struct Entry {
    predicate: SpecPredicate,
    factory: ValidatorFactory,
}

/// Ordered registry of specification recognizers.
pub struct ValidatorRegistry {
    entries: Vec<Entry>,
}

impl ValidatorRegistry {
    /// A registry with no entries. Useful for tests and fully custom stacks.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A registry wired with the reference leaf family.
    ///
    /// Append order mirrors the canonical stack: plain types, fixed
    /// sequences, fixed mappings, predicates, anything-goes. The
    /// type-variable and generic-container recognizers are then prepended,
    /// so they shadow the plain-type entry (which deliberately also accepts
    /// generic specifications as a fallback).
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(
            |spec| matches!(spec, Spec::Type(_) | Spec::Generic { .. }),
            TypeMatch::from_spec,
        );
        registry.register(
            |spec| matches!(spec, Spec::FixedSeq { .. }),
            FixedSequence::from_spec,
        );
        registry.register(
            |spec| matches!(spec, Spec::FixedMap(_)),
            FixedMapping::from_spec,
        );
        registry.register(
            |spec| matches!(spec, Spec::Predicate(_)),
            PredicateFn::from_spec,
        );
        registry.register(|spec| matches!(spec, Spec::Anything), Anything::from_spec);
        registry.register_first(|spec| matches!(spec, Spec::Var(_)), TypeVarCheck::from_spec);
        registry.register_first(
            |spec| matches!(spec, Spec::Generic { .. }),
            GenericContainer::from_spec,
        );
        registry
    }

    /// Appends an entry; it is tried after every existing one.
    pub fn register<P, F>(&mut self, predicate: P, factory: F)
    where
        P: Fn(&Spec) -> bool + Send + Sync + 'static,
        F: Fn(&Spec, &ValidatorRegistry) -> Result<SharedValidator, SpecError>
            + Send
            + Sync
            + 'static,
    {
        debug!(entries = self.entries.len() + 1, "registering recognizer");
        self.entries.push(Entry {
            predicate: Arc::new(predicate),
            factory: Arc::new(factory),
        });
    }

    /// Prepends an entry; it is tried before every existing one.
    pub fn register_first<P, F>(&mut self, predicate: P, factory: F)
    where
        P: Fn(&Spec) -> bool + Send + Sync + 'static,
        F: Fn(&Spec, &ValidatorRegistry) -> Result<SharedValidator, SpecError>
            + Send
            + Sync
            + 'static,
    {
        debug!(entries = self.entries.len() + 1, "prepending recognizer");
        self.entries.insert(
            0,
            Entry {
                predicate: Arc::new(predicate),
                factory: Arc::new(factory),
            },
        );
    }

    /// Builds the validator for a specification.
    ///
    /// An already-built validator is returned unchanged (idempotence). The
    /// first entry whose predicate accepts the specification builds it;
    /// when none matches the result is [`SpecError::Unrecognized`].
    pub fn create(&self, spec: &Spec) -> Result<SharedValidator, SpecError> {
        if let Spec::Checker(validator) = spec {
            return Ok(validator.clone());
        }
        for entry in &self.entries {
            if (entry.predicate)(spec) {
                return (entry.factory)(spec, self);
            }
        }
        Err(SpecError::Unrecognized {
            spec: format!("{spec:?}"),
        })
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("entries", &self.entries.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
