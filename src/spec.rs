//! Declarative specifications
//!
//! A [`Spec`] describes what values are acceptable at one parameter or
//! return slot. It is an explicit tagged variant rather than an opaque
//! duck-typed value: the registry's predicates dispatch over these tags, and
//! external code extends the system by registering new `(predicate,
//! factory)` entries over them — including entries for tags the default
//! wiring already covers, shadowed by registration order.
//!
//! Specifications are immutable once declared; a validator built from one
//! never changes which specification it represents.

use std::fmt;
use std::sync::Arc;

use crate::core::traits::{SharedValidator, Validate};
use crate::types::{TypeId, TypeVarId};
use crate::value::Value;

/// Shared boolean predicate over values.
pub type SharedPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Concrete container kind of an ordered-sequence specification.
///
/// `None` in [`Spec::FixedSeq`] means "any ordered container"; a concrete
/// kind additionally requires the value's container kind to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqKind {
    List,
    Tuple,
}

impl SeqKind {
    /// True if a value of this concrete kind is acceptable where `declared`
    /// is required (`None` declares no kind requirement).
    #[must_use]
    pub fn admits(declared: Option<SeqKind>, actual: SeqKind) -> bool {
        declared.is_none_or(|k| k == actual)
    }
}

/// A declarative description of acceptable values.
#[derive(Clone)]
pub enum Spec {
    /// No constraint; every value passes.
    Anything,
    /// Runtime type is the given type or a subtype of it.
    Type(TypeId),
    /// Generic container: instance of `ty` with content described by `args`.
    Generic { ty: TypeId, args: Vec<Spec> },
    /// A type variable, unified through the binding context.
    Var(TypeVarId),
    /// Ordered container with element-wise sub-specifications.
    FixedSeq {
        kind: Option<SeqKind>,
        items: Vec<Spec>,
    },
    /// Mapping with per-key sub-specifications; size must match exactly.
    FixedMap(Vec<(Value, Spec)>),
    /// Arbitrary boolean predicate over the value.
    Predicate(SharedPredicate),
    /// An already-built validator; `create` returns it unchanged.
    Checker(SharedValidator),
}

impl Spec {
    /// Wraps a boolean predicate function.
    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Spec {
        Spec::Predicate(Arc::new(f))
    }

    /// Wraps an already-built validator.
    pub fn checker(validator: impl Validate + 'static) -> Spec {
        Spec::Checker(Arc::new(validator))
    }

    /// An ordered-container specification with no kind requirement.
    #[must_use]
    pub fn seq(items: Vec<Spec>) -> Spec {
        Spec::FixedSeq { kind: None, items }
    }

    /// An ordered-container specification that only admits lists.
    #[must_use]
    pub fn list(items: Vec<Spec>) -> Spec {
        Spec::FixedSeq {
            kind: Some(SeqKind::List),
            items,
        }
    }

    /// An ordered-container specification that only admits tuples.
    #[must_use]
    pub fn tuple(items: Vec<Spec>) -> Spec {
        Spec::FixedSeq {
            kind: Some(SeqKind::Tuple),
            items,
        }
    }

    /// A fixed-mapping specification.
    #[must_use]
    pub fn map(entries: Vec<(Value, Spec)>) -> Spec {
        Spec::FixedMap(entries)
    }
}

impl From<TypeId> for Spec {
    fn from(ty: TypeId) -> Self {
        Spec::Type(ty)
    }
}

impl From<TypeVarId> for Spec {
    fn from(var: TypeVarId) -> Self {
        Spec::Var(var)
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Anything => write!(f, "Anything"),
            Spec::Type(ty) => write!(f, "Type({ty})"),
            Spec::Generic { ty, args } => f
                .debug_struct("Generic")
                .field("ty", ty)
                .field("args", args)
                .finish(),
            Spec::Var(var) => write!(f, "Var({var:?})"),
            Spec::FixedSeq { kind, items } => f
                .debug_struct("FixedSeq")
                .field("kind", kind)
                .field("items", items)
                .finish(),
            Spec::FixedMap(entries) => f.debug_tuple("FixedMap").field(entries).finish(),
            Spec::Predicate(_) => write!(f, "Predicate(..)"),
            Spec::Checker(v) => write!(f, "Checker({})", v.name()),
        }
    }
}
