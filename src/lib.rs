//! callguard - runtime value checking for dynamically shaped call boundaries
//!
//! The engine validates the arguments and return values of wrapped callables
//! against declarative specifications. It is built from small pieces that
//! compose through one abstraction:
//!
//! * [`value::Value`] — the dynamic value model the checks run over.
//! * [`types::TypeRegistry`] — an explicit runtime type lattice with
//!   single-inheritance subtyping, generics, and type variables.
//! * [`spec::Spec`] — the declarative specification language.
//! * [`registry::ValidatorRegistry`] — ordered `(predicate, factory)` entries
//!   turning specifications into validators, extensible and shadowable.
//! * [`binding::BindingContext`] — per-call type-variable unification with a
//!   widen/narrow rule, plus receiver-scoped persistent bindings.
//! * [`guard`] — the wrapping step and the per-invocation check driver.
//! * [`combinators`] — any/all/none, enumeration, ranges, and sampling
//!   container checks over already-built validators.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use callguard::prelude::*;
//!
//! let engine = Arc::new(Engine::with_defaults());
//! let int = engine.types().builtins().int;
//! let signature = Signature::new("add")
//!     .param(Param::new("a").spec(Spec::Type(int)))
//!     .param(Param::new("b").spec(Spec::Type(int)).default_value(Value::Int(2)))
//!     .returns(Spec::Type(int));
//! let guarded = wrap(&engine, signature, callable, GuardOptions::default())?;
//! let sum = guarded.call(&CallArgs::positional(vec![Value::Int(10)]))?;
//! ```

pub mod binding;
pub mod combinators;
pub mod core;
pub mod guard;
pub mod prelude;
pub mod registry;
pub mod spec;
pub mod types;
pub mod validators;
pub mod value;

pub use binding::{BindingContext, InstanceBindings};
pub use crate::core::{CheckError, SharedValidator, SpecError, Validate};
pub use guard::{CallArgs, Callable, Engine, GuardOptions, Guarded, Param, Signature, wrap};
pub use registry::ValidatorRegistry;
pub use spec::{SeqKind, Spec};
pub use types::{Builtins, GenericInstance, TypeId, TypeRegistry, TypeVarId};
pub use value::{Record, Value, ValueKind};
