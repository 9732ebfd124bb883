//! One-line import of the types most integrations touch.
//!
//! ```rust,ignore
//! use callguard::prelude::*;
//! ```

pub use crate::binding::{BindingContext, InstanceBindings};
pub use crate::combinators::{
    all_of, any_of, list_of, map_of, none_of, one_of, range, sequence_of, tuple_of,
};
pub use crate::core::{CheckError, SharedValidator, SpecError, Validate};
pub use crate::guard::{
    CallArgs, Callable, Engine, GuardOptions, Guarded, InvocationGuard, Param, Signature, wrap,
};
pub use crate::registry::ValidatorRegistry;
pub use crate::spec::{SeqKind, Spec};
pub use crate::types::{Builtins, GenericInstance, TypeId, TypeRegistry, TypeVarId};
pub use crate::validators::optional;
pub use crate::value::{Record, Value, ValueKind};
