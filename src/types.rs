//! Runtime type lattice and type variables
//!
//! Rust has no ambient runtime subtype relation, so the engine carries an
//! explicit one. A [`TypeRegistry`] holds named types with single-inheritance
//! parent links and optional generic parameter lists, plus the type variables
//! those parameters refer to. Registration happens at start-up, before any
//! call is guarded; after that the registry is read-only and freely shared.
//!
//! Ids issued by a registry are only meaningful for that registry.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::value::Value;

// ============================================================================
// IDS
// ============================================================================

/// Handle to a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(pub(crate) u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// Handle to a registered type variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeVarId(pub(crate) u32);

/// Identity of one generic-typed receiver object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub(crate) u64);

/// A generic-typed receiver: its identity plus its declared type.
///
/// Instance-scope bindings are keyed by `id` in a side table, so holding a
/// `GenericInstance` never extends the lifetime of anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericInstance {
    pub id: InstanceId,
    pub ty: TypeId,
}

// ============================================================================
// DEFINITIONS
// ============================================================================

#[derive(Debug, Clone)]
struct TypeDef {
    name: String,
    parent: Option<TypeId>,
    params: Vec<TypeVarId>,
}

#[derive(Debug, Clone)]
struct TypeVarDef {
    name: String,
    bound: Option<TypeId>,
    constraints: Vec<TypeId>,
}

/// Well-known types every registry starts with.
///
/// `error` is the base for substitutable mismatch kinds; `input_error` and
/// `return_error` are the two built-in defaults.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub object: TypeId,
    pub null: TypeId,
    pub bool_: TypeId,
    pub int: TypeId,
    pub float: TypeId,
    pub str_: TypeId,
    pub list: TypeId,
    pub tuple: TypeId,
    pub map: TypeId,
    pub type_: TypeId,
    pub no_value: TypeId,
    pub error: TypeId,
    pub input_error: TypeId,
    pub return_error: TypeId,
}

// ============================================================================
// TYPE REGISTRY
// ============================================================================

/// Registry of runtime types, their subtype relation, and type variables.
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<TypeDef>,
    vars: Vec<TypeVarDef>,
    builtins: Builtins,
    next_instance: AtomicU64,
}

impl TypeRegistry {
    /// Creates a registry pre-populated with the built-in types.
    #[must_use]
    pub fn new() -> Self {
        let mut types = Vec::new();
        let mut add = |name: &str, parent: Option<TypeId>| {
            let id = TypeId(types.len() as u32);
            types.push(TypeDef {
                name: name.to_owned(),
                parent,
                params: Vec::new(),
            });
            id
        };
        let object = add("object", None);
        let builtins = Builtins {
            object,
            null: add("null", Some(object)),
            bool_: add("bool", Some(object)),
            int: add("int", Some(object)),
            float: add("float", Some(object)),
            str_: add("str", Some(object)),
            list: add("list", Some(object)),
            tuple: add("tuple", Some(object)),
            map: add("map", Some(object)),
            type_: add("type", Some(object)),
            no_value: add("no value", Some(object)),
            error: TypeId(0),
            input_error: TypeId(0),
            return_error: TypeId(0),
        };
        let error = add("error", Some(object));
        let input_error = add("input error", Some(error));
        let return_error = add("return error", Some(error));
        Self {
            types,
            vars: Vec::new(),
            builtins: Builtins {
                error,
                input_error,
                return_error,
                ..builtins
            },
            next_instance: AtomicU64::new(0),
        }
    }

    /// The well-known built-in type ids.
    #[must_use]
    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Registers a new non-generic type under `parent`.
    pub fn register(&mut self, name: impl Into<String>, parent: TypeId) -> TypeId {
        self.register_generic(name, parent, Vec::new())
    }

    /// Registers a new type under `parent` with declared generic parameters.
    pub fn register_generic(
        &mut self,
        name: impl Into<String>,
        parent: TypeId,
        params: Vec<TypeVarId>,
    ) -> TypeId {
        let name = name.into();
        let id = TypeId(self.types.len() as u32);
        debug!(%name, %id, "registering type");
        self.types.push(TypeDef {
            name,
            parent: Some(parent),
            params,
        });
        id
    }

    /// Registers an unconstrained type variable.
    pub fn typevar(&mut self, name: impl Into<String>) -> TypeVarId {
        self.typevar_full(name, None, Vec::new())
    }

    /// Registers a type variable whose binding must be assignable to `bound`.
    pub fn typevar_with_bound(&mut self, name: impl Into<String>, bound: TypeId) -> TypeVarId {
        self.typevar_full(name, Some(bound), Vec::new())
    }

    /// Registers a type variable whose binding must be assignable to at least
    /// one of `constraints`.
    pub fn typevar_with_constraints(
        &mut self,
        name: impl Into<String>,
        constraints: Vec<TypeId>,
    ) -> TypeVarId {
        self.typevar_full(name, None, constraints)
    }

    fn typevar_full(
        &mut self,
        name: impl Into<String>,
        bound: Option<TypeId>,
        constraints: Vec<TypeId>,
    ) -> TypeVarId {
        let id = TypeVarId(self.vars.len() as u32);
        self.vars.push(TypeVarDef {
            name: name.into(),
            bound,
            constraints,
        });
        id
    }

    /// Name of a registered type.
    #[must_use]
    pub fn name(&self, ty: TypeId) -> &str {
        &self.types[ty.0 as usize].name
    }

    /// Name of a registered type variable.
    #[must_use]
    pub fn var_name(&self, var: TypeVarId) -> &str {
        &self.vars[var.0 as usize].name
    }

    /// Declared generic parameters of a type.
    #[must_use]
    pub fn params_of(&self, ty: TypeId) -> &[TypeVarId] {
        &self.types[ty.0 as usize].params
    }

    /// True if the type declares generic parameters.
    #[must_use]
    pub fn is_generic(&self, ty: TypeId) -> bool {
        !self.params_of(ty).is_empty()
    }

    /// Declared bound of a type variable, if any.
    #[must_use]
    pub fn var_bound(&self, var: TypeVarId) -> Option<TypeId> {
        self.vars[var.0 as usize].bound
    }

    /// Declared constraint set of a type variable (empty when unconstrained).
    #[must_use]
    pub fn var_constraints(&self, var: TypeVarId) -> &[TypeId] {
        &self.vars[var.0 as usize].constraints
    }

    /// True if `sub` is `sup` or a (transitive) subtype of it.
    #[must_use]
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        let mut current = Some(sub);
        while let Some(ty) = current {
            if ty == sup {
                return true;
            }
            current = self.types[ty.0 as usize].parent;
        }
        false
    }

    /// Runtime type of a value.
    #[must_use]
    pub fn type_of(&self, value: &Value) -> TypeId {
        let b = &self.builtins;
        match value {
            Value::NoValue => b.no_value,
            Value::Null => b.null,
            Value::Bool(_) => b.bool_,
            Value::Int(_) => b.int,
            Value::Float(_) => b.float,
            Value::Str(_) => b.str_,
            Value::List(_) => b.list,
            Value::Tuple(_) => b.tuple,
            Value::Map(_) => b.map,
            Value::Record(r) => r.ty,
            Value::Type(_) => b.type_,
        }
    }

    /// Mints a fresh receiver identity for an instance of `ty`.
    #[must_use]
    pub fn new_instance(&self, ty: TypeId) -> GenericInstance {
        let id = InstanceId(self.next_instance.fetch_add(1, Ordering::Relaxed));
        GenericInstance { id, ty }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
