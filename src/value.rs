//! Dynamic value model
//!
//! Every argument and return value that flows through a guard is a [`Value`].
//! The model is deliberately closed: a tagged enum of the shapes the engine
//! knows how to inspect, plus [`Value::NoValue`], the marker that
//! distinguishes "argument omitted" from "argument explicitly null".

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::TypeId;

// ============================================================================
// VALUE
// ============================================================================

/// A dynamically typed value.
///
/// `NoValue` is the omitted-argument sentinel; it is distinct from `Null` so
/// that "optional" and "missing" never collapse into "present but null".
/// `Type` reifies a registered type as a value, which lets the engine validate
/// its own configuration (e.g. error-kind overrides) with ordinary validators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Argument-not-supplied sentinel.
    NoValue,
    /// Explicit null.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Order-preserving key/value pairs.
    Map(Vec<(Value, Value)>),
    /// Instance of a user-registered type.
    Record(Record),
    /// A reified registered type.
    Type(TypeId),
}

/// An instance of a user-registered type: its runtime type plus named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub ty: TypeId,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(ty: TypeId, fields: Vec<(String, Value)>) -> Self {
        Self { ty, fields }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Shape tag of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    NoValue,
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Tuple,
    Map,
    Record,
    Type,
}

impl Value {
    /// Returns the shape tag of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::NoValue => ValueKind::NoValue,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Map(_) => ValueKind::Map,
            Value::Record(_) => ValueKind::Record,
            Value::Type(_) => ValueKind::Type,
        }
    }

    /// True for scalar kinds with a total ordering (`Int`, `Float`, `Str`).
    ///
    /// Only these are admissible as range bounds.
    #[must_use]
    pub fn is_ordered_scalar(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Str(_))
    }

    /// Compares two values of the same kind.
    ///
    /// Returns `None` for kind mismatches, unordered kinds, and NaN.
    #[must_use]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

// Float payloads compare bitwise-by-value (NaN != NaN), all other payloads
// structurally. Kinds never compare equal across variants: Int(1) != Float(1.0).
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::NoValue, Value::NoValue) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::NoValue => write!(f, "<no value>"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => write_seq(f, "[", items, "]"),
            Value::Tuple(items) => write_seq(f, "(", items, ")"),
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Record(r) => {
                write!(f, "<{} instance {{", r.ty)?;
                for (i, (n, v)) in r.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{n}: {v}")?;
                }
                write!(f, "}}>")
            }
            Value::Type(t) => write!(f, "<{t}>"),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

// ============================================================================
// TESTS
// ============================================================================
