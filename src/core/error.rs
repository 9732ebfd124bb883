//! Error taxonomy
//!
//! Two families, strictly separated by when they can occur:
//!
//! * [`SpecError`] — definition time. A specification that cannot be turned
//!   into a validator, or a default value that violates its own
//!   specification. Always fatal to that declaration; never raised at call
//!   time and never retried.
//! * [`CheckError`] — call time. An argument or return value failed its
//!   validator. Raised to the caller of the guarded callable; the framework
//!   performs no logging, retry, or recovery of its own.
//!
//! Unification failures inside the binding context surface as an
//! [`CheckError::InputMismatch`] on the parameter whose check triggered them,
//! not as a separate kind.

use serde::Serialize;
use thiserror::Error;

use crate::types::TypeId;
use crate::value::Value;

// ============================================================================
// DEFINITION-TIME ERRORS
// ============================================================================

/// A specification problem, detected while a callable is being wrapped.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum SpecError {
    /// No registered `(predicate, factory)` entry recognizes the
    /// specification.
    #[error("no registered validator recognizes specification {spec}")]
    Unrecognized { spec: String },

    /// A nested specification could not be resolved for a particular
    /// parameter or the return slot.
    #[error("{callable}() has an invalid specification for {slot}: {reason}")]
    InvalidForSlot {
        callable: String,
        slot: String,
        reason: String,
    },

    /// A declared default value fails the very specification declared for it.
    #[error("the default value for {param} of {callable}() is incompatible with its specification")]
    DefaultMismatch { callable: String, param: String },

    /// A malformed specification constituent (bad range bounds, invalid
    /// regex, non-error override type, ...).
    #[error("invalid specification: {0}")]
    Invalid(String),
}

// ============================================================================
// CALL-TIME ERRORS
// ============================================================================

/// A mismatch detected during one guarded invocation.
///
/// `kind` is the configured error type for the failing slot (defaults to the
/// built-in `input error` / `return error` types); integrators substitute
/// their own registered error subtypes per wrapped callable and dispatch on
/// it.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum CheckError {
    /// An argument failed its validator.
    #[error("{callable}() has got an incompatible value for {param}: {value}")]
    InputMismatch {
        callable: String,
        param: String,
        value: String,
        kind: TypeId,
    },

    /// The result failed the return-slot validator.
    #[error("{callable}() has returned an incompatible value: {value}")]
    ReturnMismatch {
        callable: String,
        value: String,
        kind: TypeId,
    },
}

impl CheckError {
    /// The substitutable error kind carried by this mismatch.
    #[must_use]
    pub fn kind(&self) -> TypeId {
        match self {
            CheckError::InputMismatch { kind, .. } | CheckError::ReturnMismatch { kind, .. } => {
                *kind
            }
        }
    }
}

// ============================================================================
// MESSAGE RENDERING
// ============================================================================

/// Renders a value for an error message.
///
/// The empty string renders as the two-character sequence `''` so the message
/// never ends in an invisible blank.
#[must_use]
pub fn render(value: &Value) -> String {
    match value {
        Value::Str(s) if s.is_empty() => "''".to_owned(),
        other => other.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
