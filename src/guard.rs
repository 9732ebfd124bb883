//! Invocation guard
//!
//! Wrapping a callable resolves each declared specification to a validator
//! once, verifies every declared default against its own specification, and
//! yields a [`Guarded`] that checks arguments and the return value on every
//! call. Checking is driven by one fresh [`BindingContext`] per call, linked
//! to the receiver when the receiver's declared type is generic.
//!
//! The [`Engine`] is the explicit shared configuration replacing an ambient
//! global switch: wrapping consults its enabled flag once, so callables
//! wrapped before a change keep the behavior they had at wrap time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::binding::{BindingContext, InstanceBindings};
use crate::core::error::{CheckError, SpecError, render};
use crate::core::traits::{SharedValidator, Validate};
use crate::registry::ValidatorRegistry;
use crate::spec::Spec;
use crate::types::{GenericInstance, TypeId, TypeRegistry};
use crate::validators::{Optional, PredicateFn};
use crate::value::Value;

// ============================================================================
// ENGINE
// ============================================================================

/// Shared configuration of one checking domain: the type lattice, the
/// specification registry, the instance-scope binding table, and the
/// enable/disable switch.
///
/// Build the registries at start-up, then share the engine behind an [`Arc`]
/// for the lifetime of the process.
#[derive(Debug)]
pub struct Engine {
    types: TypeRegistry,
    validators: ValidatorRegistry,
    instances: InstanceBindings,
    enabled: AtomicBool,
}

impl Engine {
    #[must_use]
    pub fn new(types: TypeRegistry, validators: ValidatorRegistry) -> Self {
        Self {
            types,
            validators,
            instances: InstanceBindings::new(),
            enabled: AtomicBool::new(true),
        }
    }

    /// An engine over the built-in types and the reference validator family.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(TypeRegistry::new(), ValidatorRegistry::new())
    }

    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    #[must_use]
    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    #[must_use]
    pub fn instances(&self) -> &InstanceBindings {
        &self.instances
    }

    /// Checking state consulted by [`wrap`]. Enabled by default.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Disables checking for callables wrapped from now on; callables
    /// already wrapped keep the behavior they had at wrap time.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }
}

// ============================================================================
// SIGNATURE DESCRIPTION
// ============================================================================

/// One declared parameter: name, optional specification, optional default.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub spec: Option<Spec>,
    pub default: Option<Value>,
}

impl Param {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: None,
            default: None,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn spec(mut self, spec: impl Into<Spec>) -> Self {
        self.spec = Some(spec.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Explicit description of a callable's parameter list and return slot.
///
/// Constructed once by the integration layer; the guard never derives it by
/// introspecting a live function value.
#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Option<Spec>,
}

impl Signature {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn returns(mut self, spec: impl Into<Spec>) -> Self {
        self.returns = Some(spec.into());
        self
    }

    fn has_specs(&self) -> bool {
        self.returns.is_some() || self.params.iter().any(|p| p.spec.is_some())
    }
}

// ============================================================================
// CALL ARGUMENTS
// ============================================================================

/// Arguments of one invocation: positional values, named values, and the
/// receiver for bound-method calls.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub named: Vec<(String, Value)>,
    pub receiver: Option<GenericInstance>,
}

impl CallArgs {
    #[must_use]
    pub fn positional(values: Vec<Value>) -> Self {
        Self {
            positional: values,
            ..Self::default()
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn named(mut self, name: impl Into<String>, value: Value) -> Self {
        self.named.push((name.into(), value));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn on(mut self, receiver: GenericInstance) -> Self {
        self.receiver = Some(receiver);
        self
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// The wrapped computation. Receives the original arguments unmodified.
pub type Callable = Arc<dyn Fn(&CallArgs) -> Value + Send + Sync>;

// ============================================================================
// WRAPPING
// ============================================================================

/// Per-callable overrides for the error kinds carried by mismatches.
///
/// Each override must be a registered subtype of the built-in `error` type;
/// the overrides are themselves validated via the validator mechanism.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardOptions {
    pub input_error: Option<TypeId>,
    pub return_error: Option<TypeId>,
}

/// A callable after the wrapping step.
pub enum Guarded {
    /// Checking applies on every call.
    Checked(InvocationGuard),
    /// Returned unwrapped: checking disabled or nothing declared. Zero
    /// per-call overhead.
    Passthrough(Callable),
}

impl std::fmt::Debug for Guarded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Guarded::Checked(_) => f.write_str("Guarded::Checked"),
            Guarded::Passthrough(_) => f.write_str("Guarded::Passthrough"),
        }
    }
}

impl Guarded {
    /// Invokes the callable, checking arguments and result when guarded.
    pub fn call(&self, args: &CallArgs) -> Result<Value, CheckError> {
        match self {
            Guarded::Checked(guard) => guard.call(args),
            Guarded::Passthrough(callable) => Ok(callable(args)),
        }
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        matches!(self, Guarded::Checked(_))
    }
}

struct GuardedParam {
    name: String,
    validator: Option<SharedValidator>,
    has_default: bool,
}

/// The wrapper around one declared callable.
pub struct InvocationGuard {
    engine: Arc<Engine>,
    name: String,
    params: Vec<GuardedParam>,
    returns: Option<SharedValidator>,
    callable: Callable,
    input_kind: TypeId,
    return_kind: TypeId,
}

/// Wraps `callable` so every invocation is checked against `signature`.
///
/// Definition-time work, done exactly once per declared callable:
/// validators are resolved for every annotated slot, every declared default
/// is checked against its own specification with a throwaway context, and
/// the error-kind overrides are validated. Any failure here is a
/// [`SpecError`] — fatal to the declaration, never retried.
///
/// When the engine is disabled, or the signature declares no specification
/// at all, the callable is returned unwrapped.
pub fn wrap(
    engine: &Arc<Engine>,
    signature: Signature,
    callable: Callable,
    options: GuardOptions,
) -> Result<Guarded, SpecError> {
    if !engine.is_enabled() || !signature.has_specs() {
        debug!(callable = %signature.name, "returning callable unwrapped");
        return Ok(Guarded::Passthrough(callable));
    }

    let input_kind = resolve_error_kind(
        engine,
        options.input_error,
        engine.types().builtins().input_error,
        "input_error",
    )?;
    let return_kind = resolve_error_kind(
        engine,
        options.return_error,
        engine.types().builtins().return_error,
        "return_error",
    )?;

    let mut params = Vec::with_capacity(signature.params.len());
    for param in &signature.params {
        let validator = match &param.spec {
            Some(spec) => Some(resolve_slot(engine, &signature.name, &param.name, spec)?),
            None => None,
        };
        if let (Some(validator), Some(default)) = (&validator, &param.default) {
            let mut scratch = BindingContext::new(engine.types());
            if !validator.check(default, &mut scratch) {
                return Err(SpecError::DefaultMismatch {
                    callable: signature.name.clone(),
                    param: param.name.clone(),
                });
            }
        }
        params.push(GuardedParam {
            name: param.name.clone(),
            validator,
            has_default: param.default.is_some(),
        });
    }
    let returns = match &signature.returns {
        Some(spec) => Some(resolve_slot(engine, &signature.name, "return", spec)?),
        None => None,
    };

    debug!(callable = %signature.name, "guard constructed");
    Ok(Guarded::Checked(InvocationGuard {
        engine: engine.clone(),
        name: signature.name,
        params,
        returns,
        callable,
        input_kind,
        return_kind,
    }))
}

fn resolve_slot(
    engine: &Engine,
    callable: &str,
    slot: &str,
    spec: &Spec,
) -> Result<SharedValidator, SpecError> {
    engine
        .validators()
        .create(spec)
        .map_err(|e| SpecError::InvalidForSlot {
            callable: callable.to_owned(),
            slot: slot.to_owned(),
            reason: e.to_string(),
        })
}

// The override slot is validated with the framework's own machinery: an
// optional(is-error-type) validator applied to the reified override type.
fn resolve_error_kind(
    engine: &Arc<Engine>,
    override_ty: Option<TypeId>,
    default: TypeId,
    slot: &str,
) -> Result<TypeId, SpecError> {
    let error_base = engine.types().builtins().error;
    let shared = engine.clone();
    let is_error_type = PredicateFn::new(move |v| {
        matches!(v, Value::Type(t) if shared.types().is_subtype(*t, error_base))
    });
    let check = Optional::new(Arc::new(is_error_type));
    let reified = override_ty.map_or(Value::NoValue, Value::Type);
    let mut scratch = BindingContext::new(engine.types());
    if !check.check(&reified, &mut scratch) {
        return Err(SpecError::Invalid(format!(
            "{slot} override {reified} is not an error type"
        )));
    }
    Ok(override_ty.unwrap_or(default))
}

// ============================================================================
// PER-CALL CHECKING
// ============================================================================

impl InvocationGuard {
    /// Name of the wrapped callable.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks the arguments, invokes the callable, checks the result.
    pub fn call(&self, args: &CallArgs) -> Result<Value, CheckError> {
        let mut ctx = self.context_for(args);

        // Positional arguments.
        for (param, value) in self.params.iter().zip(&args.positional) {
            if let Some(validator) = &param.validator
                && !validator.check(value, &mut ctx)
            {
                return Err(self.input_mismatch(&param.name, value));
            }
        }

        // Named arguments, including parameters also reachable positionally.
        for (index, param) in self.params.iter().enumerate() {
            let Some(validator) = &param.validator else {
                continue;
            };
            match args.lookup(&param.name) {
                Some(value) => {
                    if !validator.check(value, &mut ctx) {
                        return Err(self.input_mismatch(&param.name, value));
                    }
                }
                None => {
                    if index < args.positional.len() || param.has_default {
                        // Checked positionally above, or the default was
                        // verified once at wrap time.
                        continue;
                    }
                    if !validator.check(&Value::NoValue, &mut ctx) {
                        return Err(self.input_mismatch(&param.name, &Value::NoValue));
                    }
                }
            }
        }

        // The underlying callable sees the original arguments, unmodified.
        let result = (self.callable)(args);

        if let Some(validator) = &self.returns
            && !validator.check(&result, &mut ctx)
        {
            return Err(CheckError::ReturnMismatch {
                callable: self.name.clone(),
                value: render(&result),
                kind: self.return_kind,
            });
        }
        Ok(result)
    }

    fn context_for(&self, args: &CallArgs) -> BindingContext<'_> {
        match args.receiver {
            Some(receiver) if self.engine.types().is_generic(receiver.ty) => {
                BindingContext::for_receiver(
                    self.engine.types(),
                    receiver,
                    self.engine.instances(),
                )
            }
            _ => BindingContext::new(self.engine.types()),
        }
    }

    fn input_mismatch(&self, param: &str, value: &Value) -> CheckError {
        CheckError::InputMismatch {
            callable: self.name.clone(),
            param: param.to_owned(),
            value: render(value),
            kind: self.input_kind,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
