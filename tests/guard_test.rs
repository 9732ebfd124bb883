//! End-to-end wrapping and invocation behavior.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use callguard::prelude::*;

fn adder() -> Callable {
    Arc::new(|args: &CallArgs| {
        let get = |i: usize, name: &str, default: i64| {
            args.positional
                .get(i)
                .or_else(|| {
                    args.named
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, v)| v)
                })
                .and_then(|v| match v {
                    Value::Int(n) => Some(*n),
                    _ => None,
                })
                .unwrap_or(default)
        };
        Value::Int(get(0, "a", 0) + get(1, "b", 2))
    })
}

fn add_signature(engine: &Engine) -> Signature {
    let int = engine.types().builtins().int;
    Signature::new("add")
        .param(Param::new("a").spec(Spec::Type(int)))
        .param(
            Param::new("b")
                .spec(Spec::Type(int))
                .default_value(Value::Int(2)),
        )
        .returns(Spec::Type(int))
}

#[test]
fn both_arguments_supplied_and_valid() {
    let engine = Arc::new(Engine::with_defaults());
    let guarded = wrap(
        &engine,
        add_signature(&engine),
        adder(),
        GuardOptions::default(),
    )
    .unwrap();
    let result = guarded.call(&CallArgs::positional(vec![Value::Int(10), Value::Int(20)]));
    assert_eq!(result, Ok(Value::Int(30)));
}

#[test]
fn wrong_type_for_second_argument_names_it() {
    let engine = Arc::new(Engine::with_defaults());
    let guarded = wrap(
        &engine,
        add_signature(&engine),
        adder(),
        GuardOptions::default(),
    )
    .unwrap();
    let err = guarded
        .call(&CallArgs::positional(vec![
            Value::Int(10),
            Value::Float(20.0),
        ]))
        .unwrap_err();
    match &err {
        CheckError::InputMismatch { callable, param, .. } => {
            assert_eq!(callable, "add");
            assert_eq!(param, "b");
        }
        other => panic!("expected an input mismatch, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "add() has got an incompatible value for b: 20"
    );
}

#[test]
fn omitted_argument_uses_its_default() {
    let engine = Arc::new(Engine::with_defaults());
    let guarded = wrap(
        &engine,
        add_signature(&engine),
        adder(),
        GuardOptions::default(),
    )
    .unwrap();
    let result = guarded.call(&CallArgs::positional(vec![Value::Int(10)]));
    assert_eq!(result, Ok(Value::Int(12)));
}

#[test]
fn named_arguments_reach_positional_parameters() {
    let engine = Arc::new(Engine::with_defaults());
    let guarded = wrap(
        &engine,
        add_signature(&engine),
        adder(),
        GuardOptions::default(),
    )
    .unwrap();
    let result = guarded.call(
        &CallArgs::default()
            .named("a", Value::Int(3))
            .named("b", Value::Int(4)),
    );
    assert_eq!(result, Ok(Value::Int(7)));

    let err = guarded
        .call(
            &CallArgs::default()
                .named("a", Value::Int(3))
                .named("b", Value::Str("4".into())),
        )
        .unwrap_err();
    assert!(matches!(err, CheckError::InputMismatch { ref param, .. } if param == "b"));
}

#[test]
fn default_violating_its_own_specification_fails_at_wrap_time() {
    let engine = Arc::new(Engine::with_defaults());
    let b = *engine.types().builtins();
    // b: str = 10
    let signature = Signature::new("greet")
        .param(Param::new("a").spec(Spec::Type(b.str_)))
        .param(
            Param::new("b")
                .spec(Spec::Type(b.str_))
                .default_value(Value::Int(10)),
        );
    let err = wrap(&engine, signature, adder(), GuardOptions::default()).unwrap_err();
    assert!(
        matches!(err, SpecError::DefaultMismatch { ref callable, ref param }
            if callable == "greet" && param == "b")
    );
}

#[test]
fn omitted_argument_without_default_is_checked_as_the_sentinel() {
    let engine = Arc::new(Engine::with_defaults());
    let registry = engine.validators();
    let int = engine.types().builtins().int;
    let maybe_int = optional(registry, Spec::Type(int)).unwrap();

    let echo: Callable = Arc::new(|args: &CallArgs| {
        args.positional.first().cloned().unwrap_or(Value::Null)
    });

    // Mandatory slot: omission fails.
    let strict = Signature::new("strict").param(Param::new("a").spec(Spec::Type(int)));
    let guarded = wrap(&engine, strict, echo.clone(), GuardOptions::default()).unwrap();
    let err = guarded.call(&CallArgs::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "strict() has got an incompatible value for a: <no value>"
    );

    // Optional slot: omission passes.
    let lax = Signature::new("lax").param(Param::new("a").spec(maybe_int));
    let guarded = wrap(&engine, lax, echo, GuardOptions::default()).unwrap();
    assert_eq!(guarded.call(&CallArgs::default()), Ok(Value::Null));
}

#[test]
fn empty_string_is_rendered_visibly_in_messages() {
    let engine = Arc::new(Engine::with_defaults());
    let int = engine.types().builtins().int;
    let constant: Callable = Arc::new(|_| Value::Str(String::new()));
    let signature = Signature::new("total").returns(Spec::Type(int));
    let guarded = wrap(&engine, signature, constant, GuardOptions::default()).unwrap();
    let err = guarded.call(&CallArgs::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "total() has returned an incompatible value: ''"
    );
}

#[test]
fn disabling_affects_only_subsequent_wraps() {
    let engine = Arc::new(Engine::with_defaults());
    let checked = wrap(
        &engine,
        add_signature(&engine),
        adder(),
        GuardOptions::default(),
    )
    .unwrap();

    engine.disable();

    // New declarations come back unwrapped, even with an invalid override.
    let bad_options = GuardOptions {
        input_error: Some(engine.types().builtins().int),
        return_error: None,
    };
    let unwrapped = wrap(&engine, add_signature(&engine), adder(), bad_options).unwrap();
    assert!(!unwrapped.is_checked());
    assert_eq!(
        unwrapped.call(&CallArgs::positional(vec![Value::Str("x".into())])),
        Ok(Value::Int(2))
    );

    // The earlier wrap keeps checking.
    assert!(checked.is_checked());
    let err = checked
        .call(&CallArgs::positional(vec![Value::Str("x".into())]))
        .unwrap_err();
    assert!(matches!(err, CheckError::InputMismatch { .. }));

    // Re-enabling restores checking for new declarations.
    engine.enable();
    let rewrapped = wrap(
        &engine,
        add_signature(&engine),
        adder(),
        GuardOptions::default(),
    )
    .unwrap();
    assert!(rewrapped.is_checked());
}

#[test]
fn error_kinds_can_be_substituted_per_callable() {
    let mut types = TypeRegistry::new();
    let error = types.builtins().error;
    let arg_error = types.register("argument error", error);
    let result_error = types.register("result error", error);
    let engine = Arc::new(Engine::new(types, ValidatorRegistry::new()));

    let options = GuardOptions {
        input_error: Some(arg_error),
        return_error: Some(result_error),
    };
    let bad_return: Callable = Arc::new(|_| Value::Str("nope".into()));
    let guarded = wrap(&engine, add_signature(&engine), bad_return, options).unwrap();

    let err = guarded
        .call(&CallArgs::positional(vec![Value::Str("x".into())]))
        .unwrap_err();
    assert_eq!(err.kind(), arg_error);

    let err = guarded
        .call(&CallArgs::positional(vec![Value::Int(1)]))
        .unwrap_err();
    assert_eq!(err.kind(), result_error);
}

#[test]
fn override_must_be_a_registered_error_subtype() {
    let engine = Arc::new(Engine::with_defaults());
    let options = GuardOptions {
        input_error: None,
        return_error: Some(engine.types().builtins().str_),
    };
    let err = wrap(&engine, add_signature(&engine), adder(), options).unwrap_err();
    assert!(matches!(err, SpecError::Invalid(_)));
}

#[test]
fn default_error_kinds_are_the_builtin_pair() {
    let engine = Arc::new(Engine::with_defaults());
    let b = *engine.types().builtins();
    let bad_return: Callable = Arc::new(|_| Value::Null);
    let guarded = wrap(
        &engine,
        add_signature(&engine),
        bad_return,
        GuardOptions::default(),
    )
    .unwrap();

    let err = guarded
        .call(&CallArgs::positional(vec![Value::Null]))
        .unwrap_err();
    assert_eq!(err.kind(), b.input_error);

    let err = guarded
        .call(&CallArgs::positional(vec![Value::Int(1)]))
        .unwrap_err();
    assert_eq!(err.kind(), b.return_error);
}

#[test]
fn unrecognized_specification_is_reported_for_its_slot() {
    let engine = Arc::new(Engine::new(TypeRegistry::new(), ValidatorRegistry::empty()));
    let signature =
        Signature::new("orphan").param(Param::new("a").spec(Spec::Anything));
    let err = wrap(&engine, signature, adder(), GuardOptions::default()).unwrap_err();
    assert!(
        matches!(err, SpecError::InvalidForSlot { ref callable, ref slot, .. }
            if callable == "orphan" && slot == "a")
    );
}
