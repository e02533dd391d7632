use crate::expander::{SignatureKind, expand};
use extdts_common::RenderError;
use extdts_schema::{FunctionType, Primitive, Property, RefType, Type};

fn param(name: &str, optional: bool) -> Property {
    Property::new(name, Type::string()).optional(optional)
}

fn names(params: &[Property]) -> Vec<(&str, bool)> {
    params.iter().map(|p| (p.name.as_str(), p.optional)).collect()
}

fn callback(params: Vec<Property>) -> Box<Property> {
    Box::new(Property::new(
        "callback",
        Type::Function(FunctionType {
            parameters: params,
            ..FunctionType::default()
        }),
    ))
}

#[test]
fn test_left_optional_produces_two_overloads() {
    // foo(a?, b)
    let func = FunctionType {
        parameters: vec![param("a", true), param("b", false)],
        ..FunctionType::default()
    };

    let sigs = expand(&func, "x.foo").unwrap();
    assert_eq!(sigs.len(), 2);
    assert_eq!(names(&sigs[0].parameters), [("a", false), ("b", false)]);
    assert_eq!(names(&sigs[1].parameters), [("b", false)]);
    assert!(sigs.iter().all(|s| s.returns.ty == Type::void()));
}

#[test]
fn test_expansion_count_is_power_of_two() {
    // a?, b?, c, d?, e  → three left-optional positions
    let func = FunctionType {
        parameters: vec![
            param("a", true),
            param("b", true),
            param("c", false),
            param("d", true),
            param("e", false),
        ],
        ..FunctionType::default()
    };

    let sigs = expand(&func, "x.f").unwrap();
    assert_eq!(sigs.len(), 8);
    assert_eq!(sigs[0].parameters.len(), 5);
    assert_eq!(names(&sigs[7].parameters), [("c", false), ("e", false)]);
}

#[test]
fn test_trailing_optionals_expand_once() {
    let func = FunctionType {
        parameters: vec![param("a", false), param("b", true), param("c", true)],
        ..FunctionType::default()
    };

    let sigs = expand(&func, "x.f").unwrap();
    assert_eq!(sigs.len(), 1);
    assert_eq!(
        names(&sigs[0].parameters),
        [("a", false), ("b", true), ("c", true)]
    );
}

#[test]
fn test_nodoc_parameters_are_dropped() {
    let mut hidden = param("internal", false);
    hidden.nodoc = true;
    let func = FunctionType {
        parameters: vec![param("a", true), hidden],
        ..FunctionType::default()
    };

    let sigs = expand(&func, "x.f").unwrap();
    assert_eq!(sigs.len(), 1);
    assert_eq!(names(&sigs[0].parameters), [("a", true)]);
}

#[test]
fn test_async_yields_promise_then_callback_overloads() {
    let result = Property::new("alarm", Type::reference("Alarm")).optional(true);
    let func = FunctionType {
        parameters: vec![param("name", true)],
        async_callback: Some(callback(vec![result])),
        ..FunctionType::default()
    };

    let sigs = expand(&func, "alarms.get").unwrap();
    let kinds: Vec<_> = sigs.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        [
            SignatureKind::Promise,
            SignatureKind::Callback,
            SignatureKind::Callback
        ]
    );

    assert_eq!(names(&sigs[0].parameters), [("name", true)]);
    assert_eq!(
        sigs[0].returns.ty,
        Type::Ref(RefType::external("Promise").with_args(vec![Type::reference("Alarm")]))
    );

    // The callback makes `name` left-optional.
    assert_eq!(
        names(&sigs[1].parameters),
        [("name", false), ("callback", false)]
    );
    assert_eq!(names(&sigs[2].parameters), [("callback", false)]);
    assert_eq!(sigs[2].returns.ty, Type::void());
}

#[test]
fn test_promise_of_void_without_callback_arguments() {
    let func = FunctionType {
        async_callback: Some(callback(Vec::new())),
        ..FunctionType::default()
    };

    let sigs = expand(&func, "x.f").unwrap();
    assert_eq!(sigs.len(), 2);
    assert_eq!(
        sigs[0].returns.ty,
        Type::Ref(RefType::external("Promise").with_args(vec![Type::Primitive(Primitive::Void)]))
    );
}

#[test]
fn test_callback_only_functions_skip_promise_form() {
    let func = FunctionType {
        async_callback: Some(callback(Vec::new())),
        promise_unsupported: true,
        ..FunctionType::default()
    };

    let sigs = expand(&func, "x.f").unwrap();
    assert_eq!(sigs.len(), 1);
    assert_eq!(sigs[0].kind, SignatureKind::Callback);
}

#[test]
fn test_multi_argument_callback_cannot_be_a_promise() {
    let func = FunctionType {
        async_callback: Some(callback(vec![param("a", false), param("b", false)])),
        ..FunctionType::default()
    };

    assert_eq!(
        expand(&func, "x.f").unwrap_err(),
        RenderError::AsyncArity {
            path: "x.f".to_string(),
            count: 2,
        }
    );
}

#[test]
fn test_misnamed_return_is_fatal() {
    let func = FunctionType {
        returns: Some(Box::new(Property::new("result", Type::string()))),
        ..FunctionType::default()
    };

    assert!(matches!(
        expand(&func, "x.f"),
        Err(RenderError::ReturnName { found, .. }) if found == "result"
    ));
}

#[test]
fn test_too_many_left_optionals_is_fatal() {
    let mut parameters: Vec<Property> = (0..8).map(|i| param(&format!("p{i}"), true)).collect();
    parameters.push(param("last", false));
    let func = FunctionType {
        parameters,
        ..FunctionType::default()
    };

    assert!(matches!(
        expand(&func, "x.f"),
        Err(RenderError::TooManyOptional { count: 8, .. })
    ));
}

#[test]
fn test_expansion_does_not_touch_input() {
    let func = FunctionType {
        parameters: vec![param("a", true), param("b", false)],
        ..FunctionType::default()
    };
    let before = func.clone();
    let _ = expand(&func, "x.f").unwrap();
    assert_eq!(func, before);
}
