use crate::model::{Literal, Primitive, RefType, Type};
use crate::parser::{EVENT_TYPE, parse_namespace, parse_namespaces_json};
use crate::raw::RawNamespace;
use extdts_common::ParseError;

fn parse(value: serde_json::Value) -> Result<crate::model::Namespace, ParseError> {
    let raw: RawNamespace = serde_json::from_value(value).unwrap();
    parse_namespace(&raw)
}

#[test]
fn test_members_keep_schema_order_and_kinds() {
    let ns = parse(serde_json::json!({
        "namespace": "alarms",
        "types": [{"id": "Alarm", "type": "object", "properties": {
            "name": {"type": "string"},
            "periodInMinutes": {"type": "number", "optional": true},
        }}],
        "properties": {"MAX": {"type": "integer", "value": 5}},
        "functions": [{"name": "clear", "parameters": []}],
        "events": [{"name": "onAlarm", "parameters": [{"name": "alarm", "$ref": "Alarm"}]}],
    }))
    .unwrap();

    let names: Vec<_> = ns.all.keys().cloned().collect();
    assert_eq!(names, ["Alarm", "MAX", "clear", "onAlarm"]);
    assert!(ns.all["Alarm"].is_type);
    assert!(ns.all["MAX"].is_const);
    assert!(ns.all["clear"].is_function());
    assert!(ns.all["onAlarm"].is_event);

    let Type::Object(alarm) = &ns.all["Alarm"].ty else {
        panic!("expected object");
    };
    assert!(alarm.properties["periodInMinutes"].optional);
    assert_eq!(
        ns.all["MAX"].ty,
        Type::Literal(Literal::Number(serde_json::Number::from(5)))
    );
}

#[test]
fn test_qualified_type_ids_are_made_local() {
    let ns = parse(serde_json::json!({
        "namespace": "tabs",
        "types": [{"id": "tabs.Tab", "type": "object", "properties": {}}],
    }))
    .unwrap();
    assert!(ns.all.contains_key("Tab"));
}

#[test]
fn test_enum_becomes_literal_choices() {
    let ns = parse(serde_json::json!({
        "namespace": "x",
        "types": [{"id": "Mode", "type": "string", "enum": [
            "fast",
            {"name": "slow", "description": "Takes a while."},
        ]}],
    }))
    .unwrap();

    assert_eq!(
        ns.all["Mode"].ty,
        Type::Choices(vec![
            Type::Literal(Literal::String("fast".to_string())),
            Type::Literal(Literal::String("slow".to_string())),
        ])
    );
}

#[test]
fn test_ref_with_properties_becomes_union() {
    let ns = parse(serde_json::json!({
        "namespace": "x",
        "types": [{"id": "Ext", "$ref": "Base", "properties": {"extra": {"type": "boolean"}}}],
    }))
    .unwrap();

    let Type::Union(parts) = &ns.all["Ext"].ty else {
        panic!("expected union");
    };
    assert_eq!(parts[0], Type::reference("Base"));
    assert!(matches!(&parts[1], Type::Object(o) if o.properties.contains_key("extra")));
}

#[test]
fn test_setting_value_schema_becomes_template_argument() {
    let ns = parse(serde_json::json!({
        "namespace": "privacy",
        "properties": {
            "networkPredictionEnabled": {
                "$ref": "types.ChromeSetting",
                "value": ["networkPredictionEnabled", {"type": "boolean"}],
            },
        },
    }))
    .unwrap();

    let prop = &ns.all["networkPredictionEnabled"];
    assert_eq!(
        prop.ty,
        Type::Ref(RefType::new("types.ChromeSetting").with_args(vec![Type::Primitive(Primitive::Boolean)]))
    );
}

#[test]
fn test_malformed_setting_value_schema_is_fatal() {
    let err = parse(serde_json::json!({
        "namespace": "privacy",
        "properties": {
            "broken": {"$ref": "types.ChromeSetting", "value": ["broken", 5]},
        },
    }))
    .unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedShape { ref path, .. } if path == "privacy.broken"));
}

#[test]
fn test_type_inference_and_binary() {
    let ns = parse(serde_json::json!({
        "namespace": "x",
        "properties": {
            "list": {"items": {"type": "string"}, "minItems": 1},
            "blob": {"type": "binary"},
            "win": {"type": "object", "isInstanceOf": "Window"},
        },
    }))
    .unwrap();

    let Type::Sequence(seq) = &ns.all["list"].ty else {
        panic!("expected sequence");
    };
    assert_eq!(seq.min_items, 1);
    assert_eq!(seq.max_items, None);
    assert_eq!(*seq.element, Type::Primitive(Primitive::String));
    assert_eq!(ns.all["blob"].ty, Type::Ref(RefType::external("ArrayBuffer")));
    assert_eq!(ns.all["win"].ty, Type::Ref(RefType::external("Window")));
}

#[test]
fn test_missing_type_is_fatal_with_path() {
    let err = parse(serde_json::json!({
        "namespace": "x",
        "functions": [{"name": "f", "parameters": [{"name": "mystery"}]}],
    }))
    .unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingType {
            path: "x.f.mystery".to_string()
        }
    );
}

#[test]
fn test_unknown_type_is_fatal() {
    let err = parse(serde_json::json!({
        "namespace": "x",
        "properties": {"p": {"type": "quaternion"}},
    }))
    .unwrap_err();
    assert!(matches!(err, ParseError::UnknownType { kind, .. } if kind == "quaternion"));
}

#[test]
fn test_conflicting_returns_is_fatal() {
    let err = parse(serde_json::json!({
        "namespace": "x",
        "functions": [{
            "name": "f",
            "parameters": [],
            "returns": {"type": "string"},
            "returns_async": {"name": "callback", "parameters": []},
        }],
    }))
    .unwrap_err();
    assert_eq!(
        err,
        ParseError::ConflictingReturns {
            path: "x.f".to_string()
        }
    );
}

#[test]
fn test_async_function_keeps_callback() {
    let ns = parse(serde_json::json!({
        "namespace": "alarms",
        "functions": [{
            "name": "get",
            "parameters": [{"name": "name", "type": "string", "optional": true}],
            "returns_async": {
                "name": "done",
                "parameters": [{"name": "alarm", "$ref": "Alarm", "optional": true}],
            },
        }, {
            "name": "legacy",
            "parameters": [],
            "returns_async": {"name": "callback", "parameters": [], "does_not_support_promises": "Requires refactor"},
        }],
    }))
    .unwrap();

    let Type::Function(get) = &ns.all["get"].ty else {
        panic!("expected function");
    };
    let callback = get.async_callback.as_ref().unwrap();
    assert_eq!(callback.name, "done");
    assert!(!get.promise_unsupported);

    let Type::Function(legacy) = &ns.all["legacy"].ty else {
        panic!("expected function");
    };
    assert!(legacy.promise_unsupported);
}

#[test]
fn test_listener_event_wraps_handler() {
    let ns = parse(serde_json::json!({
        "namespace": "alarms",
        "events": [{"name": "onAlarm", "parameters": [{"name": "alarm", "$ref": "Alarm"}]}],
    }))
    .unwrap();

    let Type::Ref(event) = &ns.all["onAlarm"].ty else {
        panic!("expected event ref");
    };
    assert_eq!(event.name, EVENT_TYPE);
    assert_eq!(event.template_args.len(), 1);
    assert!(matches!(&event.template_args[0], Type::Function(f) if f.parameters.len() == 1));
}

#[test]
fn test_declarative_event_requires_lists() {
    let ok = parse(serde_json::json!({
        "namespace": "declarativeContent",
        "events": [{
            "name": "onPageChanged",
            "options": {
                "supportsListeners": false,
                "conditions": ["declarativeContent.PageStateMatcher"],
                "actions": ["declarativeContent.ShowAction", "declarativeContent.SetIcon"],
            },
        }],
    }))
    .unwrap();
    let Type::Ref(event) = &ok.all["onPageChanged"].ty else {
        panic!("expected event ref");
    };
    assert_eq!(event.template_args.len(), 3);
    assert!(matches!(&event.template_args[2], Type::Choices(c) if c.len() == 2));

    let err = parse(serde_json::json!({
        "namespace": "d",
        "events": [{"name": "e", "options": {"supportsListeners": false, "conditions": []}}],
    }))
    .unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingDeclarativeList {
            path: "d.e".to_string(),
            list: "actions",
        }
    );
}

#[test]
fn test_instance_type_marker_is_detected() {
    let ns = parse(serde_json::json!({
        "namespace": "declarativeContent",
        "types": [{"id": "ShowAction", "type": "object", "properties": {
            "instanceType": {"type": "string", "enum": ["declarativeContent.ShowAction"], "nodoc": true},
        }}],
    }))
    .unwrap();

    let Type::Object(obj) = &ns.all["ShowAction"].ty else {
        panic!("expected object");
    };
    assert_eq!(obj.instance_type.as_deref(), Some("declarativeContent.ShowAction"));
    assert!(obj.properties.is_empty());
}

#[test]
fn test_additional_properties_become_index_signature() {
    let ns = parse(serde_json::json!({
        "namespace": "storage",
        "types": [{"id": "Items", "type": "object", "additionalProperties": {"type": "any"}}],
    }))
    .unwrap();
    let Type::Object(obj) = &ns.all["Items"].ty else {
        panic!("expected object");
    };
    assert_eq!(obj.index_signature.as_deref(), Some(&Type::any()));
}

#[test]
fn test_duplicate_member_is_fatal() {
    let err = parse(serde_json::json!({
        "namespace": "x",
        "functions": [{"name": "f", "parameters": []}],
        "events": [{"name": "f", "parameters": []}],
    }))
    .unwrap_err();
    assert!(matches!(err, ParseError::DuplicateMember { name, .. } if name == "f"));
}

#[test]
fn test_file_may_hold_several_namespaces() {
    let text = serde_json::json!([
        {"namespace": "a", "functions": [{"name": "f", "parameters": []}]},
        {"namespace": "b"},
    ])
    .to_string();
    let parsed = parse_namespaces_json(&text).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].name, "b");

    assert!(matches!(
        parse_namespaces_json("{not json"),
        Err(ParseError::Json(_))
    ));
}
