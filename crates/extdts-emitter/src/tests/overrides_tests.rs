use crate::overrides::{RenderOverride, Tag};
use extdts_schema::{EVENT_TYPE, FunctionType, RefType, Type};

#[test]
fn test_object_templates() {
    let overrides = RenderOverride::new();
    assert_eq!(overrides.object_templates_for("types.ChromeSetting"), Some("T"));
    assert!(
        overrides
            .object_templates_for(EVENT_TYPE)
            .is_some_and(|t| t.starts_with("H extends"))
    );
    assert_eq!(overrides.object_templates_for("alarms.Alarm"), None);
}

#[test]
fn test_any_slot_becomes_template_parameter() {
    let overrides = RenderOverride::new();
    let replaced = overrides
        .type_override(&Type::any(), "types.ChromeSetting.set.details.value")
        .unwrap();
    assert_eq!(replaced, Type::Ref(RefType::generic("T")));

    // Only `any` is replaced at ChromeSetting value slots.
    assert_eq!(
        overrides.type_override(&Type::string(), "types.ChromeSetting.set.details.value"),
        None
    );
    assert_eq!(
        overrides.type_override(&Type::any(), "types.ChromeSetting.set.details.scope"),
        None
    );
}

#[test]
fn test_event_listener_callback_becomes_handler() {
    let overrides = RenderOverride::new();
    let callback = Type::Function(FunctionType::default());
    assert_eq!(
        overrides.type_override(&callback, "events.Event.addListener.callback"),
        Some(Type::Ref(RefType::generic("H")))
    );
}

#[test]
fn test_bare_event_gets_any_handler() {
    let overrides = RenderOverride::new();
    let bare = Type::reference(EVENT_TYPE);
    assert_eq!(
        overrides.type_override(&bare, "runtime.onSomething"),
        Some(Type::Ref(
            RefType::new(EVENT_TYPE).with_args(vec![Type::any()])
        ))
    );
}

#[test]
fn test_bare_setting_container_gets_any_argument() {
    let overrides = RenderOverride::new();
    let bare = Type::reference("types.ChromeSetting");
    assert_eq!(
        overrides.type_override(&bare, "proxy.settings"),
        Some(Type::Ref(
            RefType::new("types.ChromeSetting").with_args(vec![Type::any()])
        ))
    );

    // Inside its own namespace the container is referenced without prefix.
    let local = Type::reference("ContentSetting");
    assert!(matches!(
        overrides.type_override(&local, "contentSettings.images"),
        Some(Type::Ref(r)) if r.name == "ContentSetting" && r.template_args == [Type::any()]
    ));
    assert_eq!(overrides.type_override(&local, "privacy.images"), None);

    let applied = Type::Ref(RefType::new("types.ChromeSetting").with_args(vec![Type::string()]));
    assert_eq!(overrides.type_override(&applied, "privacy.network.x"), None);
}

#[test]
fn test_templated_target_resolves_local_names() {
    let overrides = RenderOverride::new();
    assert_eq!(
        overrides.templated_target("Event", "events.Rule.event"),
        Some(EVENT_TYPE)
    );
    assert_eq!(
        overrides.templated_target("types.ChromeSetting", "privacy.network"),
        Some("types.ChromeSetting")
    );
    assert_eq!(overrides.templated_target("Event", "alarms.onAlarm"), None);
}

#[test]
fn test_internal_reference_is_repaired() {
    let overrides = RenderOverride::new();
    let internal = Type::reference("contextMenusInternal.OnClickData");
    assert_eq!(
        overrides.type_override(&internal, "contextMenus.onClicked.info"),
        Some(Type::reference("contextMenus.OnClickData"))
    );
    assert_eq!(overrides.type_override(&internal, "other.path"), None);
}

#[test]
fn test_instance_of_normalization() {
    let overrides = RenderOverride::new();
    assert_eq!(overrides.instance_of("DOMWindow"), Some("Window"));
    assert_eq!(overrides.instance_of("Window"), None);
    assert_eq!(
        overrides.type_override(&Type::Ref(RefType::external("DirectoryEntry")), "x.y"),
        Some(Type::Ref(RefType::external("FileSystemDirectoryEntry")))
    );
}

#[test]
fn test_overrides_are_idempotent() {
    let overrides = RenderOverride::new();
    let cases = [
        (Type::any(), "types.ChromeSetting.get.return.value"),
        (
            Type::Function(FunctionType::default()),
            "events.Event.removeListener.callback",
        ),
        (Type::reference(EVENT_TYPE), "x.onEvent"),
        (
            Type::reference("contextMenusInternal.OnClickData"),
            "contextMenus.onClicked.info",
        ),
        (Type::Ref(RefType::external("global")), "x.y"),
    ];

    for (ty, path) in cases {
        let once = overrides.type_override(&ty, path).unwrap();
        assert_eq!(overrides.type_override(&once, path), None, "{path}");
    }
}

#[test]
fn test_service_worker_tags() {
    let overrides = RenderOverride::new();
    let func = Type::Function(FunctionType::default());
    assert_eq!(
        overrides.tags_for(&func, "runtime.getBackgroundPage"),
        [Tag::flag("chrome-disallow-service-workers")]
    );
    assert!(overrides.tags_for(&func, "runtime.getManifest").is_empty());
    assert_eq!(Tag::with_value("since", "Chrome 88").to_string(), "@since Chrome 88");
}
