//! Render-time overrides.
//!
//! The schema cannot express everything the declarations need: template
//! parameters on a handful of shared types, `any` slots that are really the
//! template parameter, references into internal namespaces and builtin
//! host types spelled differently in TypeScript. These tables patch that
//! up while rendering. Lookups are pure; applying an override to its own
//! output is a no-op.

use std::fmt;

use extdts_schema::{EVENT_TYPE, RefType, Type};

/// One extra JSDoc tag, rendered as `@name value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: &'static str,
    pub value: Option<String>,
}

impl Tag {
    pub fn flag(name: &'static str) -> Self {
        Tag { name, value: None }
    }

    pub fn with_value(name: &'static str, value: impl Into<String>) -> Self {
        Tag {
            name,
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "@{} {}", self.name, value),
            None => write!(f, "@{}", self.name),
        }
    }
}

/// Template parameter lists of generic schema types.
const OBJECT_TEMPLATES: &[(&str, &str)] = &[
    (EVENT_TYPE, "H extends (...args: any) => void, C = void, A = void"),
    ("types.ChromeSetting", "T"),
    ("contentSettings.ContentSetting", "T"),
];

/// A position inside a generic type whose schema type stands for the
/// template parameter.
struct GenericSlot {
    /// Dotted prefix the path must start with.
    within: &'static str,
    /// Last path segment; `None` when `within` is the exact path.
    leaf: Option<&'static str>,
    param: &'static str,
    /// Only replace `any`; otherwise replace whatever the schema says.
    only_any: bool,
}

const GENERIC_SLOTS: &[GenericSlot] = &[
    GenericSlot {
        within: "events.Event.addListener.callback",
        leaf: None,
        param: "H",
        only_any: false,
    },
    GenericSlot {
        within: "events.Event.removeListener.callback",
        leaf: None,
        param: "H",
        only_any: false,
    },
    GenericSlot {
        within: "events.Event.hasListener.callback",
        leaf: None,
        param: "H",
        only_any: false,
    },
    GenericSlot {
        within: "types.ChromeSetting.",
        leaf: Some("value"),
        param: "T",
        only_any: true,
    },
    GenericSlot {
        within: "contentSettings.ContentSetting.",
        leaf: Some("setting"),
        param: "T",
        only_any: true,
    },
];

impl GenericSlot {
    fn matches(&self, path: &str) -> bool {
        match self.leaf {
            None => path == self.within,
            Some(leaf) => {
                path.starts_with(self.within)
                    && path.rsplit_once('.').is_some_and(|(_, last)| last == leaf)
            }
        }
    }
}

/// References into internal namespaces, by (path, from, to).
const REF_REPAIRS: &[(&str, &str, &str)] = &[(
    "contextMenus.onClicked.info",
    "contextMenusInternal.OnClickData",
    "contextMenus.OnClickData",
)];

/// Builtin host types named by `isInstanceOf`, mapped to their DOM names.
const INSTANCE_OF: &[(&str, &str)] = &[
    ("DirectoryEntry", "FileSystemDirectoryEntry"),
    ("FileEntry", "FileSystemFileEntry"),
    ("Entry", "FileSystemEntry"),
    ("DOMWindow", "Window"),
    ("global", "typeof globalThis"),
];

/// Functions that do not work from a service worker.
const SERVICE_WORKER_DISALLOWED: &[&str] = &[
    "runtime.getBackgroundPage",
    "extension.getBackgroundPage",
    "extension.getViews",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOverride;

impl RenderOverride {
    pub fn new() -> Self {
        RenderOverride
    }

    /// Template parameter text for the type declared at `path`.
    pub fn object_templates_for(&self, path: &str) -> Option<&'static str> {
        OBJECT_TEMPLATES
            .iter()
            .find(|(target, _)| *target == path)
            .map(|(_, templates)| *templates)
    }

    /// The generic type `name` refers to when written at `path`.
    ///
    /// Inside the declaring namespace the reference may omit its prefix.
    pub fn templated_target(&self, name: &str, path: &str) -> Option<&'static str> {
        let namespace = path.split('.').next().unwrap_or(path);
        OBJECT_TEMPLATES
            .iter()
            .map(|(target, _)| *target)
            .find(|target| {
                *target == name
                    || target
                        .strip_prefix(namespace)
                        .and_then(|rest| rest.strip_prefix('.'))
                        .is_some_and(|local| local == name)
            })
    }

    /// Normalized TypeScript name of a builtin host type.
    pub fn instance_of(&self, name: &str) -> Option<&'static str> {
        INSTANCE_OF
            .iter()
            .find(|(from, _)| *from == name)
            .map(|(_, to)| *to)
    }

    /// Replacement for `ty` found at `path`, if one applies.
    pub fn type_override(&self, ty: &Type, path: &str) -> Option<Type> {
        for slot in GENERIC_SLOTS {
            if !slot.matches(path) {
                continue;
            }
            let already = matches!(ty, Type::Ref(r) if r.generic && r.name == slot.param);
            if !already && (!slot.only_any || ty.is_any()) {
                return Some(Type::Ref(RefType::generic(slot.param)));
            }
        }

        let Type::Ref(reference) = ty else {
            return None;
        };

        if reference.template_args.is_empty()
            && !reference.generic
            && self.templated_target(&reference.name, path).is_some()
        {
            return Some(Type::Ref(reference.clone().with_args(vec![Type::any()])));
        }

        if let Some((_, _, to)) = REF_REPAIRS
            .iter()
            .find(|(at, from, _)| *at == path && *from == reference.name)
        {
            let mut repaired = reference.clone();
            repaired.name = (*to).to_string();
            return Some(Type::Ref(repaired));
        }

        if reference.external
            && let Some(name) = self.instance_of(&reference.name)
        {
            let mut normalized = reference.clone();
            normalized.name = name.to_string();
            return Some(Type::Ref(normalized));
        }

        None
    }

    /// Extra tags for the symbol at `path`.
    pub fn tags_for(&self, ty: &Type, path: &str) -> Vec<Tag> {
        let mut tags = Vec::new();
        if matches!(ty, Type::Function(_)) && SERVICE_WORKER_DISALLOWED.contains(&path) {
            tags.push(Tag::flag("chrome-disallow-service-workers"));
        }
        tags
    }
}
