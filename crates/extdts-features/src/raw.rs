//! Raw feature definitions.
//!
//! Feature files map an unprefixed name (`"alarms"`) to either one
//! definition object or an array of them. An array is a *complex* feature:
//! each element is a candidate interpretation that the resolver must
//! disambiguate. Ids are stored prefixed (`"api:alarms"`), which is also how
//! `dependencies` refer to other features.

use extdts_common::FeatureError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::channel::Channel;

/// Which feature file an id comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Api,
    Permission,
    Manifest,
    Behavior,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Api,
        FeatureKind::Permission,
        FeatureKind::Manifest,
        FeatureKind::Behavior,
    ];

    pub const fn prefix(self) -> &'static str {
        match self {
            FeatureKind::Api => "api",
            FeatureKind::Permission => "permission",
            FeatureKind::Manifest => "manifest",
            FeatureKind::Behavior => "behavior",
        }
    }

    /// Upstream file name holding features of this kind.
    pub const fn file_name(self) -> &'static str {
        match self {
            FeatureKind::Api => "_api_features.json",
            FeatureKind::Permission => "_permission_features.json",
            FeatureKind::Manifest => "_manifest_features.json",
            FeatureKind::Behavior => "_behavior_features.json",
        }
    }

    /// Split a prefixed id into its kind and bare name.
    pub fn split_id(id: &str) -> Result<(FeatureKind, &str), FeatureError> {
        let (prefix, name) = id.split_once(':').ok_or_else(|| FeatureError::UnknownPrefix {
            id: id.to_string(),
        })?;
        let kind = FeatureKind::ALL
            .into_iter()
            .find(|k| k.prefix() == prefix)
            .ok_or_else(|| FeatureError::UnknownPrefix { id: id.to_string() })?;
        Ok((kind, name))
    }

    pub fn id(self, name: &str) -> String {
        format!("{}:{}", self.prefix(), name)
    }
}

/// A string set field that may also be the keyword `"all"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSet {
    Keyword(String),
    List(Vec<String>),
}

impl RawSet {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            RawSet::Keyword(k) => k == "all" || k == value,
            RawSet::List(items) => items.iter().any(|i| i == "all" || i == value),
        }
    }

    pub fn items(&self) -> Vec<&str> {
        match self {
            RawSet::Keyword(k) => vec![k.as_str()],
            RawSet::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

/// One raw feature definition.
///
/// Every field is optional so that a child definition can tell "unset"
/// (inherit from the dotted parent) apart from an explicit value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<RawSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_types: Option<RawSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_manifest_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_manifest_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_line_switch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noparent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_parent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disallow_for_service_workers: Option<bool>,
}

impl RawFeature {
    pub fn channel(&self) -> Channel {
        self.channel.unwrap_or_default()
    }

    pub fn dependencies(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or(&[])
    }

    pub fn is_noparent(&self) -> bool {
        self.noparent.unwrap_or(false)
    }

    pub fn is_default_parent(&self) -> bool {
        self.default_parent.unwrap_or(false)
    }

    /// Whether the definition admits ordinary extensions.
    pub fn allows_extension(&self) -> bool {
        self.extension_types
            .as_ref()
            .is_none_or(|types| types.contains("extension"))
    }

    /// Copy of this definition without its dependency list.
    pub fn without_dependencies(&self) -> RawFeature {
        RawFeature {
            dependencies: None,
            ..self.clone()
        }
    }

    /// Fill every unset field from `parent`.
    pub fn inherit_from(&mut self, parent: &RawFeature) {
        macro_rules! inherit {
            ($($field:ident),* $(,)?) => {
                $(
                    if self.$field.is_none() {
                        self.$field = parent.$field.clone();
                    }
                )*
            };
        }
        inherit!(
            channel,
            dependencies,
            contexts,
            extension_types,
            platforms,
            session_types,
            min_manifest_version,
            max_manifest_version,
            location,
            allowlist,
            command_line_switch,
            matches,
            internal,
            disallow_for_service_workers,
        );
    }
}

/// All raw feature definitions, keyed by prefixed id.
#[derive(Debug, Clone, Default)]
pub struct RawFeatureTables {
    features: FxHashMap<String, Vec<RawFeature>>,
}

impl RawFeatureTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one definition (or one more variant of a complex feature).
    pub fn insert(&mut self, id: impl Into<String>, feature: RawFeature) {
        self.features.entry(id.into()).or_default().push(feature);
    }

    /// Load one feature file's JSON text.
    pub fn load_json(&mut self, kind: FeatureKind, text: &str) -> Result<(), FeatureError> {
        let value: Value = serde_json::from_str(text).map_err(|e| FeatureError::Malformed {
            id: kind.file_name().to_string(),
            detail: e.to_string(),
        })?;
        self.load_value(kind, value)
    }

    /// Load an already-parsed feature file.
    pub fn load_value(&mut self, kind: FeatureKind, value: Value) -> Result<(), FeatureError> {
        let Value::Object(entries) = value else {
            return Err(FeatureError::Malformed {
                id: kind.file_name().to_string(),
                detail: "expected an object at the top level".to_string(),
            });
        };

        for (name, entry) in entries {
            let id = kind.id(&name);
            let variants = match entry {
                Value::Array(items) => items,
                obj @ Value::Object(_) => vec![obj],
                other => {
                    return Err(FeatureError::Malformed {
                        id,
                        detail: format!("expected object or array, found {other}"),
                    });
                }
            };
            for variant in variants {
                let feature: RawFeature =
                    serde_json::from_value(variant).map_err(|e| FeatureError::Malformed {
                        id: id.clone(),
                        detail: e.to_string(),
                    })?;
                self.insert(id.clone(), feature);
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> &[RawFeature] {
        self.features.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.features.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
