//! Raw schema JSON.
//!
//! These mirror the upstream schema keys one-to-one. Nothing here is
//! interpreted; that is the parser's job.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// One namespace file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNamespace {
    pub namespace: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: Option<String>,
    #[serde(default)]
    pub nodoc: bool,
    #[serde(default)]
    pub types: Vec<RawType>,
    #[serde(default)]
    pub properties: IndexMap<String, RawType>,
    #[serde(default)]
    pub functions: Vec<RawType>,
    #[serde(default)]
    pub events: Vec<RawType>,
}

/// Any schema node: a type, a property, a parameter, a function or an event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawType {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<RawType>>,
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<RawEnumValue>>,
    #[serde(default, rename = "isInstanceOf")]
    pub instance_of: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,

    #[serde(default)]
    pub items: Option<Box<RawType>>,
    #[serde(default, rename = "minItems")]
    pub min_items: Option<u64>,
    #[serde(default, rename = "maxItems")]
    pub max_items: Option<u64>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,

    #[serde(default)]
    pub properties: Option<IndexMap<String, RawType>>,
    #[serde(default, rename = "additionalProperties")]
    pub additional_properties: Option<Box<RawType>>,
    #[serde(default)]
    pub functions: Option<Vec<RawType>>,
    #[serde(default)]
    pub events: Option<Vec<RawType>>,

    #[serde(default)]
    pub parameters: Option<Vec<RawType>>,
    #[serde(default)]
    pub returns: Option<Box<RawType>>,
    #[serde(default)]
    pub returns_async: Option<Box<RawType>>,
    #[serde(default)]
    pub does_not_support_promises: Option<String>,
    #[serde(default)]
    pub options: Option<RawEventOptions>,

    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub nodoc: bool,
    #[serde(default)]
    pub deprecated: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// An `enum` entry: either a bare value or a described one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEnumValue {
    Name(String),
    Number(serde_json::Number),
    Described {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

/// `options` of an event definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEventOptions {
    #[serde(default, rename = "supportsListeners")]
    pub supports_listeners: Option<bool>,
    #[serde(default)]
    pub conditions: Option<Vec<String>>,
    #[serde(default)]
    pub actions: Option<Vec<String>>,
}
