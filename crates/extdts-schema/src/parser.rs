//! Raw schema → type model.
//!
//! Dispatch is structural. A node is classified by the first key that
//! applies, in this order: `choices`, `enum`, `$ref` (whose `[name, schema]`
//! `value` becomes its template argument), `isInstanceOf`, a scalar `value`,
//! and finally the declared `type`. When `type` is absent it is inferred from
//! `properties`, `items` or `parameters`.
//!
//! Every error carries the dotted path of the node that caused it, e.g.
//! `alarms.create.alarmInfo`.

use extdts_common::ParseError;
use extdts_common::limits::MAX_SCHEMA_DEPTH;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::model::{
    FunctionType, Literal, Namespace, NumberType, ObjectType, Primitive, Property, RETURN_NAME,
    RefType, SequenceType, Type,
};
use crate::raw::{RawEnumValue, RawEventOptions, RawNamespace, RawType};

/// Name of the object property marking a declarative-event instance type.
const INSTANCE_TYPE_MARKER: &str = "instanceType";

/// The shared event type every event property is a reference to.
pub const EVENT_TYPE: &str = "events.Event";

/// Parse a schema file holding one namespace object or an array of them.
pub fn parse_namespaces_json(text: &str) -> Result<Vec<Namespace>, ParseError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ParseError::Json(e.to_string()))?;
    let raws: Vec<RawNamespace> = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|ns| vec![ns])
    }
    .map_err(|e| ParseError::Json(e.to_string()))?;

    raws.iter().map(parse_namespace).collect()
}

#[instrument(level = "debug", skip_all, fields(namespace = %raw.namespace))]
pub fn parse_namespace(raw: &RawNamespace) -> Result<Namespace, ParseError> {
    let name = raw.namespace.trim();
    if name.is_empty() {
        return Err(ParseError::MissingName {
            path: "<root>".to_string(),
            what: "namespace",
        });
    }

    let mut ns = Namespace::new(name);
    ns.description = raw.description.clone();
    ns.deprecated = raw.deprecated.clone();
    ns.nodoc = raw.nodoc;

    let parser = Parser { namespace: name };
    let mut members = Members::new(name);

    for ty in &raw.types {
        let Some(id) = ty.id.as_deref() else {
            return Err(ParseError::MissingName {
                path: name.to_string(),
                what: "type",
            });
        };
        let id = parser.local_name(id);
        let path = join(name, id);
        let mut prop = member(id, ty, parser.parse_type(ty, &path, 1)?);
        prop.is_type = true;
        // A type is never optional, whatever the node says.
        prop.optional = false;
        members.insert(prop)?;
    }

    for (key, value) in &raw.properties {
        let path = join(name, key);
        let mut prop = member(key, value, parser.parse_type(value, &path, 1)?);
        prop.is_const = value.value.is_some();
        members.insert(prop)?;
    }

    for func in &raw.functions {
        let fname = required_name(func, name, "function")?;
        let path = join(name, fname);
        let ty = Type::Function(parser.parse_function(func, &path, 1)?);
        members.insert(member(fname, func, ty))?;
    }

    for event in &raw.events {
        let ename = required_name(event, name, "event")?;
        let path = join(name, ename);
        let mut prop = member(ename, event, parser.parse_event(event, &path, 1)?);
        prop.is_event = true;
        members.insert(prop)?;
    }

    ns.all = members.into_inner();
    debug!(members = ns.all.len(), "parsed namespace");
    Ok(ns)
}

fn join(parent: &str, child: &str) -> String {
    format!("{parent}.{child}")
}

fn required_name<'a>(
    raw: &'a RawType,
    parent: &str,
    what: &'static str,
) -> Result<&'a str, ParseError> {
    raw.name.as_deref().ok_or_else(|| ParseError::MissingName {
        path: parent.to_string(),
        what,
    })
}

/// A property carrying the documentation attributes of its raw node.
fn member(name: &str, raw: &RawType, ty: Type) -> Property {
    Property {
        name: name.to_string(),
        ty,
        optional: raw.optional,
        nodoc: raw.nodoc,
        deprecated: raw.deprecated.clone(),
        description: raw.description.clone(),
        ..Property::default()
    }
}

/// Ordered member map that rejects duplicate names.
struct Members<'a> {
    path: &'a str,
    map: IndexMap<String, Property>,
}

impl<'a> Members<'a> {
    fn new(path: &'a str) -> Self {
        Members {
            path,
            map: IndexMap::new(),
        }
    }

    fn insert(&mut self, prop: Property) -> Result<(), ParseError> {
        match self.map.entry(prop.name.clone()) {
            Entry::Occupied(_) => Err(ParseError::DuplicateMember {
                path: self.path.to_string(),
                name: prop.name,
            }),
            Entry::Vacant(slot) => {
                slot.insert(prop);
                Ok(())
            }
        }
    }

    fn into_inner(self) -> IndexMap<String, Property> {
        self.map
    }
}

struct Parser<'a> {
    namespace: &'a str,
}

impl Parser<'_> {
    /// Type ids are sometimes qualified with their own namespace.
    fn local_name<'b>(&self, id: &'b str) -> &'b str {
        id.strip_prefix(self.namespace)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(id)
    }

    /// A setting reference spells its value type as `value: [name, schema]`.
    fn setting_argument(
        &self,
        raw: &RawType,
        path: &str,
        depth: u32,
    ) -> Result<Option<Type>, ParseError> {
        let Some(Value::Array(items)) = &raw.value else {
            return Ok(None);
        };
        let [_, schema] = items.as_slice() else {
            return Ok(None);
        };
        let schema: RawType =
            serde_json::from_value(schema.clone()).map_err(|e| ParseError::UnexpectedShape {
                path: path.to_string(),
                detail: format!("invalid setting value schema: {e}"),
            })?;
        self.parse_type(&schema, path, depth + 1).map(Some)
    }

    fn parse_type(&self, raw: &RawType, path: &str, depth: u32) -> Result<Type, ParseError> {
        if depth > MAX_SCHEMA_DEPTH {
            return Err(ParseError::UnexpectedShape {
                path: path.to_string(),
                detail: format!("nesting exceeds {MAX_SCHEMA_DEPTH} levels"),
            });
        }

        if let Some(choices) = &raw.choices {
            let items = choices
                .iter()
                .map(|choice| self.parse_type(choice, path, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Type::Choices(items));
        }

        if let Some(values) = &raw.enum_values {
            return Ok(Type::Choices(values.iter().map(enum_literal).collect()));
        }

        if let Some(target) = &raw.reference {
            let mut reference = RefType::new(target.as_str());
            if let Some(argument) = self.setting_argument(raw, path, depth)? {
                reference.template_args.push(argument);
            }
            let reference = Type::Ref(reference);
            if raw.properties.is_some() {
                let object = self.parse_object(raw, path, depth)?;
                return Ok(Type::Union(vec![reference, Type::Object(object)]));
            }
            return Ok(reference);
        }

        if let Some(instance_of) = &raw.instance_of {
            return Ok(Type::Ref(RefType::external(instance_of.as_str())));
        }

        if let Some(literal) = raw.value.as_ref().and_then(scalar_literal) {
            return Ok(Type::Literal(literal));
        }

        let kind = match raw.kind.as_deref() {
            Some(kind) => kind,
            None if raw.properties.is_some() => "object",
            None if raw.items.is_some() => "array",
            None if raw.parameters.is_some() => "function",
            None => {
                return Err(ParseError::MissingType {
                    path: path.to_string(),
                });
            }
        };

        let ty = match kind {
            "array" => {
                let Some(items) = &raw.items else {
                    return Err(ParseError::UnexpectedShape {
                        path: path.to_string(),
                        detail: "array has no `items`".to_string(),
                    });
                };
                Type::Sequence(SequenceType {
                    element: Box::new(self.parse_type(items, path, depth + 1)?),
                    min_items: raw.min_items.unwrap_or(0) as usize,
                    max_items: raw.max_items.map(|n| n as usize),
                })
            }
            "number" | "double" => Type::Number(NumberType {
                integer: false,
                minimum: raw.minimum,
                maximum: raw.maximum,
            }),
            "integer" | "int64" => Type::Number(NumberType {
                integer: true,
                minimum: raw.minimum,
                maximum: raw.maximum,
            }),
            "binary" => Type::Ref(RefType::external("ArrayBuffer")),
            "boolean" => Type::Primitive(Primitive::Boolean),
            "any" => Type::Primitive(Primitive::Any),
            "string" => Type::Primitive(Primitive::String),
            "null" => Type::Primitive(Primitive::Null),
            "object" => Type::Object(self.parse_object(raw, path, depth)?),
            "function" => Type::Function(self.parse_function(raw, path, depth)?),
            other => {
                return Err(ParseError::UnknownType {
                    path: path.to_string(),
                    kind: other.to_string(),
                });
            }
        };
        Ok(ty)
    }

    fn parse_object(&self, raw: &RawType, path: &str, depth: u32) -> Result<ObjectType, ParseError> {
        let mut object = ObjectType::default();
        let mut members = Members::new(path);

        if let Some(properties) = &raw.properties {
            for (key, value) in properties {
                if key == INSTANCE_TYPE_MARKER
                    && let Some([RawEnumValue::Name(name)]) = value.enum_values.as_deref()
                {
                    object.instance_type = Some(name.clone());
                    continue;
                }
                let child = join(path, key);
                let ty = self.parse_type(value, &child, depth + 1)?;
                members.insert(member(key, value, ty))?;
            }
        }

        for func in raw.functions.iter().flatten() {
            let fname = required_name(func, path, "function")?;
            let child = join(path, fname);
            let ty = Type::Function(self.parse_function(func, &child, depth + 1)?);
            members.insert(member(fname, func, ty))?;
        }

        for event in raw.events.iter().flatten() {
            let ename = required_name(event, path, "event")?;
            let child = join(path, ename);
            let mut prop = member(ename, event, self.parse_event(event, &child, depth + 1)?);
            prop.is_event = true;
            members.insert(prop)?;
        }

        if let Some(additional) = &raw.additional_properties {
            let ty = self.parse_type(additional, path, depth + 1)?;
            object.index_signature = Some(Box::new(ty));
        }

        object.properties = members.into_inner();
        Ok(object)
    }

    fn parse_parameters(
        &self,
        params: Option<&Vec<RawType>>,
        path: &str,
        depth: u32,
    ) -> Result<Vec<Property>, ParseError> {
        let mut out = Vec::new();
        for param in params.into_iter().flatten() {
            let pname = required_name(param, path, "parameter")?;
            let child = join(path, pname);
            let ty = self.parse_type(param, &child, depth + 1)?;
            out.push(member(pname, param, ty));
        }
        Ok(out)
    }

    fn parse_function(
        &self,
        raw: &RawType,
        path: &str,
        depth: u32,
    ) -> Result<FunctionType, ParseError> {
        if raw.returns.is_some() && raw.returns_async.is_some() {
            return Err(ParseError::ConflictingReturns {
                path: path.to_string(),
            });
        }

        let mut func = FunctionType {
            parameters: self.parse_parameters(raw.parameters.as_ref(), path, depth)?,
            ..FunctionType::default()
        };

        if let Some(returns) = &raw.returns {
            let ty = self.parse_type(returns, &join(path, RETURN_NAME), depth + 1)?;
            func.returns = Some(Box::new(member(RETURN_NAME, returns, ty)));
        }

        if let Some(callback) = &raw.returns_async {
            let cname = callback.name.as_deref().unwrap_or("callback");
            let child = join(path, cname);
            let callback_fn = FunctionType {
                parameters: self.parse_parameters(callback.parameters.as_ref(), &child, depth + 1)?,
                ..FunctionType::default()
            };
            func.promise_unsupported = callback.does_not_support_promises.is_some();
            func.async_callback = Some(Box::new(member(
                cname,
                callback,
                Type::Function(callback_fn),
            )));
        }

        Ok(func)
    }

    /// Events are references to `events.Event`, parameterized by the
    /// listener signature or, for declarative events, by the rule types.
    fn parse_event(&self, raw: &RawType, path: &str, depth: u32) -> Result<Type, ParseError> {
        let options = raw.options.clone().unwrap_or_default();
        if options.supports_listeners == Some(false) {
            return declarative_event(&options, path);
        }

        let handler = FunctionType {
            parameters: self.parse_parameters(raw.parameters.as_ref(), path, depth)?,
            returns: match &raw.returns {
                Some(returns) => {
                    let ty = self.parse_type(returns, &join(path, RETURN_NAME), depth + 1)?;
                    Some(Box::new(Property::returns(ty).optional(returns.optional)))
                }
                None => None,
            },
            ..FunctionType::default()
        };
        Ok(Type::Ref(
            RefType::new(EVENT_TYPE).with_args(vec![Type::Function(handler)]),
        ))
    }
}

fn declarative_event(options: &RawEventOptions, path: &str) -> Result<Type, ParseError> {
    let missing = |list| ParseError::MissingDeclarativeList {
        path: path.to_string(),
        list,
    };
    let conditions = options.conditions.as_ref().ok_or_else(|| missing("conditions"))?;
    let actions = options.actions.as_ref().ok_or_else(|| missing("actions"))?;

    let refs = |names: &[String]| Type::Choices(names.iter().map(Type::reference).collect());
    Ok(Type::Ref(RefType::new(EVENT_TYPE).with_args(vec![
        Type::Function(FunctionType::default()),
        refs(conditions),
        refs(actions),
    ])))
}

fn enum_literal(value: &RawEnumValue) -> Type {
    Type::Literal(match value {
        RawEnumValue::Name(name) | RawEnumValue::Described { name, .. } => {
            Literal::String(name.clone())
        }
        RawEnumValue::Number(n) => Literal::Number(n.clone()),
    })
}

fn scalar_literal(value: &Value) -> Option<Literal> {
    match value {
        Value::String(s) => Some(Literal::String(s.clone())),
        Value::Number(n) => Some(Literal::Number(n.clone())),
        Value::Bool(b) => Some(Literal::Boolean(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
