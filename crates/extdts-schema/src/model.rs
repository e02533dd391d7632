//! The type model.
//!
//! A closed sum type over everything the schema can express. Every consumer
//! matches on [`Type`] exhaustively, so adding a variant forces each of them
//! to be revisited.
//!
//! Ownership is strictly tree-shaped: a [`Property`] owns its type, and a type
//! owns its nested properties. Nothing is shared; reuse clones.

use std::convert::Infallible;

use extdts_features::{FeatureDiff, FeatureQuery};
use indexmap::IndexMap;

/// Name of the property describing a function's return value.
pub const RETURN_NAME: &str = "return";

/// A parsed namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub description: Option<String>,
    pub deprecated: Option<String>,
    pub nodoc: bool,
    /// Members in schema order.
    pub all: IndexMap<String, Property>,
    pub feature: FeatureDiff,
    pub canonical_feature: Option<FeatureQuery>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Namespace {
            name: name.into(),
            ..Namespace::default()
        }
    }

    /// Whether anything in this namespace would be rendered.
    pub fn has_visible_members(&self) -> bool {
        !self.nodoc && self.all.values().any(|p| !p.nodoc)
    }

    /// Copy of this namespace with every nodoc member removed, recursively.
    pub fn visible(&self) -> Namespace {
        self.clone().into_visible()
    }

    pub fn into_visible(mut self) -> Namespace {
        if self.nodoc {
            self.all.clear();
            return self;
        }
        self.all.retain(|_, prop| !prop.nodoc);
        for prop in self.all.values_mut() {
            prop.ty.retain_visible();
        }
        self
    }
}

/// A named, typed member of a namespace, object or parameter list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: Type,
    pub optional: bool,
    /// Declares a type (alias, interface or class) rather than a value.
    pub is_type: bool,
    /// A namespace value carrying a fixed `value`.
    pub is_const: bool,
    /// Parsed from an `events` list.
    pub is_event: bool,
    pub nodoc: bool,
    pub deprecated: Option<String>,
    pub description: Option<String>,
    /// Sparse diff against the parent's canonical feature.
    pub feature: FeatureDiff,
    pub canonical_feature: Option<FeatureQuery>,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Property {
            name: name.into(),
            ty,
            ..Property::default()
        }
    }

    /// The return-position property of a function.
    pub fn returns(ty: Type) -> Self {
        Property::new(RETURN_NAME, ty)
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_function(&self) -> bool {
        matches!(self.ty, Type::Function(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Primitive {
    #[default]
    Void,
    Any,
    Unknown,
    Boolean,
    String,
    Undefined,
    Null,
}

impl Primitive {
    pub const fn keyword(self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Any => "any",
            Primitive::Unknown => "unknown",
            Primitive::Boolean => "boolean",
            Primitive::String => "string",
            Primitive::Undefined => "undefined",
            Primitive::Null => "null",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberType {
    pub integer: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

/// Reference to a named type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefType {
    pub name: String,
    pub template_args: Vec<Type>,
    /// Defined outside the schema (`ArrayBuffer`, `Window`, `Promise`).
    pub external: bool,
    /// Refers to a template parameter of an enclosing type (`T`, `H`).
    pub generic: bool,
}

impl RefType {
    pub fn new(name: impl Into<String>) -> Self {
        RefType {
            name: name.into(),
            ..RefType::default()
        }
    }

    pub fn external(name: impl Into<String>) -> Self {
        RefType {
            external: true,
            ..RefType::new(name)
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        RefType {
            generic: true,
            ..RefType::new(name)
        }
    }

    pub fn with_args(mut self, args: Vec<Type>) -> Self {
        self.template_args = args;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceType {
    pub element: Box<Type>,
    /// Inclusive lower bound on the item count.
    pub min_items: usize,
    /// Inclusive upper bound, if any.
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectType {
    pub properties: IndexMap<String, Property>,
    pub index_signature: Option<Box<Type>>,
    /// Template parameter list, e.g. `T` or `H extends (...args: any) => void`.
    pub templates: Option<String>,
    /// Set for declarative-event instance types, which render as classes.
    pub instance_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionType {
    pub parameters: Vec<Property>,
    /// Synchronous result; always named `return`.
    pub returns: Option<Box<Property>>,
    /// Completion callback of a `returns_async` function. Its presence makes
    /// the function callable either with the callback or as a promise.
    pub async_callback: Option<Box<Property>>,
    /// The async form only accepts a callback.
    pub promise_unsupported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    Literal(Literal),
    Number(NumberType),
    Ref(RefType),
    Sequence(SequenceType),
    Object(ObjectType),
    /// Every member applies at once (rendered `A & B`).
    Union(Vec<Type>),
    /// Exactly one member applies (rendered `A | B`).
    Choices(Vec<Type>),
    Function(FunctionType),
}

impl Default for Type {
    fn default() -> Self {
        Type::Primitive(Primitive::Void)
    }
}

impl Type {
    pub fn void() -> Type {
        Type::Primitive(Primitive::Void)
    }

    pub fn any() -> Type {
        Type::Primitive(Primitive::Any)
    }

    pub fn string() -> Type {
        Type::Primitive(Primitive::String)
    }

    pub fn reference(name: impl Into<String>) -> Type {
        Type::Ref(RefType::new(name))
    }

    pub fn array(element: Type) -> Type {
        Type::Sequence(SequenceType {
            element: Box::new(element),
            min_items: 0,
            max_items: None,
        })
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Void))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Any))
    }

    /// Visit every property directly nested in this type.
    ///
    /// Sequences, unions, choices and reference arguments are transparent:
    /// their nested properties are visited as if they belonged to this type.
    /// A function's return and callback properties count as its members.
    pub fn try_for_each_property_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Property) -> Result<(), E>,
    {
        match self {
            Type::Primitive(_) | Type::Literal(_) | Type::Number(_) => Ok(()),
            Type::Ref(r) => r
                .template_args
                .iter_mut()
                .try_for_each(|arg| arg.try_for_each_property_mut(f)),
            Type::Sequence(seq) => seq.element.try_for_each_property_mut(f),
            Type::Object(obj) => obj.properties.values_mut().try_for_each(|p| f(p)),
            Type::Union(items) | Type::Choices(items) => items
                .iter_mut()
                .try_for_each(|item| item.try_for_each_property_mut(f)),
            Type::Function(func) => {
                for param in &mut func.parameters {
                    f(param)?;
                }
                if let Some(ret) = &mut func.returns {
                    f(ret)?;
                }
                if let Some(callback) = &mut func.async_callback {
                    f(callback)?;
                }
                Ok(())
            }
        }
    }

    pub fn for_each_property_mut(&mut self, mut f: impl FnMut(&mut Property)) {
        let Ok(()) = self.try_for_each_property_mut::<Infallible, _>(&mut |prop| {
            f(prop);
            Ok(())
        });
    }

    /// Remove nodoc properties, recursively.
    pub fn retain_visible(&mut self) {
        match self {
            Type::Primitive(_) | Type::Literal(_) | Type::Number(_) => {}
            Type::Ref(r) => r.template_args.iter_mut().for_each(Type::retain_visible),
            Type::Sequence(seq) => seq.element.retain_visible(),
            Type::Object(obj) => {
                obj.properties.retain(|_, p| !p.nodoc);
                for prop in obj.properties.values_mut() {
                    prop.ty.retain_visible();
                }
            }
            Type::Union(items) | Type::Choices(items) => {
                items.iter_mut().for_each(Type::retain_visible)
            }
            Type::Function(func) => {
                func.parameters.retain(|p| !p.nodoc);
                for param in &mut func.parameters {
                    param.ty.retain_visible();
                }
                if let Some(ret) = &mut func.returns {
                    ret.ty.retain_visible();
                }
                if func.async_callback.as_ref().is_some_and(|cb| cb.nodoc) {
                    func.async_callback = None;
                }
                if let Some(callback) = &mut func.async_callback {
                    callback.ty.retain_visible();
                }
            }
        }
    }
}
