//! Errors raised by the compiler core.
//!
//! Every variant here aborts the whole compile. A symbol that the feature
//! resolver disallows is not an error: it is simply never rendered.

use thiserror::Error;

/// Malformed schema input. Carries the dotted path of the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid schema JSON: {0}")]
    Json(String),

    #[error("{path}: node has no type discriminator")]
    MissingType { path: String },

    #[error("{path}: unknown type `{kind}`")]
    UnknownType { path: String, kind: String },

    #[error("{path}: {what} is missing its name")]
    MissingName { path: String, what: &'static str },

    #[error("{path}: function declares both `returns` and `returns_async`")]
    ConflictingReturns { path: String },

    #[error("{path}: declarative event is missing its `{list}` list")]
    MissingDeclarativeList { path: String, list: &'static str },

    #[error("{path}: duplicate member `{name}`")]
    DuplicateMember { path: String, name: String },

    #[error("{path}: {detail}")]
    UnexpectedShape { path: String, detail: String },
}

/// Failures while resolving the feature graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("invalid feature JSON for `{id}`: {detail}")]
    Malformed { id: String, detail: String },

    #[error("feature id `{id}` has no known prefix")]
    UnknownPrefix { id: String },

    #[error(
        "complex feature `{id}` has {variants} variants that no tie-break rule disambiguates \
         (resolving `{path}`)"
    )]
    Ambiguous {
        id: String,
        path: String,
        variants: usize,
    },

    #[error("cyclic feature dependency: {}", .cycle.join(" -> "))]
    Cycle { cycle: Vec<String> },
}

/// Renderer invariant violations. These indicate a bug in the override
/// table or an input the override table does not yet know how to patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{path}: return property must be named `return`, found `{found}`")]
    ReturnName { path: String, found: String },

    #[error("{path}: signature references template parameter `{name}` outside a templated type")]
    TemplateRefInSignature { path: String, name: String },

    #[error("{path}: function expanded to no signatures")]
    NoExpansions { path: String },

    #[error("{path}: async callback is not a function type")]
    CallbackNotFunction { path: String },

    #[error("{path}: async callback has {count} parameters, at most one can become a promise")]
    AsyncArity { path: String, count: usize },

    #[error("{path}: {count} left-optional parameters exceed the limit of {limit}")]
    TooManyOptional {
        path: String,
        count: usize,
        limit: usize,
    },
}

/// Umbrella error for the full pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
