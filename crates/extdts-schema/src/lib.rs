//! Schema ingestion and the type model.
//!
//! Raw namespace JSON (as produced by the upstream schema conversion step)
//! is deserialized into [`raw`] structures, turned into the [`model`] by the
//! [`parser`], and annotated with feature availability by [`prune`].

// Input contract: upstream schema JSON
pub mod raw;
pub use raw::{RawEnumValue, RawEventOptions, RawNamespace, RawType};

// Intermediate representation
pub mod model;
pub use model::{
    FunctionType, Literal, Namespace, NumberType, ObjectType, Primitive, Property, RETURN_NAME,
    RefType, SequenceType, Type,
};

// Raw schema → model
pub mod parser;
pub use parser::{EVENT_TYPE, parse_namespace, parse_namespaces_json};

// Feature annotation and nodoc pruning
pub mod prune;
pub use prune::{mark_namespace, prune_namespace};

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod parser_tests;

#[cfg(test)]
#[path = "tests/prune_tests.rs"]
mod prune_tests;
