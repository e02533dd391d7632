//! Declaration emission for extdts.
//!
//! Takes pruned [`Namespace`](extdts_schema::Namespace)s and produces
//! TypeScript declaration text:
//! - [`expander`] turns one schema function into its concrete overloads
//! - [`overrides`] patches what the schema cannot express
//! - [`renderer`] walks the model and writes the text
//! - [`symbols`] reports every emitted symbol to an observer

// Overload expansion
pub mod expander;
pub use expander::{Signature, SignatureKind, expand};

// Render-time override tables
pub mod overrides;
pub use overrides::{RenderOverride, Tag};

// Text sink
pub mod writer;
pub use writer::DeclarationWriter;

// Symbol announcement
pub mod symbols;
pub use symbols::{RenderedSymbol, SymbolKind, SymbolObserver, SymbolTable};

// The renderer itself
pub mod renderer;
pub use renderer::{RenderOptions, Renderer};

#[cfg(test)]
#[path = "tests/expander_tests.rs"]
mod expander_tests;

#[cfg(test)]
#[path = "tests/overrides_tests.rs"]
mod overrides_tests;

#[cfg(test)]
#[path = "tests/renderer_tests.rs"]
mod renderer_tests;
