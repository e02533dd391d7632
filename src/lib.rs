//! extdts: compiles extension API schemas into a TypeScript declaration file.
//!
//! The pipeline has three stages, each in its own crate:
//!
//! 1. `extdts-schema` parses namespace JSON into a typed model.
//! 2. `extdts-features` resolves each symbol's availability, and the
//!    schema crate's pruning pass drops what is disallowed or `nodoc`.
//! 3. `extdts-emitter` expands overloads and renders declaration text.
//!
//! [`Compiler`] wires the stages together.
//!
//! ```ignore
//! let compiler = Compiler::new(tables, CompileOptions::default());
//! let dts = compiler.compile_json(&[alarms_json, events_json])?;
//! ```

pub use extdts_common as common;
pub use extdts_emitter as emitter;
pub use extdts_features as features;
pub use extdts_schema as schema;

pub use extdts_common::CompileError;
pub use extdts_emitter::{RenderOptions, RenderOverride, SymbolObserver, SymbolTable};
pub use extdts_features::{FeatureResolver, HistoricSymbols, RawFeatureTables, ResolverOptions};
pub use extdts_schema::Namespace;

use extdts_emitter::Renderer;
use extdts_schema::{parse_namespaces_json, prune_namespace};
use tracing::{debug, instrument};

// Tracing subscriber setup for the command line
pub mod tracing_config;

/// Options for every stage of a compilation.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub resolver: ResolverOptions,
    pub render: RenderOptions,
}

/// A configured compilation: feature tables, optional history and render
/// options. One `Compiler` can render any number of schema sets.
pub struct Compiler {
    resolver: FeatureResolver,
    overrides: RenderOverride,
    render: RenderOptions,
}

impl Compiler {
    pub fn new(tables: RawFeatureTables, options: CompileOptions) -> Self {
        Compiler {
            resolver: FeatureResolver::new(tables, options.resolver),
            overrides: RenderOverride::new(),
            render: options.render,
        }
    }

    /// Attach historic symbol data so rendered comments carry `@since`.
    pub fn with_history(mut self, history: HistoricSymbols) -> Self {
        self.resolver = self.resolver.with_history(history);
        self
    }

    pub fn resolver(&self) -> &FeatureResolver {
        &self.resolver
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Parse every schema text. Each text may hold one namespace object or
    /// an array of them.
    pub fn parse(&self, schemas: &[&str]) -> Result<Vec<Namespace>, CompileError> {
        let mut namespaces = Vec::new();
        for text in schemas {
            namespaces.extend(parse_namespaces_json(text)?);
        }
        Ok(namespaces)
    }

    /// Resolve features for every namespace and drop what is not visible.
    #[instrument(skip_all, fields(count = namespaces.len()))]
    pub fn prune(&self, namespaces: Vec<Namespace>) -> Result<Vec<Namespace>, CompileError> {
        let mut visible = Vec::with_capacity(namespaces.len());
        for namespace in namespaces {
            let pruned = prune_namespace(namespace, &self.resolver)?;
            if pruned.nodoc {
                debug!(namespace = %pruned.name, "namespace disallowed");
                continue;
            }
            visible.push(pruned);
        }
        Ok(visible)
    }

    /// Render already-pruned namespaces.
    pub fn render(
        &self,
        namespaces: &[Namespace],
        observer: Option<&mut dyn SymbolObserver>,
    ) -> Result<String, CompileError> {
        let mut renderer = Renderer::new(&self.overrides, self.render.clone());
        if let Some(observer) = observer {
            renderer = renderer.with_observer(observer);
        }
        Ok(renderer.render(namespaces)?)
    }

    /// Prune then render parsed namespaces.
    #[instrument(skip_all)]
    pub fn compile(&self, namespaces: Vec<Namespace>) -> Result<String, CompileError> {
        let visible = self.prune(namespaces)?;
        self.render(&visible, None)
    }

    /// Like [`Compiler::compile`], reporting every rendered symbol to
    /// `observer`.
    #[instrument(skip_all)]
    pub fn compile_with_observer(
        &self,
        namespaces: Vec<Namespace>,
        observer: &mut dyn SymbolObserver,
    ) -> Result<String, CompileError> {
        let visible = self.prune(namespaces)?;
        self.render(&visible, Some(observer))
    }

    /// Parse, prune and render schema texts in one call.
    pub fn compile_json(&self, schemas: &[&str]) -> Result<String, CompileError> {
        let namespaces = self.parse(schemas)?;
        self.compile(namespaces)
    }
}

/// One-shot compilation with default options and no history.
pub fn compile(schemas: &[&str], tables: RawFeatureTables) -> Result<String, CompileError> {
    Compiler::new(tables, CompileOptions::default()).compile_json(schemas)
}
