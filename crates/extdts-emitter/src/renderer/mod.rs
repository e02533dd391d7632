//! Declaration text rendering.
//!
//! Namespaces are emitted in path order, each as a TypeScript namespace
//! block. Inside a block, members are grouped: type declarations first,
//! then values, then functions (one declaration per expanded overload).
//!
//! ```typescript
//! declare namespace chrome {
//!   export namespace alarms {
//!     export interface Alarm {
//!       name: string;
//!     }
//!
//!     export const onAlarm: events.Event<(alarm: Alarm) => void>;
//!
//!     export function clear(name?: string): Promise<boolean>;
//!     export function clear(name: string, callback: (wasCleared: boolean) => void): void;
//!     export function clear(callback: (wasCleared: boolean) => void): void;
//!   }
//! }
//! ```
//!
//! Names that are reserved words are declared with a `_` prefix and
//! re-exported under their real name at the end of the enclosing block. A
//! reserved segment inside a dotted namespace name is re-exported from a
//! block for the namespace that contains it.

mod comments;
mod types;

pub use comments::{Doc, feature_tags};

use std::collections::BTreeMap;

use extdts_common::RenderError;
use extdts_common::limits::DEFAULT_INDENT;
use extdts_common::naming;
use extdts_schema::{Literal, Namespace, ObjectType, Property, Type};
use tracing::{debug, instrument};

use crate::expander::{Signature, expand};
use crate::overrides::RenderOverride;
use crate::symbols::{RenderedSymbol, SymbolKind, SymbolObserver};
use crate::writer::DeclarationWriter;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Namespace every schema namespace is nested in. `None` emits each
    /// schema namespace as its own top-level `declare namespace`.
    pub root_namespace: Option<String>,
    /// Order members by name within each group instead of schema order.
    pub sort_members: bool,
    /// One level of indentation.
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            root_namespace: Some("chrome".to_string()),
            sort_members: false,
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

pub struct Renderer<'a> {
    overrides: &'a RenderOverride,
    options: RenderOptions,
    observer: Option<&'a mut dyn SymbolObserver>,
    /// Template parameters of the type currently being declared.
    template_scope: Vec<String>,
    /// Set while alternate overloads of an announced function are emitted.
    suppress_announcements: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(overrides: &'a RenderOverride, options: RenderOptions) -> Self {
        Renderer {
            overrides,
            options,
            observer: None,
            template_scope: Vec::new(),
            suppress_announcements: false,
        }
    }

    pub fn with_observer(mut self, observer: &'a mut dyn SymbolObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    #[instrument(level = "debug", skip_all, fields(namespaces = namespaces.len()))]
    pub fn render(&mut self, namespaces: &[Namespace]) -> Result<String, RenderError> {
        let mut visible: Vec<&Namespace> =
            namespaces.iter().filter(|ns| ns.has_visible_members()).collect();
        visible.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            visible = visible.len(),
            skipped = namespaces.len() - visible.len(),
            "rendering namespaces"
        );

        let mut w = DeclarationWriter::new(self.options.indent.clone());
        let root = self.options.root_namespace.clone();
        if let Some(root) = &root {
            w.line(&format!("declare namespace {root} {{"));
            w.increase_indent();
        }

        let mut reexports = Vec::new();
        for ns in visible {
            if !w.at_blank_line() {
                w.write_line();
            }
            self.render_namespace(&mut w, ns, root.is_some(), &mut reexports)?;
        }
        write_namespace_reexports(&mut w, &reexports, root.is_some());

        if root.is_some() {
            w.decrease_indent();
            w.line("}");
        }
        Ok(w.finish())
    }

    fn announce(&mut self, path: &str, kind: SymbolKind, deprecated: bool) {
        if self.suppress_announcements {
            return;
        }
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_symbol(&RenderedSymbol {
                path: path.to_string(),
                kind,
                deprecated,
            });
        }
    }

    fn render_namespace(
        &mut self,
        w: &mut DeclarationWriter,
        ns: &Namespace,
        nested: bool,
        parent_reexports: &mut Vec<NamespaceReexport>,
    ) -> Result<(), RenderError> {
        let doc = Doc {
            description: ns.description.as_deref(),
            deprecated: ns.deprecated.as_deref(),
            tags: feature_tags(&ns.feature),
            ..Doc::default()
        };
        write_doc(w, &doc);
        self.announce(&ns.name, SymbolKind::Namespace, ns.deprecated.is_some());

        let keyword = if nested { "export namespace" } else { "declare namespace" };
        let escaped = escape_dotted(&ns.name);
        for reexport in dotted_reexports(&ns.name) {
            if !parent_reexports.contains(&reexport) {
                parent_reexports.push(reexport);
            }
        }
        w.line(&format!("{keyword} {escaped} {{"));
        w.increase_indent();

        let mut types: Vec<&Property> = Vec::new();
        let mut values: Vec<&Property> = Vec::new();
        let mut functions: Vec<&Property> = Vec::new();
        for prop in ns.all.values().filter(|p| !p.nodoc) {
            if prop.is_type {
                types.push(prop);
            } else if prop.is_function() {
                functions.push(prop);
            } else {
                values.push(prop);
            }
        }
        if self.options.sort_members {
            for group in [&mut types, &mut values, &mut functions] {
                group.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }

        let mut reexports = Vec::new();
        for prop in types {
            separate(w);
            self.render_type_declaration(w, &ns.name, prop, &mut reexports)?;
        }
        for prop in values {
            separate(w);
            self.render_value(w, &ns.name, prop, &mut reexports)?;
        }
        for prop in functions {
            separate(w);
            self.render_function(w, &ns.name, prop, &mut reexports)?;
        }
        write_reexports(w, &reexports);

        w.decrease_indent();
        w.line("}");
        Ok(())
    }

    fn render_type_declaration(
        &mut self,
        w: &mut DeclarationWriter,
        ns: &str,
        prop: &Property,
        reexports: &mut Vec<(String, String)>,
    ) -> Result<(), RenderError> {
        let path = format!("{ns}.{}", prop.name);
        let templates = match &prop.ty {
            Type::Object(obj) => self
                .overrides
                .object_templates_for(&path)
                .or(obj.templates.as_deref()),
            _ => self.overrides.object_templates_for(&path),
        };

        self.template_scope = templates.map(template_names).unwrap_or_default();
        let result = self.declare_type(w, &path, prop, templates, reexports);
        self.template_scope.clear();
        result
    }

    fn declare_type(
        &mut self,
        w: &mut DeclarationWriter,
        path: &str,
        prop: &Property,
        templates: Option<&str>,
        reexports: &mut Vec<(String, String)>,
    ) -> Result<(), RenderError> {
        let name = declared_name(&prop.name, reexports);
        let generics = templates.map(|t| format!("<{t}>")).unwrap_or_default();
        let deprecated = prop.deprecated.is_some();
        let level = w.indent_level();

        let Type::Object(obj) = &prop.ty else {
            let text = self.type_text(&prop.ty, path, level, false)?;
            write_doc(w, &self.property_doc(prop, path));
            self.announce(path, SymbolKind::TypeAlias, deprecated);
            w.line(&format!("export type {name}{generics} = {text};"));
            return Ok(());
        };

        let body = self.object_members(obj, path, level + 1)?;
        write_doc(w, &self.property_doc(prop, path));
        if obj.instance_type.is_some() {
            self.announce(path, SymbolKind::Class, deprecated);
            w.line(&format!("export class {name}{generics} {{"));
            w.increase_indent();
            w.line(&format!("constructor(arg: {name}{});", template_args(templates)));
            w.decrease_indent();
        } else {
            self.announce(path, SymbolKind::Interface, deprecated);
            w.line(&format!("export interface {name}{generics} {{"));
        }
        for line in body {
            w.write(&line);
            w.write_line();
        }
        w.line("}");
        self.announce_members(obj, path);
        Ok(())
    }

    fn announce_members(&mut self, obj: &ObjectType, path: &str) {
        for member in obj.properties.values().filter(|p| !p.nodoc) {
            let kind = if member.is_event {
                SymbolKind::Event
            } else if is_method(member) {
                SymbolKind::Method
            } else {
                SymbolKind::Property
            };
            let member_path = format!("{path}.{}", member.name);
            self.announce(&member_path, kind, member.deprecated.is_some());
        }
    }

    fn render_value(
        &mut self,
        w: &mut DeclarationWriter,
        ns: &str,
        prop: &Property,
        reexports: &mut Vec<(String, String)>,
    ) -> Result<(), RenderError> {
        let path = format!("{ns}.{}", prop.name);
        let name = declared_name(&prop.name, reexports);
        write_doc(w, &self.property_doc(prop, &path));

        let level = w.indent_level();
        let (kind, line) = match &prop.ty {
            Type::Literal(literal) if prop.is_const => (
                SymbolKind::Const,
                format!("export const {name} = {};", literal_text(literal)),
            ),
            ty if prop.is_const || prop.is_event => {
                let kind = if prop.is_event {
                    SymbolKind::Event
                } else {
                    SymbolKind::Const
                };
                let text = self.type_text(ty, &path, level, false)?;
                (kind, format!("export const {name}: {text};"))
            }
            ty => {
                let mut text = self.type_text(ty, &path, level, prop.optional)?;
                if prop.optional {
                    text.push_str(" | undefined");
                }
                (SymbolKind::Variable, format!("export let {name}: {text};"))
            }
        };
        self.announce(&path, kind, prop.deprecated.is_some());
        w.line(&line);
        Ok(())
    }

    fn render_function(
        &mut self,
        w: &mut DeclarationWriter,
        ns: &str,
        prop: &Property,
        reexports: &mut Vec<(String, String)>,
    ) -> Result<(), RenderError> {
        let Type::Function(func) = &prop.ty else {
            return Ok(());
        };
        let path = format!("{ns}.{}", prop.name);
        let name = declared_name(&prop.name, reexports);
        let signatures = expand(func, &path)?;
        let level = w.indent_level();

        for (index, signature) in signatures.iter().enumerate() {
            // Overloads after the first describe the same symbol.
            self.suppress_announcements = index > 0;
            self.announce(&path, SymbolKind::Function, prop.deprecated.is_some());

            write_doc(w, &self.signature_doc(prop, signature, &path));
            let (params, returns) = self.signature_text(signature, &path, level)?;
            w.line(&format!("export function {name}({params}): {returns};"));
        }
        self.suppress_announcements = false;
        Ok(())
    }

    fn property_doc<'p>(&self, prop: &'p Property, path: &str) -> Doc<'p> {
        let mut tags = feature_tags(&prop.feature);
        tags.extend(self.overrides.tags_for(&prop.ty, path));
        Doc {
            description: prop.description.as_deref(),
            deprecated: prop.deprecated.as_deref(),
            tags,
            ..Doc::default()
        }
    }

    fn signature_doc<'p>(&self, prop: &'p Property, signature: &'p Signature, path: &str) -> Doc<'p> {
        let mut doc = self.property_doc(prop, path);
        doc.params = param_docs(&signature.parameters);
        doc.returns = signature.returns.description.as_deref();
        doc
    }
}

/// `@param` entries for every described parameter.
fn param_docs(params: &[Property]) -> Vec<(String, &str)> {
    params
        .iter()
        .filter_map(|param| {
            let description = param.description.as_deref()?;
            Some((naming::parameter_name(&param.name).into_owned(), description))
        })
        .collect()
}

/// Function-typed object members render as methods unless optional.
fn is_method(prop: &Property) -> bool {
    prop.is_function() && !prop.optional && !prop.is_event
}

fn separate(w: &mut DeclarationWriter) {
    if !w.at_blank_line() {
        w.write_line();
    }
}

fn write_doc(w: &mut DeclarationWriter, doc: &Doc<'_>) {
    for line in doc.lines() {
        w.line(&line);
    }
}

fn write_reexports(w: &mut DeclarationWriter, reexports: &[(String, String)]) {
    if reexports.is_empty() {
        return;
    }
    separate(w);
    for (internal, external) in reexports {
        w.line(&format!("export {{ {internal} as {external} }};"));
    }
}

/// Escaped declaration name; records a re-export when escaping changed it.
fn declared_name(name: &str, reexports: &mut Vec<(String, String)>) -> String {
    let escaped = naming::escape(name);
    if escaped != name {
        reexports.push((escaped.to_string(), name.to_string()));
    }
    escaped.into_owned()
}

/// Re-export of one reserved segment of a dotted namespace name, placed in
/// the namespace named by the segments before it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NamespaceReexport {
    /// Escaped dotted prefix; empty for the leading segment.
    scope: String,
    internal: String,
    external: String,
}

fn dotted_reexports(name: &str) -> Vec<NamespaceReexport> {
    let mut scope: Vec<String> = Vec::new();
    let mut reexports = Vec::new();
    for segment in name.split('.') {
        let escaped = naming::escape(segment);
        if escaped != segment {
            reexports.push(NamespaceReexport {
                scope: scope.join("."),
                internal: escaped.to_string(),
                external: segment.to_string(),
            });
        }
        scope.push(escaped.into_owned());
    }
    reexports
}

/// `a._debugger` is restored by `namespace a { export { _debugger as debugger }; }`;
/// leading segments are re-exported from the enclosing block.
fn write_namespace_reexports(
    w: &mut DeclarationWriter,
    reexports: &[NamespaceReexport],
    nested: bool,
) {
    let keyword = if nested { "export namespace" } else { "declare namespace" };
    let mut scoped: BTreeMap<&str, Vec<&NamespaceReexport>> = BTreeMap::new();
    for reexport in reexports.iter().filter(|r| !r.scope.is_empty()) {
        scoped.entry(reexport.scope.as_str()).or_default().push(reexport);
    }
    for (scope, entries) in scoped {
        separate(w);
        w.line(&format!("{keyword} {scope} {{"));
        w.increase_indent();
        for entry in entries {
            w.line(&format!("export {{ {} as {} }};", entry.internal, entry.external));
        }
        w.decrease_indent();
        w.line("}");
    }

    let leading: Vec<(String, String)> = reexports
        .iter()
        .filter(|r| r.scope.is_empty())
        .map(|r| (r.internal.clone(), r.external.clone()))
        .collect();
    write_reexports(w, &leading);
}

fn escape_dotted(name: &str) -> String {
    name.split('.')
        .map(naming::escape)
        .collect::<Vec<_>>()
        .join(".")
}

/// `H extends (...args: any) => void, C = void` → `["H", "C"]`.
fn template_names(templates: &str) -> Vec<String> {
    templates
        .split(',')
        .filter_map(|part| part.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// `<H, C>` for a template list, empty without one.
fn template_args(templates: Option<&str>) -> String {
    match templates {
        Some(t) => format!("<{}>", template_names(t).join(", ")),
        None => String::new(),
    }
}

pub(crate) fn literal_text(literal: &Literal) -> String {
    match literal {
        Literal::String(s) => serde_json::Value::String(s.clone()).to_string(),
        Literal::Number(n) => n.to_string(),
        Literal::Boolean(b) => b.to_string(),
    }
}
