//! Type expressions.
//!
//! `ambiguous` is set when the caller places the type somewhere a bare
//! compound would bind wrongly (an array element, a union member, the left
//! of `| undefined`). Compound types then wrap themselves in parentheses.

use extdts_common::RenderError;
use extdts_common::limits::MAX_TUPLE_EXPANSION;
use extdts_common::naming;
use extdts_schema::{FunctionType, ObjectType, Property, SequenceType, Type};
use tracing::debug;

use super::{Doc, Renderer, feature_tags, is_method, literal_text, param_docs};
use crate::expander::{Signature, expand, left_optional_positions};

impl Renderer<'_> {
    fn indent(&self, level: u32) -> String {
        self.options.indent.repeat(level as usize)
    }

    /// Render `ty`, found at `path`, for a line indented `level` deep.
    pub(super) fn type_text(
        &self,
        ty: &Type,
        path: &str,
        level: u32,
        ambiguous: bool,
    ) -> Result<String, RenderError> {
        let overridden = self.overrides.type_override(ty, path);
        let ty = overridden.as_ref().unwrap_or(ty);

        let text = match ty {
            Type::Primitive(primitive) => primitive.keyword().to_string(),
            Type::Literal(literal) => literal_text(literal),
            Type::Number(_) => "number".to_string(),
            Type::Ref(reference) => {
                if reference.generic && !self.template_scope.contains(&reference.name) {
                    return Err(RenderError::TemplateRefInSignature {
                        path: path.to_string(),
                        name: reference.name.clone(),
                    });
                }
                if reference.template_args.is_empty() {
                    reference.name.clone()
                } else {
                    let args = reference
                        .template_args
                        .iter()
                        .map(|arg| self.type_text(arg, path, level, false))
                        .collect::<Result<Vec<_>, _>>()?;
                    format!("{}<{}>", reference.name, args.join(", "))
                }
            }
            Type::Sequence(seq) => self.sequence_text(seq, path, level, ambiguous)?,
            Type::Object(obj) => {
                let members = self.object_members(obj, path, level + 1)?;
                if members.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{\n{}\n{}}}", members.join("\n"), self.indent(level))
                }
            }
            Type::Union(items) => self.joined(items, " & ", path, level, ambiguous, "unknown")?,
            Type::Choices(items) => self.joined(items, " | ", path, level, ambiguous, "never")?,
            Type::Function(func) => self.function_text(func, path, level, ambiguous)?,
        };
        Ok(text)
    }

    fn joined(
        &self,
        items: &[Type],
        separator: &str,
        path: &str,
        level: u32,
        ambiguous: bool,
        empty: &str,
    ) -> Result<String, RenderError> {
        match items {
            [] => Ok(empty.to_string()),
            [only] => self.type_text(only, path, level, ambiguous),
            many => {
                let parts = many
                    .iter()
                    .map(|item| self.type_text(item, path, level, true))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(parenthesize(parts.join(separator), ambiguous))
            }
        }
    }

    /// `T[]`, a union of fixed-length tuples, or `[T, ...T[]]`.
    ///
    /// `maxItems: 0` is the empty tuple `[]`. A bounded range too wide to
    /// spell as tuples keeps its minimum and drops its maximum.
    fn sequence_text(
        &self,
        seq: &SequenceType,
        path: &str,
        level: u32,
        ambiguous: bool,
    ) -> Result<String, RenderError> {
        let min = seq.min_items;
        if let Some(max) = seq.max_items
            && max >= min
        {
            if max - min < MAX_TUPLE_EXPANSION {
                return self.tuple_union(seq, min, max, path, level, ambiguous);
            }
            debug!(path, min, max, "tuple range too wide, dropping maxItems");
        }

        if min > 0 {
            let element = self.type_text(&seq.element, path, level, false)?;
            let rest = self.type_text(&seq.element, path, level, true)?;
            let mut parts = vec![element; min.min(MAX_TUPLE_EXPANSION)];
            parts.push(format!("...{rest}[]"));
            return Ok(format!("[{}]", parts.join(", ")));
        }

        let element = self.type_text(&seq.element, path, level, true)?;
        Ok(format!("{element}[]"))
    }

    fn tuple_union(
        &self,
        seq: &SequenceType,
        min: usize,
        max: usize,
        path: &str,
        level: u32,
        ambiguous: bool,
    ) -> Result<String, RenderError> {
        let element = self.type_text(&seq.element, path, level, false)?;
        let tuples: Vec<String> = (min..=max)
            .map(|len| format!("[{}]", vec![element.as_str(); len].join(", ")))
            .collect();
        let multiple = tuples.len() > 1;
        let text = tuples.join(" | ");
        Ok(if multiple {
            parenthesize(text, ambiguous)
        } else {
            text
        })
    }

    /// Arrow type for a plain function; a callable object literal with one
    /// call signature per overload for async ones.
    fn function_text(
        &self,
        func: &FunctionType,
        path: &str,
        level: u32,
        ambiguous: bool,
    ) -> Result<String, RenderError> {
        if func.async_callback.is_some() {
            let indent = self.indent(level + 1);
            let mut lines = Vec::new();
            for signature in expand(func, path)? {
                let (params, returns) = self.signature_text(&signature, path, level + 1)?;
                lines.push(format!("{indent}({params}): {returns};"));
            }
            return Ok(format!("{{\n{}\n{}}}", lines.join("\n"), self.indent(level)));
        }

        let visible: Vec<&Property> = func.parameters.iter().filter(|p| !p.nodoc).collect();
        let left_optional = left_optional_positions(&visible);
        let mut params = Vec::with_capacity(visible.len());
        for (index, param) in visible.iter().enumerate() {
            let child = format!("{path}.{}", param.name);
            let name = naming::parameter_name(&param.name);
            if left_optional.contains(&index) {
                let ty = self.type_text(&param.ty, &child, level, true)?;
                params.push(format!("{name}: {ty} | undefined"));
            } else {
                params.push(self.parameter_text(param, &child, level)?);
            }
        }
        let returns = match &func.returns {
            Some(ret) => self.type_text(&ret.ty, &format!("{path}.{}", ret.name), level, false)?,
            None => "void".to_string(),
        };
        Ok(parenthesize(
            format!("({}) => {returns}", params.join(", ")),
            ambiguous,
        ))
    }

    fn parameter_text(&self, param: &Property, path: &str, level: u32) -> Result<String, RenderError> {
        let name = naming::parameter_name(&param.name);
        let marker = if param.optional { "?" } else { "" };
        let ty = self.type_text(&param.ty, path, level, false)?;
        Ok(format!("{name}{marker}: {ty}"))
    }

    /// Parameter list and return type of one expanded overload.
    pub(super) fn signature_text(
        &self,
        signature: &Signature,
        path: &str,
        level: u32,
    ) -> Result<(String, String), RenderError> {
        let params = signature
            .parameters
            .iter()
            .map(|param| self.parameter_text(param, &format!("{path}.{}", param.name), level))
            .collect::<Result<Vec<_>, _>>()?;
        let returns = self.type_text(
            &signature.returns.ty,
            &format!("{path}.{}", signature.returns.name),
            level,
            false,
        )?;
        Ok((params.join(", "), returns))
    }

    /// Member lines of an object body, each indented `level` deep.
    pub(super) fn object_members(
        &self,
        obj: &ObjectType,
        path: &str,
        level: u32,
    ) -> Result<Vec<String>, RenderError> {
        let indent = self.indent(level);
        let mut lines = Vec::new();

        for prop in obj.properties.values().filter(|p| !p.nodoc) {
            let child = format!("{path}.{}", prop.name);
            let key = naming::property_key(&prop.name);
            let mut doc = Doc {
                description: prop.description.as_deref(),
                deprecated: prop.deprecated.as_deref(),
                tags: feature_tags(&prop.feature),
                ..Doc::default()
            };
            doc.tags.extend(self.overrides.tags_for(&prop.ty, &child));

            if is_method(prop)
                && let Type::Function(func) = &prop.ty
            {
                let signatures = expand(func, &child)?;
                for signature in &signatures {
                    doc.params = param_docs(&signature.parameters);
                    doc.returns = signature.returns.description.as_deref();
                    lines.extend(doc.lines().into_iter().map(|l| format!("{indent}{l}")));
                    let (params, returns) = self.signature_text(signature, &child, level)?;
                    lines.push(format!("{indent}{key}({params}): {returns};"));
                }
                continue;
            }

            lines.extend(doc.lines().into_iter().map(|l| format!("{indent}{l}")));
            let marker = if prop.optional { "?" } else { "" };
            let ty = self.type_text(&prop.ty, &child, level, false)?;
            lines.push(format!("{indent}{key}{marker}: {ty};"));
        }

        if let Some(index) = &obj.index_signature {
            let ty = self.type_text(index, path, level, false)?;
            lines.push(format!("{indent}[key: string]: {ty};"));
        }
        Ok(lines)
    }
}

fn parenthesize(text: String, ambiguous: bool) -> String {
    if ambiguous { format!("({text})") } else { text }
}
