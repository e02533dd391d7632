//! Reserved-name escaping.
//!
//! Schema names such as `debugger` or `delete` cannot be declared directly
//! inside a TypeScript namespace. They are declared under an internal alias
//! (`_debugger`) and re-exported under their real name. Names that begin
//! with a digit get the same prefix. `escape` and `unescape` are inverses
//! for every name `needs_escape` accepts.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use std::borrow::Cow;

/// Prefix applied to escaped names.
pub const ESCAPE_PREFIX: char = '_';

static RESERVED_WORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        // ECMAScript reserved words
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        // Strict mode reserved words
        "implements",
        "interface",
        "let",
        "package",
        "private",
        "protected",
        "public",
        "static",
        "yield",
    ]
    .into_iter()
    .collect()
});

/// Whether `name` is a reserved word of the target dialect.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(name)
}

/// Whether `name` must be declared under an internal alias.
pub fn needs_escape(name: &str) -> bool {
    is_reserved(name) || name.starts_with(|c: char| c.is_ascii_digit())
}

/// Internal alias for a declared name, borrowed when no escape is needed.
pub fn escape(name: &str) -> Cow<'_, str> {
    if needs_escape(name) {
        Cow::Owned(format!("{ESCAPE_PREFIX}{name}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Inverse of [`escape`]: the external name of an internal alias.
pub fn unescape(name: &str) -> &str {
    match name.strip_prefix(ESCAPE_PREFIX) {
        Some(rest) if needs_escape(rest) => rest,
        _ => name,
    }
}

/// Whether `name` is a plain identifier (usable unquoted as a property key).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c == '$' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

/// Render `name` as an object member key.
///
/// Reserved words are legal member keys and stay bare. Anything that is not
/// an identifier is quoted.
pub fn property_key(name: &str) -> Cow<'_, str> {
    if is_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\"")))
    }
}

/// Render `name` as a parameter name. Parameters cannot be re-exported, so
/// the alias is the final name.
pub fn parameter_name(name: &str) -> Cow<'_, str> {
    if is_identifier(name) {
        escape(name)
    } else {
        let cleaned: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        Cow::Owned(escape(&cleaned).into_owned())
    }
}
