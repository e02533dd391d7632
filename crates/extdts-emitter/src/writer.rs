//! Indentation-aware text sink for the renderer.

use extdts_common::limits::DEFAULT_INDENT;

/// Accumulates declaration text line by line.
///
/// Indentation is applied explicitly with [`write_indent`](Self::write_indent)
/// so that callers decide where a line starts.
#[derive(Debug)]
pub struct DeclarationWriter {
    out: String,
    indent_unit: String,
    indent_level: u32,
}

impl Default for DeclarationWriter {
    fn default() -> Self {
        DeclarationWriter::new(DEFAULT_INDENT)
    }
}

impl DeclarationWriter {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        DeclarationWriter {
            out: String::new(),
            indent_unit: indent_unit.into(),
            indent_level: 0,
        }
    }

    pub fn write(&mut self, s: &str) {
        self.out.push_str(s);
    }

    pub fn write_line(&mut self) {
        self.out.push('\n');
    }

    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.out.push_str(&self.indent_unit);
        }
    }

    /// Indent, write `s`, end the line.
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.write(s);
        self.write_line();
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn indent_level(&self) -> u32 {
        self.indent_level
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Whether the last thing written was a blank line (or nothing at all).
    pub fn at_blank_line(&self) -> bool {
        self.out.is_empty() || self.out.ends_with("\n\n") || self.out.ends_with("{\n")
    }

    pub fn finish(self) -> String {
        self.out
    }
}
