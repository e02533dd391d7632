//! Symbol announcement.
//!
//! The renderer reports every symbol it emits to a [`SymbolObserver`]. Tools
//! downstream use this to build a symbol index of the generated file.

use rustc_hash::FxHashMap;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Namespace,
    Interface,
    Class,
    TypeAlias,
    Const,
    Variable,
    Event,
    Function,
    Property,
    Method,
}

impl SymbolKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Interface => "interface",
            SymbolKind::Class => "class",
            SymbolKind::TypeAlias => "type",
            SymbolKind::Const => "const",
            SymbolKind::Variable => "variable",
            SymbolKind::Event => "event",
            SymbolKind::Function => "function",
            SymbolKind::Property => "property",
            SymbolKind::Method => "method",
        }
    }
}

/// One emitted symbol, by its dotted schema path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSymbol {
    pub path: String,
    pub kind: SymbolKind,
    pub deprecated: bool,
}

pub trait SymbolObserver {
    fn on_symbol(&mut self, symbol: &RenderedSymbol);
}

/// Observer that records everything in announcement order.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<RenderedSymbol>,
    by_path: FxHashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn symbols(&self) -> &[RenderedSymbol] {
        &self.symbols
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| s.path.as_str())
    }

    /// First symbol announced at `path`.
    pub fn get(&self, path: &str) -> Option<&RenderedSymbol> {
        self.by_path.get(path).map(|&index| &self.symbols[index])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// `{"path": {"kind": ..., "deprecated": ...}}` in announcement order.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for symbol in &self.symbols {
            map.insert(
                symbol.path.clone(),
                json!({"kind": symbol.kind.as_str(), "deprecated": symbol.deprecated}),
            );
        }
        Value::Object(map)
    }
}

impl SymbolObserver for SymbolTable {
    fn on_symbol(&mut self, symbol: &RenderedSymbol) {
        self.by_path
            .entry(symbol.path.clone())
            .or_insert(self.symbols.len());
        self.symbols.push(symbol.clone());
    }
}
