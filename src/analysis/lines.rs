//! Line-to-symbol attribution.

use tree_sitter::Tree;

use super::facts::Symbol;
use super::symbols::get_documented_symbols;

/// Dense lookup from every line of a file to its innermost symbol.
#[derive(Debug, Clone)]
pub struct LineMap {
    symbols: Vec<Symbol>,
    /// Index into `symbols` for line `i + 1`.
    owners: Vec<usize>,
}

impl LineMap {
    /// Build the map from already extracted symbols.
    ///
    /// Smaller spans win; on equal spans a definition beats the module.
    /// The module symbol must be present, it covers every line.
    pub fn from_symbols(symbols: Vec<Symbol>) -> Self {
        let module_end = symbols
            .iter()
            .find(|s| s.is_module())
            .map(|s| s.end_line)
            .unwrap_or(0);

        let mut ranked: Vec<usize> = (0..symbols.len()).collect();
        ranked.sort_by_key(|&i| (symbols[i].span_size(), symbols[i].is_module()));

        let mut owners = Vec::with_capacity(module_end);
        for line in 1..=module_end {
            let owner = ranked
                .iter()
                .copied()
                .find(|&i| symbols[i].span().contains(line));
            // The module spans [1, module_end], so a match always exists.
            owners.push(owner.unwrap_or(0));
        }

        Self { symbols, owners }
    }

    /// Innermost symbol containing `line`, if the line is inside the file.
    pub fn get(&self, line: usize) -> Option<&Symbol> {
        self.symbol_index(line).map(|i| &self.symbols[i])
    }

    /// Position in [`LineMap::symbols`] of the symbol owning `line`.
    pub fn symbol_index(&self, line: usize) -> Option<usize> {
        line.checked_sub(1).and_then(|i| self.owners.get(i)).copied()
    }

    /// All symbols in extraction order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of mapped lines (the module's last line).
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Iterate `(line, symbol)` pairs in line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Symbol)> + '_ {
        self.owners
            .iter()
            .enumerate()
            .map(move |(i, &owner)| (i + 1, &self.symbols[owner]))
    }
}

/// Map each line `1..=module_end_line` to the innermost symbol containing it.
pub fn map_lines_to_symbols(tree: &Tree, source: &str) -> LineMap {
    LineMap::from_symbols(get_documented_symbols(tree, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{parse_python, SymbolKind};
    use std::path::Path;

    fn line_map(source: &str) -> LineMap {
        let parsed = parse_python(Path::new("t.py"), source).unwrap();
        map_lines_to_symbols(&parsed.tree, &parsed.source)
    }

    #[test]
    fn test_innermost_symbol_wins() {
        let source = r#"import os

class A:
    """Doc."""

    def m(self):
        return 1

x = 2
"#;
        let map = line_map(source);
        assert_eq!(map.len(), 9);
        assert_eq!(map.get(1).unwrap().kind, SymbolKind::Module);
        assert_eq!(map.get(3).unwrap().name, "A");
        assert_eq!(map.get(5).unwrap().name, "A");
        assert_eq!(map.get(6).unwrap().name, "m");
        assert_eq!(map.get(7).unwrap().name, "m");
        assert_eq!(map.get(9).unwrap().kind, SymbolKind::Module);
        assert!(map.get(10).is_none());
        assert!(map.get(0).is_none());
    }

    #[test]
    fn test_decorator_lines_belong_to_definition() {
        let map = line_map("@decorator\ndef f():\n    pass\n");
        assert_eq!(map.get(1).unwrap().name, "f");
    }

    #[test]
    fn test_single_line_file_prefers_definition() {
        let map = line_map("def f(): pass\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(1).unwrap().name, "f");
    }

    #[test]
    fn test_empty_module_maps_line_one() {
        let map = line_map("");
        assert_eq!(map.len(), 1);
        assert!(map.get(1).unwrap().is_module());
        assert_eq!(map.iter().count(), 1);
    }
}
