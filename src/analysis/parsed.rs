//! Parsing Python source into tree-sitter trees.

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// The tree is kept next to its source so every check can share one parse.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: Tree,
    /// The original source code (kept for node text extraction).
    pub source: String,
    /// The file path (for display in findings).
    pub path: String,
}

impl ParsedFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Whether tree-sitter had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// Parse Python source into a tree.
///
/// Returns an error only when tree-sitter produces no tree at all. Syntax
/// errors still yield a tree; check [`ParsedFile::has_errors`].
pub fn parse_python(path: &Path, source: &str) -> anyhow::Result<ParsedFile> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_python::LANGUAGE.into())?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| anyhow::anyhow!("failed to parse Python source: {}", path.display()))?;

    Ok(ParsedFile {
        tree,
        source: source.to_string(),
        path: path.to_string_lossy().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_source() {
        let parsed = parse_python(Path::new("ok.py"), "def f():\n    return 1\n").unwrap();
        assert!(!parsed.has_errors());
        assert_eq!(parsed.root().kind(), "module");
        assert_eq!(parsed.path, "ok.py");
    }

    #[test]
    fn test_parse_reports_syntax_errors() {
        let parsed = parse_python(Path::new("bad.py"), "def f(:\n    return\n").unwrap();
        assert!(parsed.has_errors());
    }
}
