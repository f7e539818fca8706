//! Symbol records extracted from Python syntax trees.

use std::fmt;

use serde::Serialize;

/// Name given to the module-level symbol of every file.
pub const MODULE_SYMBOL_NAME: &str = "<module>";

/// Inclusive span of 1-indexed source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineRange {
    /// First line (1-indexed).
    pub start: usize,
    /// Last line (1-indexed, inclusive).
    pub end: usize,
}

impl LineRange {
    /// Create a range; `end` is raised to `start` if it would precede it.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// A range covering exactly one line.
    pub fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    /// Check whether `other` lies entirely within this range.
    pub fn encloses(&self, other: &LineRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &LineRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Kind of documentable symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Module,
    Class,
    Function,
    Method,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
        }
    }

    /// Check if this is a callable (function or method).
    pub fn is_callable(&self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Method)
    }

    /// Capitalized form used at the start of messages ("Method", "Class").
    pub fn title(&self) -> &'static str {
        match self {
            SymbolKind::Module => "Module",
            SymbolKind::Class => "Class",
            SymbolKind::Function => "Function",
            SymbolKind::Method => "Method",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One documentable unit of a Python file.
///
/// Symbols are snapshots computed fresh from a syntax tree on every pass;
/// nothing mutates them after extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Identifier, or [`MODULE_SYMBOL_NAME`] for the module itself.
    pub name: String,
    pub kind: SymbolKind,
    /// Line of the `def`/`class` keyword (1 for the module).
    pub line: usize,
    /// Last line of the whole definition.
    pub end_line: usize,
    /// Line of the topmost decorator, or `line` when undecorated.
    pub definition_start: usize,
    /// Raw docstring text without the surrounding quotes.
    pub docstring: Option<String>,
    pub docstring_range: Option<LineRange>,
    /// Keyword line through the line before the first body statement.
    /// Only present for functions and methods.
    pub signature_range: Option<LineRange>,
    /// Body lines after the docstring. Collapses to the last line when the
    /// body is empty or holds only a docstring.
    pub body_range: LineRange,
    /// Enclosing class for methods.
    pub parent: Option<String>,
}

impl Symbol {
    /// The whole definition, decorators included.
    pub fn span(&self) -> LineRange {
        LineRange::new(self.definition_start, self.end_line)
    }

    /// Number of lines spanned beyond the first; used to rank nesting.
    pub fn span_size(&self) -> usize {
        self.end_line - self.definition_start
    }

    pub fn is_module(&self) -> bool {
        self.kind == SymbolKind::Module
    }

    /// Lines occupied by decorators, if any.
    pub fn decorator_range(&self) -> Option<LineRange> {
        if self.definition_start < self.line {
            Some(LineRange::new(self.definition_start, self.line - 1))
        } else {
            None
        }
    }
}
