//! Syntax-tree analysis of Python source.
//!
//! Everything here works on a tree-sitter tree and produces plain facts:
//! - Symbols (module, classes, functions, methods) with line ranges
//! - A line-to-symbol map for attributing changed lines
//! - Docstring section headers and their contents
//! - Structural predicates over class definitions
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source Text     │────▶│ parse_python │────▶│ ParsedFile    │
//! └─────────────────┘     └──────────────┘     └───────────────┘
//!                                                      │
//!                                                      ▼
//!                         ┌──────────────┐     ┌───────────────┐
//!                         │ LineMap      │◀────│ Symbols       │
//!                         └──────────────┘     │ (+ NodeIndex) │
//!                                              └───────────────┘
//! ```
//!
//! Nothing in this module reads files or logs.

mod classify;
mod facts;
mod lines;
mod parsed;
mod sections;
mod symbols;
mod walk;

pub use classify::{
    base_classes, decorators, has_self_assignments, is_dataclass, is_enum, is_named_tuple, is_protocol,
    is_typed_dict, matches_name,
};
pub use facts::{LineRange, Symbol, SymbolKind, MODULE_SYMBOL_NAME};
pub use lines::{map_lines_to_symbols, LineMap};
pub use parsed::{parse_python, ParsedFile};
pub use sections::{extract_section_content, parse_sections, Section};
pub use symbols::{build_node_index, get_documented_symbols, NodeIndex};
pub use walk::{
    body_statements, docstring_statement, first_named_child, last_line, named_children, node_text,
    reference_name, start_line, string_value, unwrap_parens, ScopeWalk,
};
