//! Enrichment rules: docstrings that omit sections the code calls for.
//!
//! Each rule looks at one symbol and returns at most one finding. Rules are
//! listed in [`RULES`] next to the config toggle that gates them, and
//! [`check_enrichment`] runs the enabled ones over every documented symbol.
//!
//! # Adding a rule
//!
//! Write a `fn(&RuleContext) -> Option<Finding>`, add a toggle to
//! [`EnrichmentConfig`], and append the pair to [`RULES`].

mod attributes;
mod cross_refs;
mod examples;
mod generators;
mod parameters;
mod raises;
mod warns;

use std::collections::HashSet;

use tree_sitter::{Node, Tree};

use crate::analysis::{build_node_index, get_documented_symbols, parse_sections, NodeIndex, Section, Symbol, SymbolKind};
use crate::config::EnrichmentConfig;

use super::{Category, Finding};

pub use attributes::{require_attributes, require_typed_attributes};
pub use cross_refs::require_cross_references;
pub use examples::{prefer_fenced_code_blocks, require_examples};
pub use generators::{require_receives, require_yields};
pub use parameters::require_other_parameters;
pub use raises::require_raises;
pub use warns::require_warns;

/// Everything a rule may look at for one symbol.
pub struct RuleContext<'a> {
    pub symbol: &'a Symbol,
    pub sections: &'a HashSet<Section>,
    pub node_index: &'a NodeIndex<'a>,
    pub config: &'a EnrichmentConfig,
    pub file_path: &'a str,
    pub source: &'a str,
}

impl<'a> RuleContext<'a> {
    /// The definition node behind the symbol. `None` for the module and
    /// for an index entry of the wrong kind.
    pub fn node(&self) -> Option<Node<'a>> {
        let expected = match self.symbol.kind {
            SymbolKind::Module => return None,
            SymbolKind::Class => "class_definition",
            SymbolKind::Function | SymbolKind::Method => "function_definition",
        };
        self.node_index
            .get(&self.symbol.line)
            .copied()
            .filter(|node| node.kind() == expected)
    }

    pub fn has(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    /// `Function 'name'`, `Class 'name'`, or `Module 'path'`.
    pub fn subject(&self) -> String {
        if self.symbol.is_module() {
            format!("Module '{}'", self.file_path)
        } else {
            format!("{} '{}'", self.symbol.kind.title(), self.symbol.name)
        }
    }

    /// Whether the file is a package initializer.
    pub fn is_package_init(&self) -> bool {
        is_package_init(self.file_path)
    }

    /// Build a finding for this symbol at its definition line.
    pub fn finding(&self, rule: &str, message: String, category: Category) -> Finding {
        Finding::new(
            self.file_path,
            self.symbol.line,
            &self.symbol.name,
            rule,
            message,
            category,
        )
    }
}

/// A single enrichment rule.
pub type Detector = for<'c, 'a> fn(&'c RuleContext<'a>) -> Option<Finding>;

/// Rules in evaluation order, each keyed by its [`EnrichmentConfig`] toggle.
pub const RULES: &[(&str, Detector)] = &[
    ("require_raises", require_raises),
    ("require_yields", require_yields),
    ("require_receives", require_receives),
    ("require_warns", require_warns),
    ("require_other_parameters", require_other_parameters),
    ("require_attributes", require_attributes),
    ("require_typed_attributes", require_typed_attributes),
    ("require_examples", require_examples),
    ("require_cross_references", require_cross_references),
    ("prefer_fenced_code_blocks", prefer_fenced_code_blocks),
];

/// Whether `path` names a package initializer (`__init__.py`), with either
/// path separator.
pub fn is_package_init(path: &str) -> bool {
    path == "__init__.py" || path.ends_with("/__init__.py") || path.ends_with("\\__init__.py")
}

/// Run every enabled rule against every documented symbol of one file.
///
/// Findings come out in symbol order, then rule order. Symbols without a
/// docstring are skipped.
pub fn check_enrichment(
    source: &str,
    tree: &Tree,
    config: &EnrichmentConfig,
    file_path: &str,
) -> Vec<Finding> {
    let symbols = get_documented_symbols(tree, source);
    let node_index = build_node_index(tree, source);
    let enabled: Vec<Detector> = RULES
        .iter()
        .filter(|(toggle, _)| config.toggle(toggle))
        .map(|(_, rule)| *rule)
        .collect();

    let mut findings = Vec::new();
    for symbol in &symbols {
        let Some(docstring) = &symbol.docstring else {
            continue;
        };
        let sections = parse_sections(docstring);
        let ctx = RuleContext {
            symbol,
            sections: &sections,
            node_index: &node_index,
            config,
            file_path,
            source,
        };
        findings.extend(enabled.iter().filter_map(|rule| rule(&ctx)));
    }
    findings
}
