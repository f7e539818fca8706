use regex::Regex;
use tree_sitter::Node;

use crate::analysis::{
    extract_section_content, has_self_assignments, is_dataclass, is_named_tuple, is_typed_dict, Section,
    SymbolKind,
};
use crate::detect::{Category, Finding};

use super::RuleContext;

lazy_static::lazy_static! {
    /// `name (type): description`
    static ref TYPED_ENTRY: Regex = Regex::new(r"^\w+\s*\(.+\)\s*:").unwrap();
}

/// Classes with data fields, and package initializers, without an
/// `Attributes:` section.
pub fn require_attributes(ctx: &RuleContext) -> Option<Finding> {
    if ctx.has(Section::Attributes) {
        return None;
    }
    let message = match ctx.symbol.kind {
        SymbolKind::Module if ctx.is_package_init() => {
            format!("Package '{}' has no Attributes: section", ctx.file_path)
        }
        SymbolKind::Class => {
            let label = attribute_kind(ctx.node()?, ctx.source)?;
            format!("{} '{}' has no Attributes: section", label, ctx.symbol.name)
        }
        _ => return None,
    };
    Some(ctx.finding("missing-attributes", message, Category::Required))
}

/// First matching class shape that carries attributes.
fn attribute_kind(class: Node, source: &str) -> Option<&'static str> {
    if is_dataclass(class, source) {
        Some("Dataclass")
    } else if is_named_tuple(class, source) {
        Some("NamedTuple")
    } else if is_typed_dict(class, source) {
        Some("TypedDict")
    } else if has_self_assignments(class, source) {
        Some("Class")
    } else {
        None
    }
}

/// Class `Attributes:` entries not written as `name (type): description`.
/// Reports the first offending entry only.
pub fn require_typed_attributes(ctx: &RuleContext) -> Option<Finding> {
    if ctx.symbol.kind != SymbolKind::Class || !ctx.has(Section::Attributes) {
        return None;
    }
    ctx.node()?;
    let content = extract_section_content(ctx.symbol.docstring.as_deref()?, Section::Attributes)?;
    let offender = untyped_entry(&content)?;

    Some(ctx.finding(
        "missing-typed-attributes",
        format!(
            "{} has an untyped Attributes: entry '{}'; use 'name (type): description'",
            ctx.subject(),
            offender
        ),
        Category::Recommended,
    ))
}

/// First entry at the section's base indentation that lacks a type.
/// Deeper lines are continuation text.
fn untyped_entry(content: &str) -> Option<&str> {
    let indent = |line: &str| line.len() - line.trim_start().len();
    let mut entries = content.lines().filter(|line| !line.trim().is_empty());
    let first = entries.next()?;
    let base = indent(first);

    std::iter::once(first)
        .chain(entries)
        .filter(|line| indent(line) == base)
        .map(str::trim)
        .find(|entry| !TYPED_ENTRY.is_match(entry))
}
