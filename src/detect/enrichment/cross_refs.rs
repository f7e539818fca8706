use regex::Regex;

use crate::analysis::{extract_section_content, Section};
use crate::detect::{Category, Finding};

use super::RuleContext;

lazy_static::lazy_static! {
    /// `` `name` ``, `[text][`, or `:role:` followed by a backtick.
    static ref CROSS_REFERENCE: Regex =
        Regex::new(r"`[^`]+`|\[[^\]]+\]\[|:[A-Za-z][\w.-]*(:[A-Za-z][\w.-]*)*:`").unwrap();
}

/// Package initializers without `See Also:`, and `See Also:` sections that
/// contain no cross-reference syntax.
pub fn require_cross_references(ctx: &RuleContext) -> Option<Finding> {
    if ctx.symbol.is_module() && ctx.is_package_init() && !ctx.has(Section::SeeAlso) {
        return Some(ctx.finding(
            "missing-cross-references",
            format!("Package '{}' has no See Also: section", ctx.file_path),
            Category::Recommended,
        ));
    }

    if !ctx.has(Section::SeeAlso) {
        return None;
    }
    let content = extract_section_content(ctx.symbol.docstring.as_deref()?, Section::SeeAlso)?;
    let linked = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .any(|line| CROSS_REFERENCE.is_match(line));
    if linked {
        return None;
    }

    Some(ctx.finding(
        "missing-cross-references",
        format!(
            "{} has a See Also: section without cross-references",
            ctx.subject()
        ),
        Category::Recommended,
    ))
}
