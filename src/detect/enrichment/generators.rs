use crate::analysis::{unwrap_parens, Section, ScopeWalk};
use crate::detect::{Category, Finding};

use super::RuleContext;

/// Generators (sync or async) without a `Yields:` section.
pub fn require_yields(ctx: &RuleContext) -> Option<Finding> {
    if !ctx.symbol.kind.is_callable() || ctx.has(Section::Yields) {
        return None;
    }
    let node = ctx.node()?;

    let yields = ScopeWalk::new(node).any(|n| n.kind() == "yield");
    yields.then(|| {
        ctx.finding(
            "missing-yields",
            format!("{} is a generator but has no Yields: section", ctx.subject()),
            Category::Required,
        )
    })
}

/// Generators that take values through `send()` (`value = yield ...`)
/// without a `Receives:` section. A bare `yield` does not count.
pub fn require_receives(ctx: &RuleContext) -> Option<Finding> {
    if !ctx.symbol.kind.is_callable() || ctx.has(Section::Receives) {
        return None;
    }
    let node = ctx.node()?;

    let receives = ScopeWalk::new(node)
        .filter(|n| n.kind() == "assignment")
        .filter_map(|assignment| assignment.child_by_field_name("right"))
        .any(|value| unwrap_parens(value).kind() == "yield");
    receives.then(|| {
        ctx.finding(
            "missing-receives",
            format!(
                "{} receives values via send() but has no Receives: section",
                ctx.subject()
            ),
            Category::Required,
        )
    })
}
