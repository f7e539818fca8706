use tree_sitter::Node;

use crate::analysis::{node_text, Section, ScopeWalk};
use crate::detect::{Category, Finding};

use super::RuleContext;

/// Functions that call `warnings.warn(...)` or a bare `warn(...)` without a
/// `Warns:` section.
///
/// The bare form also matches unrelated functions that happen to be named
/// `warn`; that false positive is accepted.
pub fn require_warns(ctx: &RuleContext) -> Option<Finding> {
    if !ctx.symbol.kind.is_callable() || ctx.has(Section::Warns) {
        return None;
    }
    let node = ctx.node()?;

    let warns = ScopeWalk::new(node)
        .filter(|n| n.kind() == "call")
        .filter_map(|call| call.child_by_field_name("function"))
        .any(|function| is_warn_call(function, ctx.source));
    warns.then(|| {
        ctx.finding(
            "missing-warns",
            format!("{} issues warnings but has no Warns: section", ctx.subject()),
            Category::Required,
        )
    })
}

fn is_warn_call(function: Node, source: &str) -> bool {
    match function.kind() {
        "identifier" => node_text(function, source) == "warn",
        "attribute" => {
            let object = function.child_by_field_name("object");
            let attribute = function.child_by_field_name("attribute");
            matches!(
                (object, attribute),
                (Some(o), Some(a)) if o.kind() == "identifier"
                    && node_text(o, source) == "warnings"
                    && node_text(a, source) == "warn"
            )
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;

    #[test]
    fn test_qualified_and_bare_warn() {
        let qualified = "def f():\n    \"\"\"Doc.\"\"\"\n    warnings.warn(\"old\", DeprecationWarning)\n";
        assert_eq!(rules(&check(qualified)), vec!["missing-warns"]);

        let bare = "def f():\n    \"\"\"Doc.\"\"\"\n    warn(\"old\")\n";
        assert_eq!(rules(&check(bare)), vec!["missing-warns"]);
    }

    #[test]
    fn test_other_calls_ignored() {
        let source = "def f(log):\n    \"\"\"Doc.\"\"\"\n    log.warn(\"x\")\n    warnings.simplefilter(\"ignore\")\n    warning(\"x\")\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_documented_warns() {
        let source = "def f():\n    \"\"\"Doc.\n\n    Warns:\n        DeprecationWarning: Always.\n    \"\"\"\n    warnings.warn(\"old\")\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_nested_warn_does_not_leak() {
        let source = "def outer():\n    \"\"\"Doc.\"\"\"\n    def inner():\n        warnings.warn(\"x\")\n";
        assert!(check(source).is_empty());
    }
}
