use std::collections::BTreeSet;

use tree_sitter::Node;

use crate::analysis::{named_children, reference_name, unwrap_parens, Section, ScopeWalk};
use crate::detect::{Category, Finding};

use super::RuleContext;

/// Label used for a bare `raise`.
const RERAISE: &str = "(re-raise)";

/// Functions that raise without documenting a `Raises:` section.
pub fn require_raises(ctx: &RuleContext) -> Option<Finding> {
    if !ctx.symbol.kind.is_callable() || ctx.has(Section::Raises) {
        return None;
    }
    let node = ctx.node()?;

    let raised: BTreeSet<&str> = ScopeWalk::new(node)
        .filter(|n| n.kind() == "raise_statement")
        .filter_map(|n| raised_name(n, ctx.source))
        .collect();
    if raised.is_empty() {
        return None;
    }

    let names: Vec<&str> = raised.into_iter().collect();
    Some(ctx.finding(
        "missing-raises",
        format!(
            "{} raises {} but has no Raises: section",
            ctx.subject(),
            names.join(", ")
        ),
        Category::Required,
    ))
}

/// Exception named by a raise statement. Unrecognized shapes such as
/// `raise errors[0]` yield nothing.
fn raised_name<'s>(raise: Node, source: &'s str) -> Option<&'s str> {
    let Some(exception) = named_children(raise).into_iter().next() else {
        return Some(RERAISE);
    };
    let exception = unwrap_parens(exception);
    let target = if exception.kind() == "call" {
        unwrap_parens(exception.child_by_field_name("function")?)
    } else {
        exception
    };
    reference_name(target, source)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;

    #[test]
    fn test_undocumented_raise() {
        let findings = check("def f():\n    \"\"\"Doc.\"\"\"\n    raise ValueError(\"x\")\n");
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.rule(), "missing-raises");
        assert_eq!(finding.symbol(), "f");
        assert_eq!(finding.category().as_str(), "required");
        assert!(finding.message().contains("ValueError"));
    }

    #[test]
    fn test_documented_raise() {
        let source = "def f():\n    \"\"\"Doc.\n\n    Raises:\n        ValueError: x.\n    \"\"\"\n    raise ValueError(\"x\")\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_names_sorted_and_deduplicated() {
        let source = r#"def f(x):
    """Doc."""
    if x:
        raise errors.TypeError
    try:
        pass
    except KeyError:
        raise
    raise ValueError("a")
    raise ValueError("b")
    raise mod.AError(1) from None
"#;
        let findings = check(source);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].message(),
            "Function 'f' raises (re-raise), AError, TypeError, ValueError but has no Raises: section"
        );
    }

    #[test]
    fn test_unrecognized_raise_shape_is_ignored() {
        let source = "def f(errs):\n    \"\"\"Doc.\"\"\"\n    raise errs[0]\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_nested_scopes_do_not_leak() {
        let source = r#"def outer():
    """Doc."""
    def inner():
        raise ValueError()
    class Local:
        def method(self):
            raise KeyError()
    return inner
"#;
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_method_label_and_class_ignored() {
        let source = r#"class A:
    """Doc."""

    def m(self):
        """Doc."""
        raise RuntimeError()
"#;
        let findings: Vec<_> = check(source).into_iter().filter(|f| f.symbol() == "m").collect();
        assert_eq!(rules(&findings), vec!["missing-raises"]);
        assert_eq!(findings[0].line(), 4);
        assert!(findings[0].message().starts_with("Method 'm'"));
    }

    #[test]
    fn test_parenthesized_exception() {
        for source in [
            "def f():\n    \"\"\"Doc.\"\"\"\n    raise (ValueError)\n",
            "def f():\n    \"\"\"Doc.\"\"\"\n    raise (ValueError(\"x\"))\n",
            "def f():\n    \"\"\"Doc.\"\"\"\n    raise (errors.ValueError)(\"x\")\n",
        ] {
            let findings = check(source);
            assert_eq!(rules(&findings), vec!["missing-raises"], "{}", source);
            assert!(findings[0].message().contains("raises ValueError but"));
        }
    }

    #[test]
    fn test_escaped_newlines_in_docstring() {
        let source = "def f():\n    \"\"\"Doc.\\n\\n    Raises:\\n        ValueError: x\\n    \"\"\"\n    raise ValueError(\"x\")\n";
        assert!(check(source).is_empty());
    }
}
