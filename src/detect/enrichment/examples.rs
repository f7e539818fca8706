use tree_sitter::Node;

use crate::analysis::{
    extract_section_content, is_dataclass, is_enum, is_named_tuple, is_protocol, is_typed_dict, Section,
    SymbolKind,
};
use crate::detect::{Category, Finding};

use super::RuleContext;

/// Configured symbol kinds without an `Examples:` section.
///
/// Package initializers are checked whenever any kind is configured.
/// Named tuples and typed dicts are never checked.
pub fn require_examples(ctx: &RuleContext) -> Option<Finding> {
    if ctx.has(Section::Examples) {
        return None;
    }
    let message = match ctx.symbol.kind {
        SymbolKind::Module if ctx.is_package_init() && !ctx.config.require_examples.is_empty() => {
            format!("Package '{}' has no Examples: section", ctx.file_path)
        }
        SymbolKind::Class => {
            let (tag, label) = example_kind(ctx.node()?, ctx.source)?;
            if !ctx.config.wants_examples_for(tag) {
                return None;
            }
            format!("{} '{}' has no Examples: section", label, ctx.symbol.name)
        }
        _ => return None,
    };
    Some(ctx.finding("missing-examples", message, Category::Recommended))
}

/// Config tag and message label of a class, by first match.
fn example_kind(class: Node, source: &str) -> Option<(&'static str, &'static str)> {
    if is_dataclass(class, source) {
        Some(("dataclass", "Dataclass"))
    } else if is_named_tuple(class, source) || is_typed_dict(class, source) {
        None
    } else if is_protocol(class, source) {
        Some(("protocol", "Protocol"))
    } else if is_enum(class, source) {
        Some(("enum", "Enum"))
    } else {
        Some(("class", "Class"))
    }
}

/// `Examples:` sections written as `>>>` doctest sessions.
pub fn prefer_fenced_code_blocks(ctx: &RuleContext) -> Option<Finding> {
    if !ctx.has(Section::Examples) {
        return None;
    }
    let content = extract_section_content(ctx.symbol.docstring.as_deref()?, Section::Examples)?;
    let doctest = content.lines().any(|line| line.trim_start().starts_with(">>>"));

    doctest.then(|| {
        ctx.finding(
            "prefer-fenced-code-blocks",
            format!(
                "{} uses '>>>' prompts in Examples:; prefer fenced code blocks",
                ctx.subject()
            ),
            Category::Recommended,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::config::EnrichmentConfig;

    #[test]
    fn test_class_kinds() {
        let cases = [
            ("class C:\n    \"\"\"Doc.\"\"\"\n", "Class 'C'"),
            ("@dataclass\nclass C:\n    \"\"\"Doc.\n\n    Attributes:\n        x (int): X.\n    \"\"\"\n    x: int\n", "Dataclass 'C'"),
            ("class C(Protocol):\n    \"\"\"Doc.\"\"\"\n", "Protocol 'C'"),
            ("class C(str, enum.Enum):\n    \"\"\"Doc.\"\"\"\n    A = 'a'\n", "Enum 'C'"),
        ];
        for (source, label) in cases {
            let findings = check(source);
            assert_eq!(rules(&findings), vec!["missing-examples"], "{}", source);
            assert!(findings[0].message().starts_with(label));
        }
    }

    #[test]
    fn test_named_tuple_and_typed_dict_excluded() {
        let config = EnrichmentConfig {
            require_attributes: false,
            ..Default::default()
        };
        let named = "class P(NamedTuple):\n    \"\"\"Doc.\"\"\"\n    x: int\n";
        assert!(check_with("m.py", named, &config).is_empty());
        let typed = "class D(TypedDict):\n    \"\"\"Doc.\"\"\"\n    x: int\n";
        assert!(check_with("m.py", typed, &config).is_empty());
    }

    #[test]
    fn test_kind_list_gates_rule() {
        let config = EnrichmentConfig {
            require_examples: vec!["enum".to_string()],
            ..Default::default()
        };
        assert!(check_with("m.py", "class C:\n    \"\"\"Doc.\"\"\"\n", &config).is_empty());
        let enum_source = "class C(IntEnum):\n    \"\"\"Doc.\"\"\"\n    A = 1\n";
        assert_eq!(rules(&check_with("m.py", enum_source, &config)), vec!["missing-examples"]);
    }

    #[test]
    fn test_functions_never_need_examples() {
        assert!(check("def f():\n    \"\"\"Doc.\"\"\"\n").is_empty());
    }

    #[test]
    fn test_package_init_needs_examples() {
        let config = EnrichmentConfig {
            require_attributes: false,
            require_cross_references: false,
            ..Default::default()
        };
        let findings = check_with("pkg/__init__.py", "\"\"\"Package.\"\"\"\n", &config);
        assert_eq!(rules(&findings), vec!["missing-examples"]);
        assert!(findings[0].message().contains("pkg/__init__.py"));
    }

    #[test]
    fn test_doctest_prompts() {
        let source = r#"def f():
    """Doc.

    Examples:
        >>> f()
        1
    """
    return 1
"#;
        let findings = check(source);
        assert_eq!(rules(&findings), vec!["prefer-fenced-code-blocks"]);
        assert_eq!(findings[0].category().as_str(), "recommended");

        let fenced = source.replace(">>> f()\n        1", "```python\n        f()\n        ```");
        assert!(check(&fenced).is_empty());
    }

    #[test]
    fn test_prompts_outside_examples_ignored() {
        let source = "def f():\n    \"\"\"Doc.\n\n    >>> f()\n\n    Examples:\n        Call it.\n    \"\"\"\n";
        assert!(check(source).is_empty());
    }
}
