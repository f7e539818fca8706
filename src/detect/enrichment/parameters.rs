use tree_sitter::Node;

use crate::analysis::{first_named_child, named_children, node_text, Section};
use crate::detect::{Category, Finding};

use super::RuleContext;

/// Functions accepting `**kwargs` without an `Other Parameters:` section.
/// Only the signature is inspected.
pub fn require_other_parameters(ctx: &RuleContext) -> Option<Finding> {
    if !ctx.symbol.kind.is_callable() || ctx.has(Section::OtherParameters) {
        return None;
    }
    let node = ctx.node()?;
    let parameters = node.child_by_field_name("parameters")?;
    let kwargs = named_children(parameters)
        .into_iter()
        .find_map(|param| keyword_splat_name(param, ctx.source))?;

    Some(ctx.finding(
        "missing-other-parameters",
        format!(
            "{} accepts **{} but has no Other Parameters: section",
            ctx.subject(),
            kwargs
        ),
        Category::Recommended,
    ))
}

/// Name bound by `**name` or `**name: T`.
fn keyword_splat_name<'s>(param: Node, source: &'s str) -> Option<&'s str> {
    let splat = match param.kind() {
        "dictionary_splat_pattern" => param,
        "typed_parameter" => {
            first_named_child(param).filter(|n| n.kind() == "dictionary_splat_pattern")?
        }
        _ => return None,
    };
    let name = first_named_child(splat)?;
    Some(node_text(name, source))
}
