//! Structural predicates over class definitions.
//!
//! Decorators and base classes are matched by their final name only, so
//! `dataclass`, `dataclasses.dataclass` and `dataclass(frozen=True)` are all
//! recognized. The qualifying module is never checked.

use tree_sitter::Node;

use super::walk::{first_named_child, named_children, node_text, reference_name, ScopeWalk};

const ENUM_BASES: &[&str] = &["Enum", "IntEnum", "StrEnum", "Flag", "IntFlag"];

/// Check whether a reference names one of `names`, looking through any
/// call application (`name(...)`).
pub fn matches_name(node: Node, names: &[&str], source: &str) -> bool {
    let mut current = node;
    while current.kind() == "call" {
        match current.child_by_field_name("function") {
            Some(function) => current = function,
            None => return false,
        }
    }
    reference_name(current, source).is_some_and(|name| names.contains(&name))
}

/// Decorator expressions of a class or function definition.
pub fn decorators(definition: Node) -> Vec<Node> {
    let Some(wrapper) = definition.parent().filter(|p| p.kind() == "decorated_definition") else {
        return Vec::new();
    };
    named_children(wrapper)
        .into_iter()
        .filter(|child| child.kind() == "decorator")
        .filter_map(first_named_child)
        .collect()
}

/// Positional base-class references of a class definition.
pub fn base_classes(class: Node) -> Vec<Node> {
    let Some(superclasses) = class.child_by_field_name("superclasses") else {
        return Vec::new();
    };
    named_children(superclasses)
        .into_iter()
        .filter(|base| base.kind() != "keyword_argument")
        .collect()
}

fn has_base(class: Node, names: &[&str], source: &str) -> bool {
    base_classes(class)
        .into_iter()
        .any(|base| matches_name(base, names, source))
}

pub fn is_dataclass(class: Node, source: &str) -> bool {
    decorators(class)
        .into_iter()
        .any(|decorator| matches_name(decorator, &["dataclass"], source))
}

pub fn is_named_tuple(class: Node, source: &str) -> bool {
    has_base(class, &["NamedTuple"], source)
}

pub fn is_typed_dict(class: Node, source: &str) -> bool {
    has_base(class, &["TypedDict"], source)
}

pub fn is_protocol(class: Node, source: &str) -> bool {
    has_base(class, &["Protocol"], source)
}

/// Covers mixins such as `class Color(str, Enum)`.
pub fn is_enum(class: Node, source: &str) -> bool {
    has_base(class, ENUM_BASES, source)
}

/// Whether the class constructor assigns attributes on its first parameter
/// (`self.x = ...` or `self.x: int = ...`).
pub fn has_self_assignments(class: Node, source: &str) -> bool {
    let Some(init) = find_constructor(class, source) else {
        return false;
    };
    let Some(receiver) = first_parameter_name(init, source) else {
        return false;
    };

    ScopeWalk::new(init)
        .filter(|node| node.kind() == "assignment")
        .filter_map(|assignment| assignment.child_by_field_name("left"))
        .any(|target| is_attribute_of(target, receiver, source))
}

/// `__init__` among the direct statements of the class body.
fn find_constructor<'t>(class: Node<'t>, source: &str) -> Option<Node<'t>> {
    let body = class.child_by_field_name("body")?;
    named_children(body).into_iter().find_map(|statement| {
        let function = match statement.kind() {
            "function_definition" => statement,
            "decorated_definition" => statement.child_by_field_name("definition")?,
            _ => return None,
        };
        let name = function.child_by_field_name("name")?;
        (function.kind() == "function_definition" && node_text(name, source) == "__init__")
            .then_some(function)
    })
}

fn first_parameter_name<'s>(function: Node, source: &'s str) -> Option<&'s str> {
    let parameters = function.child_by_field_name("parameters")?;
    let first = first_named_child(parameters)?;
    let name = match first.kind() {
        "identifier" => first,
        "typed_parameter" => first_named_child(first).filter(|n| n.kind() == "identifier")?,
        "default_parameter" | "typed_default_parameter" => first.child_by_field_name("name")?,
        _ => return None,
    };
    Some(node_text(name, source))
}

fn is_attribute_of(target: Node, receiver: &str, source: &str) -> bool {
    target.kind() == "attribute"
        && target
            .child_by_field_name("object")
            .is_some_and(|object| object.kind() == "identifier" && node_text(object, source) == receiver)
}
