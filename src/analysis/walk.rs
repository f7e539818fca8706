//! Tree traversal helpers shared by symbol extraction and the rules.

use tree_sitter::Node;

/// Node kinds that open a nested scope. A scope walk never descends into
/// them: their statements belong to the nested definition.
const OPAQUE_KINDS: &[&str] = &[
    "function_definition",
    "class_definition",
    "decorated_definition",
];

/// Depth-first walk over one scope using an explicit worklist.
///
/// Starts at the direct children of the scope node and skips nested
/// function and class definitions entirely, so a `raise` in an inner
/// function is never attributed to the outer one.
pub struct ScopeWalk<'t> {
    stack: Vec<Node<'t>>,
}

impl<'t> ScopeWalk<'t> {
    pub fn new(scope: Node<'t>) -> Self {
        let mut stack = Vec::new();
        push_children(&mut stack, scope);
        Self { stack }
    }
}

impl<'t> Iterator for ScopeWalk<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        while let Some(node) = self.stack.pop() {
            if OPAQUE_KINDS.contains(&node.kind()) {
                continue;
            }
            push_children(&mut self.stack, node);
            return Some(node);
        }
        None
    }
}

fn push_children<'t>(stack: &mut Vec<Node<'t>>, node: Node<'t>) {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
    // Reversed so the leftmost child is popped first.
    stack.extend(children.into_iter().rev());
}

/// 1-indexed line where a node starts.
pub fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

/// 1-indexed last line a node occupies, ignoring trailing comments and a
/// trailing newline.
pub fn last_line(node: Node) -> usize {
    let mut current = node;
    loop {
        let count = current.child_count();
        let last = (0..count)
            .rev()
            .filter_map(|i| current.child(i))
            .find(|child| child.kind() != "comment" && child.end_byte() > child.start_byte());
        match last {
            Some(child) => current = child,
            None => break,
        }
    }

    let start = current.start_position();
    let end = current.end_position();
    if end.column == 0 && end.row > start.row {
        end.row
    } else {
        end.row + 1
    }
}

/// Named children that are not comments.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// First named child that is not a comment.
pub fn first_named_child<'t>(node: Node<'t>) -> Option<Node<'t>> {
    named_children(node).into_iter().next()
}

/// Statements of a definition body (or of the module itself).
pub fn body_statements<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    if node.kind() == "module" {
        return named_children(node);
    }
    match node.child_by_field_name("body") {
        Some(body) => named_children(body),
        None => Vec::new(),
    }
}

/// Strip any number of enclosing parentheses: `(yield)` -> `yield`.
pub fn unwrap_parens(node: Node) -> Node {
    let mut current = node;
    while current.kind() == "parenthesized_expression" {
        match first_named_child(current) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// Text of a node, empty if it is not valid UTF-8.
pub fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Final identifier of a name reference: `Enum` for both `Enum` and
/// `enum.Enum`. Other expression shapes yield `None`.
pub fn reference_name<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    match node.kind() {
        "identifier" => Some(node_text(node, source)),
        "attribute" => node
            .child_by_field_name("attribute")
            .map(|attr| node_text(attr, source)),
        _ => None,
    }
}

/// The docstring statement of a module, class or function, if its first
/// statement is a bare string literal.
pub fn docstring_statement<'t>(node: Node<'t>, source: &str) -> Option<Node<'t>> {
    let first = body_statements(node).into_iter().next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let children = named_children(first);
    if children.len() != 1 || !is_plain_string(children[0], source) {
        return None;
    }
    Some(first)
}

/// Literal value of a docstring statement without quotes or prefixes.
/// Escapes are decoded unless the literal is raw.
pub fn string_value(statement: Node, source: &str) -> String {
    let Some(literal) = first_named_child(statement) else {
        return String::new();
    };
    match literal.kind() {
        "concatenated_string" => named_children(literal)
            .into_iter()
            .map(|part| string_contents(part, source))
            .collect(),
        _ => string_contents(literal, source),
    }
}

fn string_contents(string: Node, source: &str) -> String {
    let mut cursor = string.walk();
    let children: Vec<Node> = string.children(&mut cursor).collect();
    let open = children.iter().find(|c| c.kind() == "string_start");
    let close = children.iter().rev().find(|c| c.kind() == "string_end");
    match (open, close) {
        (Some(open), Some(close)) if open.end_byte() <= close.start_byte() => {
            let raw = &source[open.end_byte()..close.start_byte()];
            let prefix = node_text(*open, source).to_ascii_lowercase();
            if prefix.contains('r') {
                raw.to_string()
            } else {
                decode_escapes(raw)
            }
        }
        _ => String::new(),
    }
}

/// Decode the escapes that can change docstring structure. Unknown
/// escapes are kept verbatim, as Python does.
fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            // Line continuation.
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// A string literal that evaluates to `str`: not an f-string, not bytes.
fn is_plain_string(node: Node, source: &str) -> bool {
    match node.kind() {
        "string" => {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            if children.iter().any(|c| c.kind() == "interpolation") {
                return false;
            }
            let prefix = children
                .iter()
                .find(|c| c.kind() == "string_start")
                .map(|c| node_text(*c, source).to_ascii_lowercase())
                .unwrap_or_default();
            !prefix.contains('f') && !prefix.contains('b')
        }
        "concatenated_string" => named_children(node)
            .into_iter()
            .all(|part| is_plain_string(part, source)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parse_python;
    use std::path::Path;

    fn parse(source: &str) -> crate::analysis::ParsedFile {
        parse_python(Path::new("t.py"), source).unwrap()
    }

    #[test]
    fn test_scope_walk_skips_nested_definitions() {
        let source = "def outer():\n    x = 1\n    def inner():\n        raise ValueError()\n    class K:\n        raise TypeError()\n";
        let parsed = parse(source);
        let outer = parsed.root().named_child(0).unwrap();
        let kinds: Vec<&str> = ScopeWalk::new(outer).map(|n| n.kind()).collect();
        assert!(kinds.contains(&"assignment"));
        assert!(!kinds.contains(&"raise_statement"));
    }

    #[test]
    fn test_last_line_ignores_trailing_comments() {
        let source = "def f():\n    return 1\n    # trailing\n\nx = 2\n";
        let parsed = parse(source);
        let func = parsed.root().named_child(0).unwrap();
        assert_eq!(last_line(func), 2);
    }

    #[test]
    fn test_docstring_detection() {
        let source = "def f():\n    \"\"\"Doc.\"\"\"\n\ndef g():\n    f\"\"\"Not {doc}.\"\"\"\n\ndef h():\n    x = \"no\"\n";
        let parsed = parse(source);
        let defs = named_children(parsed.root());
        let doc = docstring_statement(defs[0], &parsed.source).unwrap();
        assert_eq!(string_value(doc, &parsed.source), "Doc.");
        assert!(docstring_statement(defs[1], &parsed.source).is_none());
        assert!(docstring_statement(defs[2], &parsed.source).is_none());
    }

    #[test]
    fn test_string_value_decodes_escapes() {
        let source = "def f():\n    \"\"\"Doc.\\n\\n    Raises:\\n\\tx \\d\"\"\"\n\ndef g():\n    r\"\"\"Raw.\\n\"\"\"\n";
        let parsed = parse(source);
        let defs = named_children(parsed.root());
        let doc = docstring_statement(defs[0], &parsed.source).unwrap();
        assert_eq!(string_value(doc, &parsed.source), "Doc.\n\n    Raises:\n\tx \\d");
        let raw = docstring_statement(defs[1], &parsed.source).unwrap();
        assert_eq!(string_value(raw, &parsed.source), "Raw.\\n");
    }

    #[test]
    fn test_unwrap_parens() {
        let source = "def g():\n    x = ((yield))\n";
        let parsed = parse(source);
        let func = parsed.root().named_child(0).unwrap();
        let assignment = ScopeWalk::new(func)
            .find(|n| n.kind() == "assignment")
            .unwrap();
        let right = assignment.child_by_field_name("right").unwrap();
        assert_eq!(unwrap_parens(right).kind(), "yield");
    }
}
