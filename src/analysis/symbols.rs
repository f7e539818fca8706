//! Extraction of documentable symbols (module, classes, functions, methods).

use std::collections::HashMap;

use tree_sitter::{Node, Tree};

use super::facts::{LineRange, Symbol, SymbolKind, MODULE_SYMBOL_NAME};
use super::walk::{body_statements, docstring_statement, last_line, node_text, start_line, string_value};

/// Maps a symbol's `line` to its `class_definition` or `function_definition`
/// node. The module symbol has no entry of its own.
pub type NodeIndex<'t> = HashMap<usize, Node<'t>>;

/// Extract every documentable symbol, ordered by line.
///
/// The module symbol always comes first. Every class and function at any
/// nesting depth yields exactly one symbol.
pub fn get_documented_symbols(tree: &Tree, source: &str) -> Vec<Symbol> {
    let root = tree.root_node();
    let mut symbols = vec![module_symbol(root, source)];

    let mut definitions = Vec::new();
    collect_definitions(root, None, &mut definitions, source);
    symbols.extend(
        definitions
            .into_iter()
            .map(|def| definition_symbol(&def, source)),
    );

    // Stable, so the module stays ahead of a definition on line 1.
    symbols.sort_by_key(|s| s.line);
    symbols
}

/// Index every class and function node by its keyword line.
pub fn build_node_index<'t>(tree: &'t Tree, source: &str) -> NodeIndex<'t> {
    let mut definitions = Vec::new();
    collect_definitions(tree.root_node(), None, &mut definitions, source);
    definitions
        .into_iter()
        .map(|def| (start_line(def.node), def.node))
        .collect()
}

/// A class or function node found during the descent.
struct Definition<'t> {
    node: Node<'t>,
    /// The wrapping `decorated_definition`, when decorated.
    decorated: Option<Node<'t>>,
    /// Name of the class whose body directly holds this definition.
    enclosing_class: Option<String>,
}

fn collect_definitions<'t>(
    node: Node<'t>,
    enclosing_class: Option<&str>,
    out: &mut Vec<Definition<'t>>,
    source: &str,
) {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();

    for child in children {
        let (definition, decorated) = match child.kind() {
            "decorated_definition" => match child.child_by_field_name("definition") {
                Some(def) => (def, Some(child)),
                None => continue,
            },
            "class_definition" | "function_definition" => (child, None),
            _ => {
                collect_definitions(child, enclosing_class, out, source);
                continue;
            }
        };

        out.push(Definition {
            node: definition,
            decorated,
            enclosing_class: enclosing_class.map(str::to_string),
        });

        if definition.kind() == "class_definition" {
            let name = definition_name(definition, source);
            collect_definitions(definition, Some(name), out, source);
        } else {
            // Functions nested in a function are never methods.
            collect_definitions(definition, None, out, source);
        }
    }
}

fn definition_name<'s>(node: Node, source: &'s str) -> &'s str {
    node.child_by_field_name("name")
        .map(|n| node_text(n, source))
        .unwrap_or("")
}

fn module_symbol(root: Node, source: &str) -> Symbol {
    let statements = body_statements(root);
    let end_line = statements.last().map(|s| last_line(*s)).unwrap_or(1).max(1);
    let (docstring, docstring_range) = docstring_of(root, source);

    Symbol {
        name: MODULE_SYMBOL_NAME.to_string(),
        kind: SymbolKind::Module,
        line: 1,
        end_line,
        definition_start: 1,
        docstring,
        docstring_range,
        signature_range: None,
        body_range: body_range(&statements, docstring_range, end_line),
        parent: None,
    }
}

fn definition_symbol(def: &Definition, source: &str) -> Symbol {
    let node = def.node;
    let line = start_line(node);
    let end_line = last_line(node).max(line);
    let definition_start = def
        .decorated
        .map(|wrapper| {
            let mut cursor = wrapper.walk();
            let first = wrapper
                .named_children(&mut cursor)
                .find(|c| c.kind() == "decorator")
                .map(start_line);
            first.unwrap_or(line)
        })
        .unwrap_or(line);

    let statements = body_statements(node);
    let (docstring, docstring_range) = docstring_of(node, source);

    let (kind, signature_range) = if node.kind() == "class_definition" {
        (SymbolKind::Class, None)
    } else {
        let kind = if def.enclosing_class.is_some() {
            SymbolKind::Method
        } else {
            SymbolKind::Function
        };
        let first_body_line = statements.first().map(|s| start_line(*s)).unwrap_or(line);
        let signature_end = line.max(first_body_line.saturating_sub(1));
        (kind, Some(LineRange::new(line, signature_end)))
    };

    Symbol {
        name: definition_name(node, source).to_string(),
        kind,
        line,
        end_line,
        definition_start,
        docstring,
        docstring_range,
        signature_range,
        body_range: body_range(&statements, docstring_range, end_line),
        parent: def.enclosing_class.clone(),
    }
}

fn docstring_of(node: Node, source: &str) -> (Option<String>, Option<LineRange>) {
    match docstring_statement(node, source) {
        Some(statement) => (
            Some(string_value(statement, source)),
            Some(LineRange::new(start_line(statement), last_line(statement))),
        ),
        None => (None, None),
    }
}

fn body_range(statements: &[Node], docstring_range: Option<LineRange>, end_line: usize) -> LineRange {
    match docstring_range {
        Some(doc) => {
            let start = doc.end + 1;
            if start > end_line {
                LineRange::single(end_line)
            } else {
                LineRange::new(start, end_line)
            }
        }
        None => match statements.first() {
            Some(first) => LineRange::new(start_line(*first), end_line),
            None => LineRange::single(end_line),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parse_python;
    use std::path::Path;

    fn symbols(source: &str) -> Vec<Symbol> {
        let parsed = parse_python(Path::new("t.py"), source).unwrap();
        get_documented_symbols(&parsed.tree, &parsed.source)
    }

    fn find<'a>(symbols: &'a [Symbol], name: &str) -> &'a Symbol {
        symbols.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn test_empty_module() {
        let syms = symbols("");
        assert_eq!(syms.len(), 1);
        let module = &syms[0];
        assert_eq!(module.kind, SymbolKind::Module);
        assert_eq!(module.name, MODULE_SYMBOL_NAME);
        assert_eq!((module.line, module.end_line), (1, 1));
        assert_eq!(module.body_range, LineRange::single(1));
        assert!(module.docstring.is_none());
    }

    #[test]
    fn test_module_docstring_and_end_line() {
        let source = "\"\"\"Module doc.\n\nMore.\n\"\"\"\n\nimport os\n\nX = 1\n# trailing comment\n";
        let syms = symbols(source);
        let module = &syms[0];
        assert_eq!(module.docstring.as_deref(), Some("Module doc.\n\nMore.\n"));
        assert_eq!(module.docstring_range, Some(LineRange::new(1, 4)));
        assert_eq!(module.end_line, 8);
        assert_eq!(module.body_range, LineRange::new(5, 8));
    }

    #[test]
    fn test_methods_and_nested_functions() {
        let source = r#"class Outer:
    def method(self):
        def helper():
            pass
        class Local:
            def local_method(self):
                pass

def top():
    pass
"#;
        let syms = symbols(source);
        assert_eq!(syms.len(), 7);

        let method = find(&syms, "method");
        assert_eq!(method.kind, SymbolKind::Method);
        assert_eq!(method.parent.as_deref(), Some("Outer"));

        let helper = find(&syms, "helper");
        assert_eq!(helper.kind, SymbolKind::Function);
        assert!(helper.parent.is_none());

        let local = find(&syms, "Local");
        assert_eq!(local.kind, SymbolKind::Class);
        assert!(local.parent.is_none());

        let local_method = find(&syms, "local_method");
        assert_eq!(local_method.kind, SymbolKind::Method);
        assert_eq!(local_method.parent.as_deref(), Some("Local"));

        let top = find(&syms, "top");
        assert_eq!(top.kind, SymbolKind::Function);
    }

    #[test]
    fn test_decorated_definition_ranges() {
        let source = r#"@first
@second(arg=1)
def decorated(
    a,
    b,
):
    """Doc."""
    return a + b
"#;
        let syms = symbols(source);
        let func = find(&syms, "decorated");
        assert_eq!(func.definition_start, 1);
        assert_eq!(func.line, 3);
        assert_eq!(func.end_line, 8);
        assert_eq!(func.signature_range, Some(LineRange::new(3, 6)));
        assert_eq!(func.docstring_range, Some(LineRange::single(7)));
        assert_eq!(func.body_range, LineRange::single(8));
    }

    #[test]
    fn test_single_line_definition() {
        let syms = symbols("def f(): pass\n");
        let func = find(&syms, "f");
        assert_eq!(func.signature_range, Some(LineRange::single(1)));
        assert_eq!(func.body_range, LineRange::single(1));
        assert_eq!(func.end_line, 1);
    }

    #[test]
    fn test_docstring_only_body_collapses() {
        let syms = symbols("def f():\n    \"\"\"Only docs.\n    \"\"\"\n");
        let func = find(&syms, "f");
        assert_eq!(func.docstring_range, Some(LineRange::new(2, 3)));
        assert_eq!(func.body_range, LineRange::single(3));
    }

    #[test]
    fn test_async_function_and_ordering() {
        let source = "async def later():\n    yield 1\n\nclass A:\n    async def m(self):\n        pass\n";
        let syms = symbols(source);
        let lines: Vec<usize> = syms.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![1, 1, 4, 5]);
        assert_eq!(syms[0].kind, SymbolKind::Module);
        assert_eq!(find(&syms, "m").kind, SymbolKind::Method);
    }

    #[test]
    fn test_definitions_inside_control_flow() {
        let source = "class A:\n    if True:\n        def m(self):\n            pass\ntry:\n    def f():\n        pass\nexcept ImportError:\n    pass\n";
        let syms = symbols(source);
        assert_eq!(find(&syms, "m").kind, SymbolKind::Method);
        assert_eq!(find(&syms, "m").parent.as_deref(), Some("A"));
        assert_eq!(find(&syms, "f").kind, SymbolKind::Function);
    }

    #[test]
    fn test_node_index_keys_by_keyword_line() {
        let source = "@dec\nclass A:\n    def m(self):\n        pass\n";
        let parsed = parse_python(Path::new("t.py"), source).unwrap();
        let index = build_node_index(&parsed.tree, &parsed.source);
        assert_eq!(index.len(), 2);
        assert_eq!(index[&2].kind(), "class_definition");
        assert_eq!(index[&3].kind(), "function_definition");
        assert!(!index.contains_key(&1));
    }
}
