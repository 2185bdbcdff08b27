use tree_sitter::Node;

pub(crate) const EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "hpp", "hh", "hxx"];
const SCOPE_KINDS: &[&str] = &[
    "class_specifier",
    "struct_specifier",
    "union_specifier",
    "namespace_definition",
];

pub(crate) fn language() -> tree_sitter::Language {
    tree_sitter_cpp::LANGUAGE.into()
}

/// Qualified name of a `function_definition` node.
///
/// Inline methods pick up the name of their enclosing class, and every
/// enclosing namespace is prefixed, so `Example::method_one` defined inside
/// `class Example` and `void Example::method_two()` defined out of line both
/// resolve the same way.
pub(crate) fn function_name(definition: Node, source: &str) -> Option<String> {
    let declarator = definition.child_by_field_name("declarator")?;
    let name = find_name_in_declarator(declarator)?;
    let text = name.utf8_text(source.as_bytes()).ok()?;
    let text: String = text.split_whitespace().collect();
    if text.is_empty() {
        return None;
    }

    let mut parts = enclosing_scopes(definition, source);
    parts.push(text);
    Some(parts.join("::"))
}

fn enclosing_scopes(node: Node, source: &str) -> Vec<String> {
    let mut scopes = Vec::new();
    let mut current = node.parent();
    while let Some(scope) = current {
        if SCOPE_KINDS.contains(&scope.kind()) {
            if let Some(name) = scope
                .child_by_field_name("name")
                .and_then(|name| name.utf8_text(source.as_bytes()).ok())
            {
                scopes.push(name.to_string());
            }
        }
        current = scope.parent();
    }
    scopes.reverse();
    scopes
}

fn find_name_in_declarator(node: Node) -> Option<Node> {
    match node.kind() {
        "identifier"
        | "field_identifier"
        | "destructor_name"
        | "operator_name"
        | "qualified_identifier"
        | "template_function" => Some(node),
        "pointer_declarator"
        | "reference_declarator"
        | "array_declarator"
        | "function_declarator"
        | "parenthesized_declarator" => {
            // reference_declarator carries its inner declarator without a field name
            let inner = node.child_by_field_name("declarator").or_else(|| {
                let mut cursor = node.walk();
                node.named_children(&mut cursor).last()
            })?;
            find_name_in_declarator(inner)
        }
        _ => None,
    }
}
