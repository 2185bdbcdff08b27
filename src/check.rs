use std::fmt;

use crate::blocks::FunctionBlock;
use crate::tree::{AstNode, Location, NodeKind};

/// Statements that swallow a `break` in their body.
const BREAK_TARGETS: &[&str] = &["do_statement", "for_range_loop", "switch_statement"];

/// A loop that can never exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub function: String,
    pub location: Location,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\tunbounded loop", self.location, self.function)
    }
}

/// Loops in `block` with no exit condition and no `break` or `return` in their body.
pub fn unbounded_loops(block: &FunctionBlock) -> Vec<Finding> {
    let mut findings = Vec::new();
    for statement in &block.statements {
        visit(statement, &mut |node| {
            if is_unbounded(node) {
                findings.push(Finding {
                    function: block.name.clone(),
                    location: node.location.clone(),
                });
            }
        });
    }
    findings
}

fn visit<'a>(node: &'a AstNode, on_node: &mut impl FnMut(&'a AstNode)) {
    on_node(node);
    for child in node.children() {
        visit(child, on_node);
    }
}

fn is_unbounded(node: &AstNode) -> bool {
    let (condition, body) = match &node.kind {
        NodeKind::CStyleLoop {
            condition, body, ..
        } => (condition, body),
        NodeKind::While { condition, body } => (condition, body),
        _ => return false,
    };
    let never_false = match &condition.kind {
        NodeKind::Null => matches!(node.kind, NodeKind::CStyleLoop { .. }),
        NodeKind::Literal { value } => value.is_truthy(),
        _ => false,
    };
    never_false && !escapes(body, true)
}

/// Whether `node` contains a jump out of the loop being checked.
///
/// `break` only counts outside nested loops; `return` counts anywhere.
fn escapes(node: &AstNode, breaks_count: bool) -> bool {
    match &node.kind {
        NodeKind::Break => breaks_count,
        NodeKind::Return { .. } => true,
        NodeKind::CStyleLoop { .. } | NodeKind::While { .. } => {
            node.children().into_iter().any(|child| escapes(child, false))
        }
        NodeKind::Unknown { kind, children } if BREAK_TARGETS.contains(&kind.as_str()) => {
            children.iter().any(|child| escapes(child, false))
        }
        _ => node
            .children()
            .into_iter()
            .any(|child| escapes(child, breaks_count)),
    }
}

#[cfg(test)]
mod tests {
    use super::unbounded_loops;
    use crate::blocks::extract_blocks;
    use std::path::Path;

    fn findings(source: &str) -> usize {
        extract_blocks(Path::new("check.cc"), source)
            .expect("extract")
            .iter()
            .map(|block| unbounded_loops(block).len())
            .sum()
    }

    #[test]
    fn bounded_loop_is_fine() {
        let source = "int count(int bound) {\n    int result = 0;\n    for (int i = 0; i < bound; i++) {\n        result += i * 2;\n    }\n    return result;\n}\n";
        assert_eq!(findings(source), 0);
    }

    #[test]
    fn loop_without_condition_is_flagged() {
        let source = "int count(int bound) {\n    int result = 0;\n    for (int i = 0; ; i++) {\n        result += i * 2;\n    }\n    return result;\n}\n";
        let blocks = extract_blocks(Path::new("check.cc"), source).expect("extract");
        let found = unbounded_loops(&blocks[0]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].function, "count");
        assert_eq!(found[0].location.start.line, 3);
        assert_eq!(found[0].to_string(), "check.cc:3:5\tcount\tunbounded loop");
    }

    #[test]
    fn break_inside_body_escapes() {
        let source = "void f() { for (;;) { if (done()) { break; } } }\n";
        assert_eq!(findings(source), 0);
    }

    #[test]
    fn break_in_nested_loop_does_not_escape_outer() {
        let source = "void f() { while (true) { for (int i = 0; i < 3; i++) { break; } } }\n";
        assert_eq!(findings(source), 1);
    }

    #[test]
    fn return_escapes_from_any_depth() {
        let source = "int f() { while (1) { for (int i = 0; i < 3; i++) { return i; } } }\n";
        assert_eq!(findings(source), 0);
    }

    #[test]
    fn return_inside_try_escapes() {
        let source = "int f() { for (;;) { try { return 1; } catch (...) {} } }\n";
        assert_eq!(findings(source), 0);
    }

    #[test]
    fn return_inside_do_while_escapes() {
        let source = "int f() { while (true) { do { return 1; } while (0); } }\n";
        assert_eq!(findings(source), 0);
    }

    #[test]
    fn return_inside_range_for_escapes() {
        let source = "int f() { for (;;) { for (int x : {1, 2}) { return x; } } }\n";
        assert_eq!(findings(source), 0);
    }

    #[test]
    fn return_inside_switch_escapes() {
        let source = "int f(int n) { for (;;) { switch (n) { case 1: return 1; default: n++; } } }\n";
        assert_eq!(findings(source), 0);
    }

    #[test]
    fn break_inside_switch_does_not_escape() {
        let source = "void f(int n) { for (;;) { switch (n) { case 1: break; default: n++; } } }\n";
        assert_eq!(findings(source), 1);
    }

    #[test]
    fn break_inside_do_while_does_not_escape() {
        let source = "void f() { while (1) { do { break; } while (0); } }\n";
        assert_eq!(findings(source), 1);
    }

    #[test]
    fn break_inside_try_escapes() {
        let source = "void f() { for (;;) { try { break; } catch (...) {} } }\n";
        assert_eq!(findings(source), 0);
    }

    #[test]
    fn non_nul_char_condition_is_flagged() {
        assert_eq!(findings("void f() { while ('a') { g(); } }\n"), 1);
        assert_eq!(findings("void f() { while ('\\0') { g(); } }\n"), 0);
    }

    #[test]
    fn while_with_runtime_condition_is_fine() {
        let source = "void f(int n) { while (n > 0) { n--; } }\n";
        assert_eq!(findings(source), 0);
    }
}
