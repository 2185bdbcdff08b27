use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use tree_sitter::Node;

/// Weight given to a node when it is scored against an absent part.
pub const NULL_COERCION_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub path: PathBuf,
    pub start: Coordinate,
    pub end: Coordinate,
}

impl Location {
    pub(crate) fn from_node(path: &Path, node: Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            path: path.to_path_buf(),
            start: Coordinate {
                line: start.row + 1,
                column: start.column + 1,
            },
            end: Coordinate {
                line: end.row + 1,
                column: end.column + 1,
            },
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.path.display(),
            self.start.line,
            self.start.column
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Integer(i64),
    Float(f64),
    Str(String),
    Char(String),
    Boolean(bool),
    Other(String),
}

impl LiteralValue {
    fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            LiteralValue::Integer(value) => *value != 0,
            LiteralValue::Float(value) => *value != 0.0,
            LiteralValue::Boolean(value) => *value,
            LiteralValue::Str(_) => true,
            LiteralValue::Char(text) => !is_nul_char(text),
            LiteralValue::Other(_) => false,
        }
    }

    fn parse_number(text: &str) -> Self {
        let lower = text.to_ascii_lowercase().replace('\'', "");
        let is_float = !lower.starts_with("0x") && lower.contains(['.', 'e']);
        let trimmed = lower.trim_end_matches(['u', 'l', 'z']);
        let radix = if let Some(digits) = trimmed.strip_prefix("0x") {
            Some((digits, 16))
        } else if let Some(digits) = trimmed.strip_prefix("0b") {
            Some((digits, 2))
        } else if trimmed.len() > 1 && trimmed.starts_with('0') && !is_float {
            Some((&trimmed[1..], 8))
        } else {
            None
        };
        if let Some((digits, radix)) = radix {
            return i64::from_str_radix(digits, radix)
                .map(LiteralValue::Integer)
                .unwrap_or_else(|_| LiteralValue::Other(text.to_string()));
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return LiteralValue::Integer(value);
        }
        trimmed
            .trim_end_matches('f')
            .parse::<f64>()
            .map(LiteralValue::Float)
            .unwrap_or_else(|_| LiteralValue::Other(text.to_string()))
    }
}

/// `'\0'`, `'\000'` and `'\x0'` style character literals, with any encoding prefix.
fn is_nul_char(text: &str) -> bool {
    let Some(start) = text.find('\'') else {
        return false;
    };
    let inner = text[start..].trim_matches('\'');
    let Some(escape) = inner.strip_prefix('\\') else {
        return inner == "\0";
    };
    let digits = escape.strip_prefix('x').unwrap_or(escape);
    !digits.is_empty() && digits.chars().all(|c| c == '0')
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Integer(value) => write!(f, "{value}"),
            LiteralValue::Float(value) => write!(f, "{value}"),
            LiteralValue::Str(value) | LiteralValue::Char(value) | LiteralValue::Other(value) => {
                f.write_str(value)
            }
            LiteralValue::Boolean(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Null,
    Unknown {
        kind: String,
        children: Vec<AstNode>,
    },
    Identifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
    },
    Assignment {
        operator: String,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
    Unary {
        operator: String,
        operand: Box<AstNode>,
    },
    Binary {
        operator: String,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
    Call {
        callee: Box<AstNode>,
        arguments: Vec<AstNode>,
    },
    Return {
        value: Box<AstNode>,
    },
    Break,
    Block {
        statements: Vec<AstNode>,
    },
    If {
        condition: Box<AstNode>,
        then: Box<AstNode>,
        otherwise: Box<AstNode>,
    },
    While {
        condition: Box<AstNode>,
        body: Box<AstNode>,
    },
    CStyleLoop {
        initializer: Box<AstNode>,
        condition: Box<AstNode>,
        update: Box<AstNode>,
        body: Box<AstNode>,
    },
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Null => "Null",
            NodeKind::Unknown { .. } => "Unknown",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::Unary { .. } => "Unary",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Call { .. } => "Call",
            NodeKind::Return { .. } => "Return",
            NodeKind::Break => "Break",
            NodeKind::Block { .. } => "Block",
            NodeKind::If { .. } => "If",
            NodeKind::While { .. } => "While",
            NodeKind::CStyleLoop { .. } => "CStyleLoop",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub location: Location,
}

impl AstNode {
    pub fn new(kind: NodeKind, location: Location) -> Self {
        Self { kind, location }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, NodeKind::Null)
    }

    /// Every node currently carries the same weight.
    pub fn weight(&self) -> f64 {
        1.0
    }

    /// Direct children in source order. Absent parts show up as `Null`.
    pub fn children(&self) -> Vec<&AstNode> {
        match &self.kind {
            NodeKind::Null
            | NodeKind::Identifier { .. }
            | NodeKind::Literal { .. }
            | NodeKind::Break => Vec::new(),
            NodeKind::Assignment { left, right, .. } | NodeKind::Binary { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            NodeKind::Unary { operand, .. } => vec![operand.as_ref()],
            NodeKind::Unknown { children, .. } => children.iter().collect(),
            NodeKind::Call { callee, arguments } => {
                std::iter::once(callee.as_ref()).chain(arguments).collect()
            }
            NodeKind::Return { value } => vec![value.as_ref()],
            NodeKind::Block { statements } => statements.iter().collect(),
            NodeKind::If {
                condition,
                then,
                otherwise,
            } => vec![condition.as_ref(), then.as_ref(), otherwise.as_ref()],
            NodeKind::While { condition, body } => vec![condition.as_ref(), body.as_ref()],
            NodeKind::CStyleLoop {
                initializer,
                condition,
                update,
                body,
            } => vec![
                initializer.as_ref(),
                condition.as_ref(),
                update.as_ref(),
                body.as_ref(),
            ],
        }
    }

    /// Similarity score in `[0, 1]`.
    pub fn compare(&self, other: &AstNode) -> f64 {
        if std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind) {
            return self.compare_same_kind(other) * self.weight() * other.weight();
        }
        if self.is_null() {
            return self.weight() * NULL_COERCION_WEIGHT;
        }
        if other.is_null() {
            return other.weight() * NULL_COERCION_WEIGHT;
        }
        0.0
    }

    fn compare_same_kind(&self, other: &AstNode) -> f64 {
        match (&self.kind, &other.kind) {
            (NodeKind::Null, NodeKind::Null) | (NodeKind::Break, NodeKind::Break) => 1.0,
            (NodeKind::Unknown { .. }, NodeKind::Unknown { .. }) => 0.0,
            (NodeKind::Identifier { name: a }, NodeKind::Identifier { name: b }) => {
                if a == b { 1.0 } else { 0.0 }
            }
            (NodeKind::Literal { value: a }, NodeKind::Literal { value: b }) => {
                if a == b {
                    1.0
                } else if a.same_variant(b) {
                    0.5
                } else {
                    0.2
                }
            }
            (
                NodeKind::Assignment {
                    operator: op_a,
                    left: left_a,
                    right: right_a,
                },
                NodeKind::Assignment {
                    operator: op_b,
                    left: left_b,
                    right: right_b,
                },
            )
            | (
                NodeKind::Binary {
                    operator: op_a,
                    left: left_a,
                    right: right_a,
                },
                NodeKind::Binary {
                    operator: op_b,
                    left: left_b,
                    right: right_b,
                },
            ) => {
                if op_a != op_b {
                    return 0.0;
                }
                all_or_nothing(&[left_a.compare(left_b), right_a.compare(right_b)])
            }
            (
                NodeKind::Unary {
                    operator: op_a,
                    operand: a,
                },
                NodeKind::Unary {
                    operator: op_b,
                    operand: b,
                },
            ) => {
                if op_a != op_b {
                    return 0.0;
                }
                a.compare(b)
            }
            (
                NodeKind::Call {
                    callee: callee_a,
                    arguments: args_a,
                },
                NodeKind::Call {
                    callee: callee_b,
                    arguments: args_b,
                },
            ) => all_or_nothing(&[
                callee_a.compare(callee_b),
                compare_sequences(args_a, args_b),
            ]),
            (NodeKind::Return { value: a }, NodeKind::Return { value: b }) => a.compare(b),
            (NodeKind::Block { statements: a }, NodeKind::Block { statements: b }) => {
                compare_sequences(a, b)
            }
            (
                NodeKind::If {
                    condition: cond_a,
                    then: then_a,
                    otherwise: else_a,
                },
                NodeKind::If {
                    condition: cond_b,
                    then: then_b,
                    otherwise: else_b,
                },
            ) => all_or_nothing(&[
                cond_a.compare(cond_b),
                then_a.compare(then_b),
                else_a.compare(else_b),
            ]),
            (
                NodeKind::While {
                    condition: cond_a,
                    body: body_a,
                },
                NodeKind::While {
                    condition: cond_b,
                    body: body_b,
                },
            ) => all_or_nothing(&[cond_a.compare(cond_b), body_a.compare(body_b)]),
            (
                NodeKind::CStyleLoop {
                    initializer: init_a,
                    condition: cond_a,
                    update: update_a,
                    body: body_a,
                },
                NodeKind::CStyleLoop {
                    initializer: init_b,
                    condition: cond_b,
                    update: update_b,
                    body: body_b,
                },
            ) => all_or_nothing(&[
                init_a.compare(init_b),
                cond_a.compare(cond_b),
                update_a.compare(update_b),
                body_a.compare(body_b),
            ]),
            _ => 0.0,
        }
    }
}

/// Mean of `scores`, or zero as soon as one part does not match at all.
fn all_or_nothing(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 1.0;
    }
    if scores.iter().any(|score| *score == 0.0) {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Position-wise similarity of two statement lists, normalised by the longer one.
pub fn compare_sequences(a: &[AstNode], b: &[AstNode]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    let total: f64 = a.iter().zip(b).map(|(x, y)| x.compare(y)).sum();
    total / longest as f64
}

/// Lowers tree-sitter C++ nodes into [`AstNode`]s.
pub(crate) struct Lowering<'a> {
    path: &'a Path,
    source: &'a str,
}

impl<'a> Lowering<'a> {
    pub(crate) fn new(path: &'a Path, source: &'a str) -> Self {
        Self { path, source }
    }

    fn location(&self, node: Node) -> Location {
        Location::from_node(self.path, node)
    }

    fn text(&self, node: Node) -> String {
        node.utf8_text(self.source.as_bytes())
            .map(|text| text.to_string())
            .unwrap_or_default()
    }

    fn null_at(&self, node: Node) -> AstNode {
        AstNode::new(NodeKind::Null, self.location(node))
    }

    fn field(&self, node: Node, name: &str) -> AstNode {
        match node.child_by_field_name(name) {
            Some(child) => self.lower(child),
            None => self.null_at(node),
        }
    }

    fn boxed_field(&self, node: Node, name: &str) -> Box<AstNode> {
        Box::new(self.field(node, name))
    }

    /// Statements of a compound statement, flattening multi-declarator declarations.
    pub(crate) fn lower_block(&self, block: Node) -> Vec<AstNode> {
        let mut cursor = block.walk();
        block
            .named_children(&mut cursor)
            .flat_map(|child| self.lower_statements(child))
            .collect()
    }

    fn lower_statements(&self, node: Node) -> Vec<AstNode> {
        match node.kind() {
            "comment" => Vec::new(),
            "declaration" => self.lower_declaration(node),
            _ => vec![self.lower(node)],
        }
    }

    fn lower_declaration(&self, node: Node) -> Vec<AstNode> {
        let mut cursor = node.walk();
        node.children_by_field_name("declarator", &mut cursor)
            .map(|declarator| {
                if declarator.kind() == "init_declarator" {
                    AstNode::new(
                        NodeKind::Assignment {
                            operator: "=".to_string(),
                            left: self.boxed_field(declarator, "declarator"),
                            right: self.boxed_field(declarator, "value"),
                        },
                        self.location(declarator),
                    )
                } else {
                    self.lower(declarator)
                }
            })
            .collect()
    }

    pub(crate) fn lower(&self, node: Node) -> AstNode {
        let location = self.location(node);
        let kind = match node.kind() {
            "expression_statement" => {
                let mut cursor = node.walk();
                let inner = node
                    .named_children(&mut cursor)
                    .find(|child| child.kind() != "comment");
                return match inner {
                    Some(inner) => self.lower(inner),
                    None => AstNode::new(NodeKind::Null, location),
                };
            }
            "parenthesized_expression" | "condition_clause" | "else_clause" => {
                return self.lower_wrapped(node);
            }
            "declaration" => {
                let mut statements = self.lower_declaration(node);
                if statements.len() == 1 {
                    return statements.remove(0);
                }
                NodeKind::Block { statements }
            }
            "identifier" | "field_identifier" | "qualified_identifier" | "this" => {
                NodeKind::Identifier {
                    name: self.text(node).split_whitespace().collect(),
                }
            }
            "field_expression" => NodeKind::Identifier {
                name: self.text(node).split_whitespace().collect(),
            },
            "number_literal" => NodeKind::Literal {
                value: LiteralValue::parse_number(&self.text(node)),
            },
            "string_literal" | "raw_string_literal" | "concatenated_string" => NodeKind::Literal {
                value: LiteralValue::Str(self.text(node)),
            },
            "char_literal" => NodeKind::Literal {
                value: LiteralValue::Char(self.text(node)),
            },
            "true" => NodeKind::Literal {
                value: LiteralValue::Boolean(true),
            },
            "false" => NodeKind::Literal {
                value: LiteralValue::Boolean(false),
            },
            "null" | "nullptr" => NodeKind::Literal {
                value: LiteralValue::Other(self.text(node)),
            },
            "assignment_expression" => NodeKind::Assignment {
                operator: self.operator(node),
                left: self.boxed_field(node, "left"),
                right: self.boxed_field(node, "right"),
            },
            "binary_expression" => NodeKind::Binary {
                operator: self.operator(node),
                left: self.boxed_field(node, "left"),
                right: self.boxed_field(node, "right"),
            },
            "unary_expression" | "pointer_expression" => NodeKind::Unary {
                operator: self.operator(node),
                operand: self.boxed_field(node, "argument"),
            },
            "update_expression" => NodeKind::Unary {
                operator: self.update_operator(node),
                operand: self.boxed_field(node, "argument"),
            },
            "call_expression" => NodeKind::Call {
                callee: self.boxed_field(node, "function"),
                arguments: node
                    .child_by_field_name("arguments")
                    .map(|arguments| {
                        let mut cursor = arguments.walk();
                        arguments
                            .named_children(&mut cursor)
                            .filter(|child| child.kind() != "comment")
                            .map(|child| self.lower(child))
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "return_statement" => {
                let mut cursor = node.walk();
                let value = node
                    .named_children(&mut cursor)
                    .find(|child| child.kind() != "comment")
                    .map(|child| self.lower(child))
                    .unwrap_or_else(|| self.null_at(node));
                NodeKind::Return {
                    value: Box::new(value),
                }
            }
            "break_statement" => NodeKind::Break,
            "compound_statement" => NodeKind::Block {
                statements: self.lower_block(node),
            },
            "if_statement" => NodeKind::If {
                condition: self.boxed_field(node, "condition"),
                then: self.boxed_field(node, "consequence"),
                otherwise: self.boxed_field(node, "alternative"),
            },
            "while_statement" => NodeKind::While {
                condition: self.boxed_field(node, "condition"),
                body: self.boxed_field(node, "body"),
            },
            "for_statement" => NodeKind::CStyleLoop {
                initializer: self.boxed_field(node, "initializer"),
                condition: self.boxed_field(node, "condition"),
                update: self.boxed_field(node, "update"),
                body: self.boxed_field(node, "body"),
            },
            other => NodeKind::Unknown {
                kind: other.to_string(),
                children: {
                    let mut cursor = node.walk();
                    node.named_children(&mut cursor)
                        .flat_map(|child| self.lower_statements(child))
                        .collect()
                },
            },
        };
        AstNode::new(kind, location)
    }

    fn lower_wrapped(&self, node: Node) -> AstNode {
        if let Some(value) = node.child_by_field_name("value") {
            return self.lower(value);
        }
        let mut cursor = node.walk();
        let inner = node
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");
        match inner {
            Some(inner) => self.lower(inner),
            None => self.null_at(node),
        }
    }

    fn operator(&self, node: Node) -> String {
        node.child_by_field_name("operator")
            .map(|operator| operator.kind().to_string())
            .unwrap_or_default()
    }

    fn update_operator(&self, node: Node) -> String {
        let operator = self.operator(node);
        let is_prefix = match (
            node.child_by_field_name("operator"),
            node.child_by_field_name("argument"),
        ) {
            (Some(operator), Some(argument)) => operator.start_byte() < argument.start_byte(),
            _ => false,
        };
        if is_prefix {
            format!("{operator}x")
        } else {
            format!("x{operator}")
        }
    }
}

/// Renders a tree as indented text, one node per line.
pub struct AstPrinter<'a> {
    statements: &'a [AstNode],
}

impl<'a> AstPrinter<'a> {
    pub fn new(statements: &'a [AstNode]) -> Self {
        Self { statements }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for statement in self.statements {
            render_node(statement, 1, &mut out);
        }
        out
    }
}

fn render_node(node: &AstNode, depth: usize, out: &mut String) {
    let detail = match &node.kind {
        NodeKind::Unknown { kind, .. } => format!(" {kind}"),
        NodeKind::Identifier { name } => format!(" {name}"),
        NodeKind::Literal { value } => format!(" {value}"),
        NodeKind::Assignment { operator, .. }
        | NodeKind::Unary { operator, .. }
        | NodeKind::Binary { operator, .. } => format!(" {operator}"),
        _ => String::new(),
    };
    let _ = writeln!(
        out,
        "{}{}{} @{}:{}",
        "  ".repeat(depth),
        node.kind.label(),
        detail,
        node.location.start.line,
        node.location.start.column
    );
    for child in node.children() {
        render_node(child, depth + 1, out);
    }
}
