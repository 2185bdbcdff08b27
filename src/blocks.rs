use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tree_sitter::{Node, Parser, Tree};

use crate::io::CxxBlocksError;
use crate::languages::{self, Language};
use crate::timing;
use crate::tree::{AstNode, Location, Lowering, compare_sequences};

/// The body of one function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBlock {
    pub name: String,
    pub location: Location,
    pub statements: Vec<AstNode>,
}

impl FunctionBlock {
    pub fn compare(&self, other: &FunctionBlock) -> f64 {
        compare_sequences(&self.statements, &other.statements)
    }
}

pub fn extract_blocks(path: &Path, source: &str) -> Result<Vec<FunctionBlock>, CxxBlocksError> {
    let language = languages::language_for_path(path).unwrap_or(Language::Cpp);
    let tree = parse_tree(language, source).ok_or_else(|| CxxBlocksError::Parse {
        path: path.to_path_buf(),
    })?;

    let lowering = Lowering::new(path, source);
    let mut blocks = Vec::new();
    walk_tree(&tree, |node| {
        if node.kind() != "function_definition" {
            return;
        }
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let Some(name) = languages::cpp::function_name(node, source) else {
            return;
        };
        let statements = lowering.lower_block(body);
        if statements.is_empty() {
            return;
        }
        blocks.push(FunctionBlock {
            name,
            location: Location::from_node(path, node),
            statements,
        });
    });
    Ok(blocks)
}

/// Extracts blocks from every input in parallel, keeping input order.
pub fn extract_all<I>(inputs: I) -> Result<Vec<FunctionBlock>, CxxBlocksError>
where
    I: IntoIterator<Item = (PathBuf, String)>,
{
    let inputs: Vec<(PathBuf, String)> = inputs.into_iter().collect();
    let start = Instant::now();
    let per_file: Vec<Vec<FunctionBlock>> = inputs
        .par_iter()
        .map(|(path, source)| extract_blocks(path, source))
        .collect::<Result<_, _>>()?;
    let blocks: Vec<FunctionBlock> = per_file.into_iter().flatten().collect();
    timing::log_with_count("extract_all", start.elapsed(), inputs.len());
    Ok(blocks)
}

/// Lookup of blocks by qualified name. The first definition of a name wins.
pub struct BlockIndex<'a> {
    by_name: FxHashMap<&'a str, &'a FunctionBlock>,
}

impl<'a> BlockIndex<'a> {
    pub fn new(blocks: &'a [FunctionBlock]) -> Self {
        let mut by_name = FxHashMap::default();
        for block in blocks {
            by_name.entry(block.name.as_str()).or_insert(block);
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&'a FunctionBlock> {
        self.by_name.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<&'a FunctionBlock, CxxBlocksError> {
        self.get(name).ok_or_else(|| CxxBlocksError::UnknownFunction {
            name: name.to_string(),
        })
    }
}

fn parse_tree(language: Language, source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    let ts_language = languages::tree_sitter_language(language);
    parser.set_language(&ts_language).ok()?;
    parser.parse(source, None)
}

/// Pre-order walk in source order.
pub(crate) fn walk_tree<'t>(tree: &'t Tree, mut visit: impl FnMut(Node<'t>)) {
    let root = tree.root_node();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        visit(node);
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}
