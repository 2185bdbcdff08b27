use std::fs;
use std::path::{Path, PathBuf};

use cxxblocks::{BlockIndex, NodeKind, extract_all, unbounded_loops};

fn read_fixture(path: impl AsRef<Path>) -> (PathBuf, String) {
    let path = path.as_ref().to_path_buf();
    let contents = fs::read_to_string(&path).expect("read fixture");
    (path, contents)
}

#[test]
fn extracts_every_block_from_example() {
    let blocks = extract_all(vec![read_fixture("fixtures/cpp/example.cc")]).expect("extract");
    let names: Vec<&str> = blocks.iter().map(|block| block.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Example::method_one", "Example::method_two", "count", "main"]
    );
}

#[test]
fn count_body_has_bounded_loop() {
    let blocks = extract_all(vec![read_fixture("fixtures/cpp/example.cc")]).expect("extract");
    let index = BlockIndex::new(&blocks);
    let count = index.require("count").expect("count block");
    let kinds: Vec<&str> = count
        .statements
        .iter()
        .map(|statement| statement.kind.label())
        .collect();
    assert_eq!(kinds, vec!["Assignment", "CStyleLoop", "Return"]);
    match &count.statements[1].kind {
        NodeKind::CStyleLoop { condition, .. } => assert!(!condition.is_null()),
        other => panic!("expected loop, got {other:?}"),
    }
}

#[test]
fn bounded_and_unbounded_variants_are_similar_but_not_equal() {
    let bounded = extract_all(vec![read_fixture("fixtures/cpp/example.cc")]).expect("extract");
    let unbounded = extract_all(vec![read_fixture("fixtures/cpp/unbounded.cc")]).expect("extract");
    let left = BlockIndex::new(&bounded).require("count").expect("count").clone();
    let right = BlockIndex::new(&unbounded).require("count").expect("count").clone();

    let score = left.compare(&right);
    assert!(score > 0.5 && score < 1.0, "unexpected score {score}");
    assert_eq!(score, right.compare(&left));
}

#[test]
fn only_the_unbounded_variant_is_flagged() {
    let blocks = extract_all(vec![
        read_fixture("fixtures/cpp/example.cc"),
        read_fixture("fixtures/cpp/unbounded.cc"),
    ])
    .expect("extract");
    let findings: Vec<_> = blocks.iter().flat_map(unbounded_loops).collect();
    assert_eq!(findings.len(), 1);
    assert!(findings[0].location.path.ends_with("fixtures/cpp/unbounded.cc"));
    assert_eq!(findings[0].function, "count");
}

#[test]
fn accumulator_matches_the_fixture_program() {
    assert_eq!(cxxblocks::count(10), 90);
    assert_eq!(cxxblocks::closed_form(10), 90);
}
