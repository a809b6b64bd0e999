//! End-to-end build -> merge -> query pipeline, checking the invariants
//! and concrete scenarios this engine is expected to satisfy.

use spindex::index::lookup::enumerate_final_blocks;
use spindex::index::{Block, BlockReader};
use spindex::storage::ChecksumType;
use spindex::{IndexConfig, SearchIndex};

fn doc(id: u64, text: &str) -> spindex::Result<(u64, String)> {
    Ok((id, text.to_string()))
}

fn read_all_blocks(index_dir: &std::path::Path) -> Vec<Block> {
    let reader = BlockReader::new(ChecksumType::Crc32);
    enumerate_final_blocks(index_dir)
        .unwrap()
        .into_iter()
        .map(|path| reader.read(path).unwrap())
        .collect()
}

#[test]
fn block_family_satisfies_ordering_invariants() {
    let dir = tempfile::tempdir().unwrap();
    let docs: Vec<_> = (0..12)
        .map(|i| doc(i, &format!("term{} common shared word{}", i, i % 3)))
        .collect();

    SearchIndex::build(dir.path(), IndexConfig::with_block_limit(3), docs).unwrap();

    let blocks = read_all_blocks(dir.path());
    assert!(blocks.len() > 1, "expect multiple final blocks from block_limit=3 over 12 docs");

    for window in blocks.windows(2) {
        assert!(window[0].last_term().unwrap() < window[1].first_term().unwrap());
    }
    for block in &blocks {
        let terms: Vec<&str> = block.entries().iter().map(|(t, _)| t.as_str()).collect();
        assert!(terms.windows(2).all(|w| w[0] < w[1]));
    }

    let sizes: Vec<usize> = blocks.iter().map(|b| b.len()).collect();
    let max = *sizes.iter().max().unwrap();
    let min = *sizes.iter().min().unwrap();
    assert!(max - min <= 1, "balanced partition invariant I4 violated: {sizes:?}");
}

#[test]
fn block_limit_one_runs_two_levels_for_three_documents() {
    let dir = tempfile::tempdir().unwrap();
    let docs = vec![doc(1, "alpha"), doc(2, "beta"), doc(3, "gamma")];
    SearchIndex::build(dir.path(), IndexConfig::with_block_limit(1), docs).unwrap();

    let blocks = read_all_blocks(dir.path());
    assert_eq!(blocks.len(), 3);
    for window in blocks.windows(2) {
        assert!(window[0].last_term().unwrap() < window[1].first_term().unwrap());
    }
}

#[test]
fn query_term_absent_from_corpus_is_empty_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let index = SearchIndex::build(
        dir.path(),
        IndexConfig::default(),
        vec![doc(1, "hello world")],
    )
    .unwrap();
    let results = index.query("nonexistent", 10).unwrap();
    assert!(results.is_empty());
}

#[test]
fn document_identical_to_another_does_not_decrease_its_score() {
    let dir = tempfile::tempdir().unwrap();
    let index = SearchIndex::build(
        dir.path(),
        IndexConfig::default(),
        vec![doc(1, "alpha beta gamma"), doc(2, "alpha beta gamma")],
    )
    .unwrap();

    let results = index.query("alpha beta gamma", 10).unwrap();
    assert_eq!(results.len(), 2);
    assert!((results[0].score - results[1].score).abs() < 1e-9);
}

#[test]
fn full_document_query_ranks_that_document_first() {
    let dir = tempfile::tempdir().unwrap();
    let index = SearchIndex::build(
        dir.path(),
        IndexConfig::default(),
        vec![
            doc(1, "apple banana cherry date"),
            doc(2, "apple banana"),
            doc(3, "cherry date fig"),
        ],
    )
    .unwrap();

    let results = index.query("apple banana cherry date", 10).unwrap();
    assert_eq!(results[0].doc_id, 1);
}

#[test]
fn rebuilding_from_same_corpus_yields_logically_identical_mapping() {
    let docs = || {
        vec![
            doc(1, "hello world hello"),
            doc(2, "world peace"),
            doc(3, "hello peace"),
        ]
    };

    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    SearchIndex::build(dir_a.path(), IndexConfig::with_block_limit(1), docs()).unwrap();
    SearchIndex::build(dir_b.path(), IndexConfig::with_block_limit(1), docs()).unwrap();

    let mut a: Vec<_> = read_all_blocks(dir_a.path())
        .into_iter()
        .flat_map(|b| b.into_entries())
        .collect();
    let mut b: Vec<_> = read_all_blocks(dir_b.path())
        .into_iter()
        .flat_map(|b| b.into_entries())
        .collect();
    a.sort_by(|x, y| x.0.cmp(&y.0));
    b.sort_by(|x, y| x.0.cmp(&y.0));
    assert_eq!(a, b);
}

#[test]
fn empty_corpus_produces_no_blocks_and_empty_queries() {
    let dir = tempfile::tempdir().unwrap();
    let index = SearchIndex::build(dir.path(), IndexConfig::default(), Vec::new()).unwrap();
    assert!(read_all_blocks(dir.path()).is_empty());
    assert!(index.query("anything", 5).unwrap().is_empty());
}
