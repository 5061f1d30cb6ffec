//! Assertion helpers for compiled query trees.

use helios_criteria::QueryNode;
use helios_criteria::dsl::BoolQuery;

/// Asserts that `node` is a bool query and returns it.
///
/// # Panics
///
/// Panics if `node` is any other query type.
pub fn assert_bool(node: &QueryNode) -> &BoolQuery {
    match node.as_bool() {
        Some(b) => b,
        None => panic!("expected a bool query, got {}", node.query_type()),
    }
}

/// Asserts the clause counts of a bool query as (must, should, must_not, filter).
pub fn assert_bucket_sizes(node: &QueryNode, expected: (usize, usize, usize, usize)) {
    let b = assert_bool(node);
    assert_eq!(
        (b.must.len(), b.should.len(), b.must_not.len(), b.filter.len()),
        expected,
        "bucket sizes mismatch (must, should, must_not, filter) for {}",
        node.to_json()
    );
}
