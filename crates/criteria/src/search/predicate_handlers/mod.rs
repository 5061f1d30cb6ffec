//! Leaf predicate builders for query-context operators.
//!
//! Each module builds the predicates for one operator family. Values reaching
//! these builders have already passed the catalog's shape check, so builders
//! only check element-level details.

pub mod exists;
pub mod range;
pub mod relationship;
pub mod terms;
pub mod text;

use crate::config::CompilerConfig;
use crate::dsl::QueryNode;
use crate::error::{CriteriaError, CriteriaResult};
use crate::types::{CriteriaEntry, Query, ResolvedField};

use super::operators::Operator;

/// Builds the leaf predicate for one query-context entry.
///
/// `sub_query` compiles the embedded queries of relationship operators.
pub fn build_clause(
    field: &ResolvedField,
    entry: &CriteriaEntry,
    config: &CompilerConfig,
    sub_query: &dyn Fn(&Query) -> CriteriaResult<Option<QueryNode>>,
) -> CriteriaResult<QueryNode> {
    entry.operator.validate_value(&field.name, &entry.value)?;

    match entry.operator {
        Operator::Exists | Operator::Empty | Operator::NotEmpty => {
            exists::build_clause(&field.name, entry.operator)
        }
        Operator::Equals
        | Operator::Contains
        | Operator::StartsWith
        | Operator::EndsWith
        | Operator::Expression
        | Operator::Fuzzy
        | Operator::Matches
        | Operator::MatchesAll
        | Operator::Regexp => text::build_clause(&field.name, entry.operator, &entry.value, config),
        Operator::Less
        | Operator::LessEqual
        | Operator::Greater
        | Operator::GreaterEqual
        | Operator::Between => range::build_clause(&field.name, entry.operator, &entry.value),
        Operator::In | Operator::NotIn => terms::build_clause(field, entry.operator, &entry.value),
        Operator::HasChild | Operator::HasParent => relationship::build_clause(
            &field.name,
            entry.operator,
            &entry.value,
            config,
            sub_query,
        ),
        Operator::Within
        | Operator::BBox
        | Operator::GeoIntersects
        | Operator::GeoIsDisjoint
        | Operator::GeoWithin
        | Operator::GeoContains => Err(CriteriaError::unsupported_operator(
            entry.operator,
            "query context",
        )),
    }
}
