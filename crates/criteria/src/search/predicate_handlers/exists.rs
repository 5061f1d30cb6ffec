//! Presence predicates: EXISTS, EMPTY and NOT_EMPTY.

use crate::dsl::{BoolQuery, ExistsQuery, QueryNode, WildcardQuery};
use crate::error::{CriteriaError, CriteriaResult};
use crate::search::operators::Operator;

/// Builds a presence predicate.
pub fn build_clause(field: &str, operator: Operator) -> CriteriaResult<QueryNode> {
    match operator {
        Operator::Exists => Ok(exists(field)),
        // Present but holding no indexed term
        Operator::Empty => Ok(QueryNode::Bool(
            BoolQuery::new()
                .must(exists(field))
                .must_not(any_value(field)),
        )),
        Operator::NotEmpty => Ok(any_value(field)),
        other => Err(CriteriaError::unsupported_operator(other, "presence predicate")),
    }
}

fn exists(field: &str) -> QueryNode {
    QueryNode::Exists(ExistsQuery {
        field: field.to_string(),
        boost: None,
    })
}

fn any_value(field: &str) -> QueryNode {
    QueryNode::Wildcard(WildcardQuery {
        field: field.to_string(),
        value: "*".to_string(),
        boost: None,
    })
}
