//! Set membership predicates: IN and NOT_IN.
//!
//! Keyword fields get an exact term set. Analyzed text fields get a
//! query-string of quoted, escaped terms joined with OR; NOT_IN negates it
//! inside the query string.

use crate::dsl::{BoolQuery, QueryNode, QueryStringQuery, TermsQuery, TextOperator};
use crate::error::{CriteriaError, CriteriaResult};
use crate::search::escape::{escape, to_term_list};
use crate::search::operators::Operator;
use crate::types::{CriteriaValue, ResolvedField};

/// Builds a membership predicate for `operator` on `field`.
pub fn build_clause(
    field: &ResolvedField,
    operator: Operator,
    value: &CriteriaValue,
) -> CriteriaResult<QueryNode> {
    let Some(values) = value.as_list() else {
        return Err(CriteriaError::invalid_argument(
            &field.name,
            operator,
            format!("expected a sequence, got {}", value.kind()),
        ));
    };
    let terms = to_term_list(&field.name, operator.name(), values)?;

    if field.is_keyword() {
        let terms = QueryNode::Terms(TermsQuery {
            field: field.name.clone(),
            values: terms,
            boost: None,
        });
        return match operator {
            Operator::In => Ok(QueryNode::Bool(BoolQuery::new().must(terms))),
            Operator::NotIn => Ok(QueryNode::Bool(BoolQuery::new().must_not(terms))),
            other => Err(CriteriaError::unsupported_operator(other, "membership predicate")),
        };
    }

    let quoted: Vec<String> = terms
        .iter()
        .flatten()
        .map(|term| format!("\"{}\"", escape(term)))
        .collect();
    if quoted.is_empty() {
        return Err(CriteriaError::invalid_argument(
            &field.name,
            operator,
            "text fields need at least one non-null term",
        ));
    }
    let joined = quoted.join(" ");

    let query = match operator {
        Operator::In => joined,
        Operator::NotIn => format!("NOT({})", joined),
        other => return Err(CriteriaError::unsupported_operator(other, "membership predicate")),
    };

    Ok(QueryStringQuery::new(&field.name, query, TextOperator::Or).into())
}
