//! Range predicates: LESS, LESS_EQUAL, GREATER, GREATER_EQUAL and BETWEEN.

use serde_json::Value;

use crate::dsl::{QueryNode, RangeQuery};
use crate::error::{CriteriaError, CriteriaResult};
use crate::search::operators::Operator;
use crate::types::CriteriaValue;

/// Builds a range predicate for `operator` on `field`.
///
/// BETWEEN takes a `[lower, upper]` pair; a null side is left open.
pub fn build_clause(
    field: &str,
    operator: Operator,
    value: &CriteriaValue,
) -> CriteriaResult<QueryNode> {
    let mut range = RangeQuery::new(field);

    match operator {
        Operator::Less => range.lt = Some(bound(field, operator, value)?),
        Operator::LessEqual => range.lte = Some(bound(field, operator, value)?),
        Operator::Greater => range.gt = Some(bound(field, operator, value)?),
        Operator::GreaterEqual => range.gte = Some(bound(field, operator, value)?),
        Operator::Between => {
            let Some([lower, upper]) = value.as_list() else {
                return Err(CriteriaError::invalid_argument(
                    field,
                    operator,
                    "expected a [lower, upper] pair",
                ));
            };
            range.gte = optional_bound(field, operator, lower)?;
            range.lte = optional_bound(field, operator, upper)?;
        }
        other => return Err(CriteriaError::unsupported_operator(other, "range predicate")),
    }

    Ok(QueryNode::Range(range))
}

fn optional_bound(
    field: &str,
    operator: Operator,
    value: &CriteriaValue,
) -> CriteriaResult<Option<Value>> {
    if value.is_null() {
        return Ok(None);
    }
    bound(field, operator, value).map(Some)
}

fn bound(field: &str, operator: Operator, value: &CriteriaValue) -> CriteriaResult<Value> {
    value.to_scalar_json().ok_or_else(|| {
        CriteriaError::invalid_argument(
            field,
            operator,
            format!("cannot use a {} as a range bound", value.kind()),
        )
    })
}
