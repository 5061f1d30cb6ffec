//! Relationship predicates: HAS_CHILD and HAS_PARENT.

use crate::config::CompilerConfig;
use crate::dsl::{HasChildQuery, HasParentQuery, QueryNode};
use crate::error::{CriteriaError, CriteriaResult};
use crate::search::operators::Operator;
use crate::types::{CriteriaValue, Query};

/// Builds a relationship predicate.
///
/// The embedded query is compiled through `sub_query`; when it contributes
/// nothing the relationship matches any related document.
pub fn build_clause(
    field: &str,
    operator: Operator,
    value: &CriteriaValue,
    config: &CompilerConfig,
    sub_query: &dyn Fn(&Query) -> CriteriaResult<Option<QueryNode>>,
) -> CriteriaResult<QueryNode> {
    match value {
        CriteriaValue::HasChild(spec) => {
            let query = sub_query(&spec.query)?.unwrap_or_else(QueryNode::match_all);
            Ok(QueryNode::HasChild(HasChildQuery {
                child_type: spec.child_type.clone(),
                query: Box::new(query),
                score_mode: spec.score_mode.unwrap_or(config.child_score_mode),
                inner_hits: spec.inner_hits.clone(),
                boost: None,
            }))
        }
        CriteriaValue::HasParent(spec) => {
            let query = sub_query(&spec.query)?.unwrap_or_else(QueryNode::match_all);
            Ok(QueryNode::HasParent(HasParentQuery {
                parent_type: spec.parent_type.clone(),
                query: Box::new(query),
                score: spec.score,
                inner_hits: spec.inner_hits.clone(),
                boost: None,
            }))
        }
        other => Err(CriteriaError::invalid_argument(
            field,
            operator,
            format!("expected a relationship specification, got {}", other.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::WrapperQuery;
    use crate::types::{HasChild, HasParent, InnerHits, ScoreMode};
    use serde_json::json;

    fn text_only(query: &Query) -> CriteriaResult<Option<QueryNode>> {
        match query {
            Query::Text(source) => Ok(Some(QueryNode::Wrapper(WrapperQuery {
                query: source.clone(),
            }))),
            _ => Ok(None),
        }
    }

    fn build(operator: Operator, value: CriteriaValue) -> CriteriaResult<QueryNode> {
        build_clause("_", operator, &value, &CompilerConfig::default(), &text_only)
    }

    #[test]
    fn test_has_child_defaults_score_mode() {
        let spec = HasChild::new("answer", Query::text("{}"))
            .with_inner_hits(InnerHits::named("answers").with_window(0, 3));
        let node = build(Operator::HasChild, spec.into()).unwrap();
        let QueryNode::HasChild(q) = node else {
            panic!("expected has_child");
        };
        assert_eq!(q.child_type, "answer");
        assert_eq!(q.score_mode, ScoreMode::None);
        assert!(matches!(*q.query, QueryNode::Wrapper(_)));
        assert_eq!(
            q.inner_hits,
            Some(InnerHits {
                name: Some("answers".to_string()),
                from: Some(0),
                size: Some(3),
            })
        );
    }

    #[test]
    fn test_has_child_explicit_score_mode() {
        let spec = HasChild::new("answer", Query::text("{}")).with_score_mode(ScoreMode::Max);
        let node = build(Operator::HasChild, spec.into()).unwrap();
        assert_eq!(node.to_json()["has_child"]["score_mode"], json!("max"));
    }

    #[test]
    fn test_has_parent_empty_query_matches_all() {
        let spec = HasParent::new("question", Query::Criteria(Default::default())).with_score(true);
        let node = build(Operator::HasParent, spec.into()).unwrap();
        assert_eq!(
            node.to_json(),
            json!({
                "has_parent": {
                    "parent_type": "question",
                    "query": { "match_all": {} },
                    "score": true
                }
            })
        );
    }

    #[test]
    fn test_mismatched_value_names_the_operator() {
        let err = build(Operator::HasParent, CriteriaValue::from("question")).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidArgument { .. }));
        assert!(err.to_string().contains("HAS_PARENT"));
    }
}
