//! Text predicates: query-string, match, fuzzy and regexp leaves.

use crate::config::CompilerConfig;
use crate::dsl::{FuzzyQuery, MatchQuery, QueryNode, QueryStringQuery, RegexpQuery, TextOperator};
use crate::error::{CriteriaError, CriteriaResult};
use crate::search::escape::escape;
use crate::search::operators::Operator;
use crate::types::CriteriaValue;

/// Builds a text predicate for `operator` on `field`.
pub fn build_clause(
    field: &str,
    operator: Operator,
    value: &CriteriaValue,
    config: &CompilerConfig,
) -> CriteriaResult<QueryNode> {
    let text = value.to_text().ok_or_else(|| {
        CriteriaError::invalid_argument(
            field,
            operator,
            format!("expected a scalar, got {}", value.kind()),
        )
    })?;

    let node = match operator {
        Operator::Equals => {
            QueryStringQuery::new(field, escape(&text), TextOperator::And).into()
        }
        Operator::Contains => wildcard(field, format!("*{}*", escape(&text)), config),
        Operator::StartsWith => wildcard(field, format!("{}*", escape(&text)), config),
        Operator::EndsWith => wildcard(field, format!("*{}", escape(&text)), config),
        // Raw expressions are passed through unescaped
        Operator::Expression => QueryStringQuery::new(field, text, TextOperator::Or).into(),
        Operator::Fuzzy => QueryNode::Fuzzy(FuzzyQuery {
            field: field.to_string(),
            value: escape(&text),
            fuzziness: config.fuzziness.clone(),
            boost: None,
        }),
        Operator::Matches => match_query(field, text, TextOperator::Or),
        Operator::MatchesAll => match_query(field, text, TextOperator::And),
        Operator::Regexp => QueryNode::Regexp(RegexpQuery {
            field: field.to_string(),
            value: text,
            boost: None,
        }),
        other => return Err(CriteriaError::unsupported_operator(other, "text predicate")),
    };

    Ok(node)
}

fn wildcard(field: &str, pattern: String, config: &CompilerConfig) -> QueryNode {
    QueryStringQuery::new(field, pattern, TextOperator::Or)
        .analyze_wildcard(config.analyze_wildcard)
        .into()
}

fn match_query(field: &str, text: String, operator: TextOperator) -> QueryNode {
    QueryNode::Match(MatchQuery {
        field: field.to_string(),
        query: text,
        operator,
        boost: None,
    })
}
