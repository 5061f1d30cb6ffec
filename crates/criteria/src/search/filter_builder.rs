//! Filter compiler.
//!
//! Walks a criteria chain the same way the scoring compiler does but only
//! looks at filter entries:
//!
//! - an OR-joined node's fragments are grouped into one `bool.should` item
//! - a negating node's fragments are each wrapped in NOT
//! - any other node's fragments are added as they are
//!
//! The filter tree of a node's sub-criteria joins the node's own fragments
//! and follows the same rule.
//!
//! A single resulting item is returned unwrapped, several are ANDed.

use tracing::trace;

use crate::dsl::{BoolQuery, NestedQuery, QueryNode};
use crate::error::{CriteriaError, CriteriaResult};
use crate::types::{Criteria, CriteriaNode, FieldResolver, ScoreMode};

use super::geo;

/// Builds the non-scoring filter tree of a criteria chain.
pub struct FilterBuilder<'a> {
    resolver: &'a dyn FieldResolver,
    max_depth: usize,
}

impl<'a> FilterBuilder<'a> {
    /// Creates a filter builder.
    pub fn new(resolver: &'a dyn FieldResolver, max_depth: usize) -> Self {
        Self {
            resolver,
            max_depth,
        }
    }

    /// Builds the filter tree, or `None` if the chain has no filter entries.
    pub fn build(&self, criteria: &Criteria) -> CriteriaResult<Option<QueryNode>> {
        self.build_at(criteria, 0)
    }

    fn build_at(&self, criteria: &Criteria, depth: usize) -> CriteriaResult<Option<QueryNode>> {
        if depth > self.max_depth {
            return Err(CriteriaError::invalid_argument(
                "",
                "SUB_CRITERIA",
                format!("criteria nested deeper than {} levels", self.max_depth),
            ));
        }

        let mut items: Vec<QueryNode> = Vec::new();

        for node in criteria.nodes() {
            let mut fragments = self.fragments_for(node)?;
            for sub in node.sub_criteria() {
                if let Some(filter) = self.build_at(sub, depth + 1)? {
                    fragments.push(filter);
                }
            }

            if node.is_or() {
                if !fragments.is_empty() {
                    let group = fragments
                        .into_iter()
                        .fold(BoolQuery::new(), |group, fragment| group.should(fragment));
                    items.push(QueryNode::Bool(group));
                }
            } else if node.is_negating() {
                items.extend(fragments.into_iter().map(QueryNode::not));
            } else {
                items.extend(fragments);
            }
        }

        Ok(match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(QueryNode::Bool(BoolQuery {
                must: items,
                ..Default::default()
            })),
        })
    }

    fn fragments_for(&self, node: &CriteriaNode) -> CriteriaResult<Vec<QueryNode>> {
        let entries = node.filter_entries();
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let Some(field) = node.field() else {
            return Err(CriteriaError::MissingField {
                operator: entries[0].operator.to_string(),
            });
        };

        let resolved = self.resolver.resolve(field);
        entries
            .iter()
            .map(|entry| {
                let fragment = geo::build_filter(&resolved.name, entry)?;
                trace!(field = %resolved.name, operator = %entry.operator, "filter fragment");
                Ok(match resolved.nested_path {
                    Some(ref path) => QueryNode::Nested(NestedQuery {
                        path: path.clone(),
                        query: Box::new(fragment),
                        score_mode: ScoreMode::None,
                        boost: None,
                    }),
                    None => fragment,
                })
            })
            .collect()
    }
}
