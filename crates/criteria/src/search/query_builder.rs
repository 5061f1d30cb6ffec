//! Criteria query compiler.
//!
//! Translates a [`Criteria`] chain into a scoring [`QueryNode`] tree and,
//! through [`FilterBuilder`], a non-scoring filter tree.
//!
//! # Combination rules
//!
//! The chain is folded left to right. Each node contributes at most one
//! fragment built from its query entries. The first fragment is held back;
//! every later one goes to `should` if its node is OR-joined, to `must_not`
//! if it is negating and to `must` otherwise. Sub-criteria are compiled on
//! their own and routed by the flags of the node that owns them.
//!
//! The held-back fragment is then re-attached: to `should` if `should` is
//! the only non-empty bucket, otherwise to `must_not` or `must` by its own
//! node's negation. A node that is both OR-joined and negating has its
//! fragment wrapped in NOT before it is bucketed.

use tracing::{debug, trace};

use crate::config::CompilerConfig;
use crate::dsl::{BoolQuery, NestedQuery, QueryNode};
use crate::error::{CriteriaError, CriteriaResult};
use crate::types::{Criteria, CriteriaNode, FieldResolver, Query};

use super::filter_builder::FilterBuilder;
use super::predicate_handlers;

/// Compiles the embedded queries of relationship predicates.
///
/// Implemented by [`QueryFacade`](super::QueryFacade) so that relationship
/// sub-queries go through the same dispatch as top-level queries.
pub trait SubQueryCompiler {
    /// Compiles `query` at nesting `depth`.
    fn compile_sub_query(&self, query: &Query, depth: usize) -> CriteriaResult<Option<QueryNode>>;
}

/// Compiles criteria chains into query trees.
///
/// The compiler holds no state of its own beyond borrowed collaborators, so
/// one instance can compile any number of criteria, concurrently if shared.
pub struct CriteriaQueryCompiler<'a> {
    resolver: &'a dyn FieldResolver,
    config: &'a CompilerConfig,
    sub_queries: Option<&'a dyn SubQueryCompiler>,
}

/// Bucketed fragments of one chain.
#[derive(Default)]
struct Buckets {
    first: Option<(QueryNode, bool)>,
    should: Vec<QueryNode>,
    must_not: Vec<QueryNode>,
    must: Vec<QueryNode>,
}

impl Buckets {
    fn route(&mut self, fragment: QueryNode, is_or: bool, is_negating: bool) {
        if is_or {
            self.should.push(fragment);
        } else if is_negating {
            self.must_not.push(fragment);
        } else {
            self.must.push(fragment);
        }
    }

    fn into_query(mut self) -> Option<QueryNode> {
        if let Some((first, negating)) = self.first.take() {
            if !self.should.is_empty() && self.must.is_empty() && self.must_not.is_empty() {
                self.should.insert(0, first);
            } else if negating {
                self.must_not.insert(0, first);
            } else {
                self.must.insert(0, first);
            }
        }

        if self.should.is_empty() && self.must_not.is_empty() && self.must.is_empty() {
            return None;
        }

        Some(QueryNode::Bool(BoolQuery {
            must: self.must,
            should: self.should,
            must_not: self.must_not,
            ..Default::default()
        }))
    }
}

impl<'a> CriteriaQueryCompiler<'a> {
    /// Creates a compiler.
    ///
    /// Without a sub-query compiler, relationship predicates can only embed
    /// criteria queries.
    pub fn new(resolver: &'a dyn FieldResolver, config: &'a CompilerConfig) -> Self {
        Self {
            resolver,
            config,
            sub_queries: None,
        }
    }

    /// Sets the compiler used for relationship sub-queries.
    pub fn with_sub_queries(mut self, sub_queries: &'a dyn SubQueryCompiler) -> Self {
        self.sub_queries = Some(sub_queries);
        self
    }

    /// Compiles the scoring query tree.
    ///
    /// Returns `None` when no node contributes a query entry. Filter entries
    /// are ignored here; see [`compile_filter`](Self::compile_filter) and
    /// [`build`](Self::build).
    pub fn compile(&self, criteria: &Criteria) -> CriteriaResult<Option<QueryNode>> {
        debug!(nodes = criteria.total_nodes(), "compiling criteria query");
        self.compile_at(criteria, 0)
    }

    /// Compiles the non-scoring filter tree on its own.
    pub fn compile_filter(&self, criteria: &Criteria) -> CriteriaResult<Option<QueryNode>> {
        debug!(nodes = criteria.total_nodes(), "compiling criteria filter");
        FilterBuilder::new(self.resolver, self.config.max_depth).build(criteria)
    }

    /// Compiles the scoring tree and attaches the filter tree as its
    /// non-scoring `filter` clause.
    ///
    /// A criteria with only filter entries gets a match-all `must` clause for
    /// the filter to attach to. When the scoring tree holds only `should`
    /// clauses, at least one of them stays required. Returns `None` when
    /// neither tree exists.
    pub fn build(&self, criteria: &Criteria) -> CriteriaResult<Option<QueryNode>> {
        debug!(nodes = criteria.total_nodes(), "building criteria query");
        self.build_at(criteria, 0)
    }

    pub(crate) fn build_at(
        &self,
        criteria: &Criteria,
        depth: usize,
    ) -> CriteriaResult<Option<QueryNode>> {
        let query = self.compile_at(criteria, depth)?;
        let filter = FilterBuilder::new(self.resolver, self.config.max_depth).build(criteria)?;

        let Some(filter) = filter else {
            return Ok(query);
        };

        let mut bool_query = match query {
            Some(QueryNode::Bool(b)) => b,
            Some(other) => BoolQuery::new().must(other),
            None => BoolQuery::new().must(QueryNode::match_all()),
        };
        // A filter clause makes lone should clauses optional
        if bool_query.must.is_empty()
            && bool_query.must_not.is_empty()
            && !bool_query.should.is_empty()
        {
            bool_query.minimum_should_match = Some(1);
        }
        bool_query.filter.push(filter);

        Ok(Some(QueryNode::Bool(bool_query)))
    }

    fn compile_at(&self, criteria: &Criteria, depth: usize) -> CriteriaResult<Option<QueryNode>> {
        if depth > self.config.max_depth {
            return Err(CriteriaError::invalid_argument(
                "",
                "SUB_CRITERIA",
                format!("criteria nested deeper than {} levels", self.config.max_depth),
            ));
        }

        let mut buckets = Buckets::default();

        for node in criteria.nodes() {
            let Some(fragment) = self.query_for_entries(node, depth)? else {
                continue;
            };
            if buckets.first.is_none() {
                buckets.first = Some((fragment, node.is_negating()));
            } else {
                buckets.route(fragment, node.is_or(), node.is_negating());
            }
        }

        for node in criteria.nodes() {
            for sub in node.sub_criteria() {
                if let Some(sub_query) = self.compile_at(sub, depth + 1)? {
                    buckets.route(sub_query, node.is_or(), node.is_negating());
                }
            }
        }

        Ok(buckets.into_query())
    }

    fn query_for_entries(
        &self,
        node: &CriteriaNode,
        depth: usize,
    ) -> CriteriaResult<Option<QueryNode>> {
        let entries = node.query_entries();
        let Some(field) = node.field() else {
            if let Some(entry) = entries.first().or(node.filter_entries().first()) {
                return Err(CriteriaError::MissingField {
                    operator: entry.operator.to_string(),
                });
            }
            return Ok(None);
        };
        if entries.is_empty() {
            return Ok(None);
        }

        let resolved = self.resolver.resolve(field);
        let sub_query = |query: &Query| self.compile_sub_query(query, depth + 1);

        let mut leaves = entries
            .iter()
            .map(|entry| {
                let leaf =
                    predicate_handlers::build_clause(&resolved, entry, self.config, &sub_query)?;
                trace!(field = %resolved.name, operator = %entry.operator, "query fragment");
                Ok(leaf)
            })
            .collect::<CriteriaResult<Vec<_>>>()?;

        let mut fragment = if leaves.len() == 1 {
            leaves.remove(0).with_boost(node.boost())
        } else {
            QueryNode::Bool(BoolQuery {
                must: leaves,
                boost: node.boost(),
                ..Default::default()
            })
        };

        if let Some(ref path) = resolved.nested_path {
            fragment = QueryNode::Nested(NestedQuery {
                path: path.clone(),
                query: Box::new(fragment),
                score_mode: self.config.nested_score_mode,
                boost: None,
            });
        }

        if node.is_or() && node.is_negating() {
            fragment = QueryNode::not(fragment);
        }

        Ok(Some(fragment))
    }

    fn compile_sub_query(&self, query: &Query, depth: usize) -> CriteriaResult<Option<QueryNode>> {
        if depth > self.config.max_depth {
            return Err(CriteriaError::invalid_argument(
                "",
                "SUB_QUERY",
                format!("queries nested deeper than {} levels", self.config.max_depth),
            ));
        }

        match (self.sub_queries, query) {
            (Some(sub_queries), _) => sub_queries.compile_sub_query(query, depth),
            (None, Query::Criteria(criteria)) => self.build_at(criteria, depth),
            (None, other) => Err(CriteriaError::UnsupportedQueryType {
                query_type: other.kind().to_string(),
            }),
        }
    }
}
