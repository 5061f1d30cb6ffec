//! Top-level query variants.

use serde_json::{Map, Value};

use crate::dsl::QueryNode;

use super::criteria::Criteria;

/// A query as submitted to the facade.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Criteria to compile.
    Criteria(Criteria),
    /// Literal query text in the engine's own syntax, passed through unparsed.
    Text(String),
    /// A query already in native form.
    Native(NativeQuery),
    /// A stored search template. Executed by the engine, never compiled.
    Template(SearchTemplate),
}

impl Query {
    /// Returns the variant name, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Criteria(_) => "criteria",
            Query::Text(_) => "text",
            Query::Native(NativeQuery::Literal(_)) => "native",
            Query::Native(NativeQuery::Wrapped(_)) => "wrapped",
            Query::Template(_) => "template",
        }
    }

    /// Shorthand for a literal text query.
    pub fn text(source: impl Into<String>) -> Self {
        Query::Text(source.into())
    }

    /// Shorthand for a query wrapping another abstract query.
    pub fn wrapped(inner: Query) -> Self {
        Query::Native(NativeQuery::Wrapped(Box::new(inner)))
    }
}

impl From<Criteria> for Query {
    fn from(criteria: Criteria) -> Self {
        Query::Criteria(criteria)
    }
}

impl From<QueryNode> for Query {
    fn from(node: QueryNode) -> Self {
        Query::Native(NativeQuery::Literal(node))
    }
}

/// A native query: either a finished tree or another abstract query.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeQuery {
    /// A finished query tree, returned unchanged.
    Literal(QueryNode),
    /// An abstract query to dispatch in turn.
    Wrapped(Box<Query>),
}

/// Reference to a stored search template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchTemplate {
    /// Template id.
    pub id: String,
    /// Template parameters.
    pub params: Map<String, Value>,
}
