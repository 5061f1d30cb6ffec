//! Compiled query trees.
//!
//! [`QueryNode`] is the compiler's output: leaf predicates plus `bool`
//! combinators with must/should/must_not/filter clauses. Trees can be rendered
//! into the engine's JSON query DSL with [`QueryNode::to_json`].
//!
//! # Example
//!
//! ```
//! use helios_criteria::dsl::{BoolQuery, ExistsQuery, QueryNode};
//! use serde_json::json;
//!
//! let query = QueryNode::Bool(BoolQuery::new().must_not(QueryNode::Exists(ExistsQuery {
//!     field: "deleted_at".to_string(),
//!     boost: None,
//! })));
//!
//! assert_eq!(
//!     query.to_json(),
//!     json!({ "bool": { "must_not": [ { "exists": { "field": "deleted_at" } } ] } })
//! );
//! ```

mod node;
mod render;

pub use node::{
    BoolQuery, ExistsQuery, FuzzyQuery, GeoBoundingBoxQuery, GeoDistanceQuery, GeoDistanceType,
    GeoLocation, GeoShapeQuery, HasChildQuery, HasParentQuery, MatchAllQuery, MatchQuery,
    NestedQuery, QueryNode, QueryStringQuery, RangeQuery, RegexpQuery, TermsQuery, TextOperator,
    WildcardQuery, WrapperQuery,
};
