//! Query tree node types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{GeoPoint, GeoShapeRelation, InnerHits, ScoreMode};

/// A node in a compiled query tree.
///
/// Trees are plain owned values: they hold no reference to the criteria they
/// were compiled from and compare structurally.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// Matches every document.
    MatchAll(MatchAllQuery),
    /// Boolean combination.
    Bool(BoolQuery),
    /// Free-text query-string query.
    QueryString(QueryStringQuery),
    /// Analyzed match query.
    Match(MatchQuery),
    /// Fuzzy term query.
    Fuzzy(FuzzyQuery),
    /// Range query.
    Range(RangeQuery),
    /// Exact term-set query.
    Terms(TermsQuery),
    /// Field existence.
    Exists(ExistsQuery),
    /// Wildcard pattern.
    Wildcard(WildcardQuery),
    /// Regular expression.
    Regexp(RegexpQuery),
    /// Nested document envelope.
    Nested(NestedQuery),
    /// Parent-has-child relationship.
    HasChild(HasChildQuery),
    /// Child-has-parent relationship.
    HasParent(HasParentQuery),
    /// Distance from a point.
    GeoDistance(GeoDistanceQuery),
    /// Inside a bounding box.
    GeoBoundingBox(GeoBoundingBoxQuery),
    /// Shape relation.
    GeoShape(GeoShapeQuery),
    /// Opaque pre-written query.
    Wrapper(WrapperQuery),
}

impl QueryNode {
    /// A match-all query.
    pub fn match_all() -> Self {
        QueryNode::MatchAll(MatchAllQuery::default())
    }

    /// Wraps `query` in a NOT envelope.
    pub fn not(query: QueryNode) -> Self {
        QueryNode::Bool(BoolQuery::new().must_not(query))
    }

    /// Returns the engine name of this node's query type.
    pub fn query_type(&self) -> &'static str {
        match self {
            QueryNode::MatchAll(_) => "match_all",
            QueryNode::Bool(_) => "bool",
            QueryNode::QueryString(_) => "query_string",
            QueryNode::Match(_) => "match",
            QueryNode::Fuzzy(_) => "fuzzy",
            QueryNode::Range(_) => "range",
            QueryNode::Terms(_) => "terms",
            QueryNode::Exists(_) => "exists",
            QueryNode::Wildcard(_) => "wildcard",
            QueryNode::Regexp(_) => "regexp",
            QueryNode::Nested(_) => "nested",
            QueryNode::HasChild(_) => "has_child",
            QueryNode::HasParent(_) => "has_parent",
            QueryNode::GeoDistance(_) => "geo_distance",
            QueryNode::GeoBoundingBox(_) => "geo_bounding_box",
            QueryNode::GeoShape(_) => "geo_shape",
            QueryNode::Wrapper(_) => "wrapper",
        }
    }

    /// Returns the bool query if this node is one.
    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            QueryNode::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Sets the boost on nodes that carry one.
    ///
    /// Geo filters and wrappers are never scored, so they are returned
    /// unchanged.
    pub fn with_boost(mut self, boost: Option<f32>) -> Self {
        let Some(boost) = boost else {
            return self;
        };
        let slot = match &mut self {
            QueryNode::MatchAll(q) => Some(&mut q.boost),
            QueryNode::Bool(q) => Some(&mut q.boost),
            QueryNode::QueryString(q) => Some(&mut q.boost),
            QueryNode::Match(q) => Some(&mut q.boost),
            QueryNode::Fuzzy(q) => Some(&mut q.boost),
            QueryNode::Range(q) => Some(&mut q.boost),
            QueryNode::Terms(q) => Some(&mut q.boost),
            QueryNode::Exists(q) => Some(&mut q.boost),
            QueryNode::Wildcard(q) => Some(&mut q.boost),
            QueryNode::Regexp(q) => Some(&mut q.boost),
            QueryNode::Nested(q) => Some(&mut q.boost),
            QueryNode::HasChild(q) => Some(&mut q.boost),
            QueryNode::HasParent(q) => Some(&mut q.boost),
            QueryNode::GeoDistance(_)
            | QueryNode::GeoBoundingBox(_)
            | QueryNode::GeoShape(_)
            | QueryNode::Wrapper(_) => None,
        };
        if let Some(slot) = slot {
            *slot = Some(boost);
        }
        self
    }
}

macro_rules! impl_from_query {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for QueryNode {
                fn from(query: $ty) -> Self {
                    QueryNode::$variant(query)
                }
            }
        )*
    };
}

impl_from_query!(
    MatchAll => MatchAllQuery,
    Bool => BoolQuery,
    QueryString => QueryStringQuery,
    Match => MatchQuery,
    Fuzzy => FuzzyQuery,
    Range => RangeQuery,
    Terms => TermsQuery,
    Exists => ExistsQuery,
    Wildcard => WildcardQuery,
    Regexp => RegexpQuery,
    Nested => NestedQuery,
    HasChild => HasChildQuery,
    HasParent => HasParentQuery,
    GeoDistance => GeoDistanceQuery,
    GeoBoundingBox => GeoBoundingBoxQuery,
    GeoShape => GeoShapeQuery,
    Wrapper => WrapperQuery,
);

/// Boolean operator used by text queries to combine terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOperator {
    /// Every term required.
    And,
    /// Any term suffices.
    Or,
}

impl fmt::Display for TextOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextOperator::And => write!(f, "and"),
            TextOperator::Or => write!(f, "or"),
        }
    }
}

/// Matches every document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchAllQuery {
    /// Boost.
    pub boost: Option<f32>,
}

/// Boolean combination of clauses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    /// Required, scoring.
    pub must: Vec<QueryNode>,
    /// Optional alternatives, scoring.
    pub should: Vec<QueryNode>,
    /// Excluded.
    pub must_not: Vec<QueryNode>,
    /// Required, non-scoring.
    pub filter: Vec<QueryNode>,
    /// Number of `should` clauses that must match.
    pub minimum_should_match: Option<u32>,
    /// Boost.
    pub boost: Option<f32>,
}

impl BoolQuery {
    /// Creates an empty bool query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required clause.
    pub fn must(mut self, query: QueryNode) -> Self {
        self.must.push(query);
        self
    }

    /// Adds an alternative clause.
    pub fn should(mut self, query: QueryNode) -> Self {
        self.should.push(query);
        self
    }

    /// Adds an excluded clause.
    pub fn must_not(mut self, query: QueryNode) -> Self {
        self.must_not.push(query);
        self
    }

    /// Adds a non-scoring clause.
    pub fn filter(mut self, query: QueryNode) -> Self {
        self.filter.push(query);
        self
    }

    /// True if no clause of any kind is present.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.should.is_empty()
            && self.must_not.is_empty()
            && self.filter.is_empty()
    }
}

/// Free-text query in the engine's query-string syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStringQuery {
    /// Query text.
    pub query: String,
    /// Fields searched.
    pub fields: Vec<String>,
    /// Operator between terms.
    pub default_operator: TextOperator,
    /// Whether wildcard terms are analyzed.
    pub analyze_wildcard: bool,
    /// Boost.
    pub boost: Option<f32>,
}

impl QueryStringQuery {
    /// Creates a query over a single field.
    pub fn new(field: impl Into<String>, query: impl Into<String>, op: TextOperator) -> Self {
        Self {
            query: query.into(),
            fields: vec![field.into()],
            default_operator: op,
            analyze_wildcard: false,
            boost: None,
        }
    }

    /// Sets wildcard analysis.
    pub fn analyze_wildcard(mut self, analyze: bool) -> Self {
        self.analyze_wildcard = analyze;
        self
    }
}

/// Analyzed match query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    /// Field.
    pub field: String,
    /// Query text.
    pub query: String,
    /// Operator between analyzed terms.
    pub operator: TextOperator,
    /// Boost.
    pub boost: Option<f32>,
}

/// Fuzzy term query.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyQuery {
    /// Field.
    pub field: String,
    /// Term.
    pub value: String,
    /// Edit distance, engine default when absent.
    pub fuzziness: Option<String>,
    /// Boost.
    pub boost: Option<f32>,
}

/// Range query. Absent bounds are open.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeQuery {
    /// Field.
    pub field: String,
    /// Exclusive lower bound.
    pub gt: Option<Value>,
    /// Inclusive lower bound.
    pub gte: Option<Value>,
    /// Exclusive upper bound.
    pub lt: Option<Value>,
    /// Inclusive upper bound.
    pub lte: Option<Value>,
    /// Boost.
    pub boost: Option<f32>,
}

impl RangeQuery {
    /// Creates an unbounded range on `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    /// True if neither side is bounded.
    pub fn is_unbounded(&self) -> bool {
        self.gt.is_none() && self.gte.is_none() && self.lt.is_none() && self.lte.is_none()
    }
}

/// Exact term-set query. `None` entries are null terms.
#[derive(Debug, Clone, PartialEq)]
pub struct TermsQuery {
    /// Field.
    pub field: String,
    /// Terms.
    pub values: Vec<Option<String>>,
    /// Boost.
    pub boost: Option<f32>,
}

/// Field existence.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsQuery {
    /// Field.
    pub field: String,
    /// Boost.
    pub boost: Option<f32>,
}

/// Wildcard pattern query.
#[derive(Debug, Clone, PartialEq)]
pub struct WildcardQuery {
    /// Field.
    pub field: String,
    /// Pattern.
    pub value: String,
    /// Boost.
    pub boost: Option<f32>,
}

/// Regular expression query.
#[derive(Debug, Clone, PartialEq)]
pub struct RegexpQuery {
    /// Field.
    pub field: String,
    /// Expression.
    pub value: String,
    /// Boost.
    pub boost: Option<f32>,
}

/// Nested document envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedQuery {
    /// Nested path.
    pub path: String,
    /// Inner query.
    pub query: Box<QueryNode>,
    /// Score accumulation across matched nested documents.
    pub score_mode: ScoreMode,
    /// Boost.
    pub boost: Option<f32>,
}

/// Parent-has-child relationship query.
#[derive(Debug, Clone, PartialEq)]
pub struct HasChildQuery {
    /// Child join type.
    pub child_type: String,
    /// Query on children.
    pub query: Box<QueryNode>,
    /// Child score accumulation.
    pub score_mode: ScoreMode,
    /// Inner hits.
    pub inner_hits: Option<InnerHits>,
    /// Boost.
    pub boost: Option<f32>,
}

/// Child-has-parent relationship query.
#[derive(Debug, Clone, PartialEq)]
pub struct HasParentQuery {
    /// Parent join type.
    pub parent_type: String,
    /// Query on the parent.
    pub query: Box<QueryNode>,
    /// Propagate the parent score.
    pub score: bool,
    /// Inner hits.
    pub inner_hits: Option<InnerHits>,
    /// Boost.
    pub boost: Option<f32>,
}

/// A point location as sent to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoLocation {
    /// Structured latitude/longitude.
    LatLon(GeoPoint),
    /// `"lat,lon"` text.
    Text(String),
    /// Geohash text.
    Geohash(String),
}

/// Distance calculation used by geo distance filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeoDistanceType {
    /// Planar approximation.
    #[default]
    Plane,
    /// Great-circle arc.
    Arc,
}

impl fmt::Display for GeoDistanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoDistanceType::Plane => write!(f, "plane"),
            GeoDistanceType::Arc => write!(f, "arc"),
        }
    }
}

/// Documents within a distance of a point.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoDistanceQuery {
    /// Field.
    pub field: String,
    /// Center.
    pub point: GeoLocation,
    /// Distance text, e.g. `"12km"`.
    pub distance: String,
    /// Distance calculation.
    pub distance_type: GeoDistanceType,
}

/// Documents inside a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBoundingBoxQuery {
    /// Field.
    pub field: String,
    /// North-west corner.
    pub top_left: GeoLocation,
    /// South-east corner.
    pub bottom_right: GeoLocation,
}

/// Documents whose shape stands in `relation` to `shape`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoShapeQuery {
    /// Field.
    pub field: String,
    /// GeoJSON geometry as a generic map.
    pub shape: Map<String, Value>,
    /// Relation.
    pub relation: GeoShapeRelation,
}

/// An opaque, pre-written query passed through unparsed.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperQuery {
    /// Query source text.
    pub query: String,
}
