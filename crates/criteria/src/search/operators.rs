//! Operator catalog.
//!
//! The closed set of predicate operators a criteria entry can carry, with the
//! context each one compiles in and the value shapes it accepts. The catalog
//! is a single exhaustive `match`, so adding an operator without describing it
//! here does not compile. Predicate construction lives elsewhere
//! (`predicate_handlers`, `geo`) and only consults the catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CriteriaError, CriteriaResult};
use crate::types::{CriteriaValue, ValueKind};

/// Predicate operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Analyzed equality.
    Equals,
    /// Substring match.
    Contains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
    /// Raw query-string expression.
    Expression,
    /// Closed range from a `[lower, upper]` pair.
    Between,
    /// Fuzzy match.
    Fuzzy,
    /// Match query, any term.
    Matches,
    /// Match query, all terms.
    MatchesAll,
    /// Set membership.
    In,
    /// Set exclusion.
    NotIn,
    /// Strictly less than.
    Less,
    /// Less than or equal.
    LessEqual,
    /// Strictly greater than.
    Greater,
    /// Greater than or equal.
    GreaterEqual,
    /// Field has any value.
    Exists,
    /// Field exists but holds nothing.
    Empty,
    /// Field holds something.
    NotEmpty,
    /// Regular expression.
    Regexp,
    /// Parent has matching children.
    HasChild,
    /// Child has a matching parent.
    HasParent,
    /// Within a distance of a point.
    Within,
    /// Inside a bounding box.
    #[serde(rename = "BBOX")]
    BBox,
    /// Shape intersects.
    GeoIntersects,
    /// Shape is disjoint.
    GeoIsDisjoint,
    /// Shape lies within.
    GeoWithin,
    /// Shape contains.
    GeoContains,
}

/// Where an operator's predicate is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorContext {
    /// Scoring query context.
    Query,
    /// Non-scoring filter context.
    Filter,
}

impl fmt::Display for OperatorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorContext::Query => write!(f, "query"),
            OperatorContext::Filter => write!(f, "filter"),
        }
    }
}

/// Bounds on the number of values an operator takes.
///
/// For operators taking a sequence this bounds the number of elements; scalar
/// operators take exactly one value and presence-only operators take none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Minimum number of values.
    pub min: usize,
    /// Maximum number of values.
    pub max: usize,
}

impl Arity {
    const NONE: Arity = Arity { min: 0, max: 0 };
    const ONE: Arity = Arity { min: 1, max: 1 };
    const PAIR: Arity = Arity { min: 2, max: 2 };
    const ONE_OR_TWO: Arity = Arity { min: 1, max: 2 };
    const MANY: Arity = Arity {
        min: 1,
        max: usize::MAX,
    };

    /// Returns true if `count` values satisfy the bounds.
    pub fn admits(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

/// Catalog entry for one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    /// Compilation context.
    pub context: OperatorContext,
    /// Value arity.
    pub arity: Arity,
    /// Accepted top-level value kinds.
    pub accepts: &'static [ValueKind],
}

const ABSENT: &[ValueKind] = &[ValueKind::Null];
const SCALAR: &[ValueKind] = &[ValueKind::Scalar];
const SEQUENCE: &[ValueKind] = &[ValueKind::List];
const BOX_OR_CORNERS: &[ValueKind] = &[ValueKind::GeoBox, ValueKind::List];
const GEOMETRY: &[ValueKind] = &[ValueKind::Geometry];
const CHILD: &[ValueKind] = &[ValueKind::HasChild];
const PARENT: &[ValueKind] = &[ValueKind::HasParent];

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 27] = [
        Operator::Equals,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Expression,
        Operator::Between,
        Operator::Fuzzy,
        Operator::Matches,
        Operator::MatchesAll,
        Operator::In,
        Operator::NotIn,
        Operator::Less,
        Operator::LessEqual,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Exists,
        Operator::Empty,
        Operator::NotEmpty,
        Operator::Regexp,
        Operator::HasChild,
        Operator::HasParent,
        Operator::Within,
        Operator::BBox,
        Operator::GeoIntersects,
        Operator::GeoIsDisjoint,
        Operator::GeoWithin,
        Operator::GeoContains,
    ];

    /// Returns the catalog entry for this operator.
    pub fn info(&self) -> OperatorInfo {
        use OperatorContext::{Filter, Query};

        let (context, arity, accepts) = match self {
            Operator::Equals
            | Operator::Contains
            | Operator::StartsWith
            | Operator::EndsWith
            | Operator::Expression
            | Operator::Fuzzy
            | Operator::Matches
            | Operator::MatchesAll
            | Operator::Less
            | Operator::LessEqual
            | Operator::Greater
            | Operator::GreaterEqual
            | Operator::Regexp => (Query, Arity::ONE, SCALAR),
            Operator::In | Operator::NotIn => (Query, Arity::MANY, SEQUENCE),
            Operator::Between => (Query, Arity::PAIR, SEQUENCE),
            Operator::Exists | Operator::Empty | Operator::NotEmpty => {
                (Query, Arity::NONE, ABSENT)
            }
            Operator::HasChild => (Query, Arity::ONE, CHILD),
            Operator::HasParent => (Query, Arity::ONE, PARENT),
            Operator::Within => (Filter, Arity::PAIR, SEQUENCE),
            Operator::BBox => (Filter, Arity::ONE_OR_TWO, BOX_OR_CORNERS),
            Operator::GeoIntersects
            | Operator::GeoIsDisjoint
            | Operator::GeoWithin
            | Operator::GeoContains => (Filter, Arity::ONE, GEOMETRY),
        };

        OperatorInfo {
            context,
            arity,
            accepts,
        }
    }

    /// Returns the context this operator compiles in.
    pub fn context(&self) -> OperatorContext {
        self.info().context
    }

    /// Returns true for non-scoring filter operators.
    pub fn is_filter(&self) -> bool {
        self.context() == OperatorContext::Filter
    }

    /// Returns the canonical operator name.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equals => "EQUALS",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::Expression => "EXPRESSION",
            Operator::Between => "BETWEEN",
            Operator::Fuzzy => "FUZZY",
            Operator::Matches => "MATCHES",
            Operator::MatchesAll => "MATCHES_ALL",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::Less => "LESS",
            Operator::LessEqual => "LESS_EQUAL",
            Operator::Greater => "GREATER",
            Operator::GreaterEqual => "GREATER_EQUAL",
            Operator::Exists => "EXISTS",
            Operator::Empty => "EMPTY",
            Operator::NotEmpty => "NOT_EMPTY",
            Operator::Regexp => "REGEXP",
            Operator::HasChild => "HAS_CHILD",
            Operator::HasParent => "HAS_PARENT",
            Operator::Within => "WITHIN",
            Operator::BBox => "BBOX",
            Operator::GeoIntersects => "GEO_INTERSECTS",
            Operator::GeoIsDisjoint => "GEO_IS_DISJOINT",
            Operator::GeoWithin => "GEO_WITHIN",
            Operator::GeoContains => "GEO_CONTAINS",
        }
    }

    /// Checks a value against the accepted kinds and arity.
    ///
    /// Only the outer shape is checked here. Element-level checks (a point
    /// followed by a distance, corner forms) are done by the builders.
    pub fn validate_value(&self, field: &str, value: &CriteriaValue) -> CriteriaResult<()> {
        let info = self.info();
        let kind = value.kind();

        if !info.accepts.contains(&kind) {
            let expected: Vec<String> = info.accepts.iter().map(|k| k.to_string()).collect();
            return Err(CriteriaError::invalid_argument(
                field,
                self,
                format!("expected {}, got {}", expected.join(" or "), kind),
            ));
        }

        let count = match value {
            CriteriaValue::List(values) => values.len(),
            CriteriaValue::Null => 0,
            _ => 1,
        };
        if !info.arity.admits(count) {
            return Err(CriteriaError::invalid_argument(
                field,
                self,
                format!(
                    "expected between {} and {} values, got {}",
                    info.arity.min, info.arity.max, count
                ),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Operator {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.name() == upper)
            .ok_or_else(|| CriteriaError::unsupported_operator(s, "operator catalog"))
    }
}

/// Validates the catalog as a whole.
///
/// Checks that names are unique and parse back to their operator, that arity
/// bounds are ordered and that every operator accepts at least one value
/// kind. Intended for startup checks and tests.
pub fn validate_catalog() -> CriteriaResult<()> {
    for (index, op) in Operator::ALL.iter().enumerate() {
        if Operator::ALL[..index].contains(op) {
            return Err(CriteriaError::unsupported_operator(op, "duplicate catalog entry"));
        }
        if op.name().parse::<Operator>()? != *op {
            return Err(CriteriaError::unsupported_operator(op, "ambiguous operator name"));
        }
        let info = op.info();
        if info.arity.min > info.arity.max || info.accepts.is_empty() {
            return Err(CriteriaError::unsupported_operator(op, "malformed catalog entry"));
        }
    }
    Ok(())
}
