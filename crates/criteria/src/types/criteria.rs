//! The criteria model.
//!
//! A [`Criteria`] is an ordered chain of [`CriteriaNode`]s. Each node is scoped
//! to one field, carries the entries to apply to it and records how it joins
//! the nodes before it (`is_or`, `is_negating`). A node may also own nested
//! criteria that are combined into the chain as a unit, using that node's own
//! join flags.
//!
//! # Example
//!
//! ```
//! use helios_criteria::types::Criteria;
//!
//! // status = "active" AND (title contains "rust" OR title contains "wasm")
//! let criteria = Criteria::where_field("status")
//!     .is("active")
//!     .and_criteria(
//!         Criteria::where_field("title")
//!             .contains("rust")
//!             .or("title")
//!             .contains("wasm"),
//!     );
//! assert_eq!(criteria.nodes().len(), 2);
//! ```

use crate::search::operators::{Operator, OperatorContext};

use super::field::Field;
use super::geo::{GeoBox, GeoJson};
use super::relationship::{HasChild, HasParent};
use super::value::CriteriaValue;

/// One (operator, value) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaEntry {
    /// Operator.
    pub operator: Operator,
    /// Operand.
    pub value: CriteriaValue,
}

impl CriteriaEntry {
    /// Creates an entry.
    pub fn new(operator: Operator, value: impl Into<CriteriaValue>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }
}

/// A single field-scoped predicate group in a criteria chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CriteriaNode {
    field: Option<Field>,
    is_or: bool,
    is_negating: bool,
    query_entries: Vec<CriteriaEntry>,
    filter_entries: Vec<CriteriaEntry>,
    boost: Option<f32>,
    sub_criteria: Vec<Criteria>,
}

impl CriteriaNode {
    /// Creates a node scoped to `field`.
    pub fn new(field: impl Into<Field>) -> Self {
        Self {
            field: Some(field.into()),
            ..Default::default()
        }
    }

    /// Creates a node without a field, used to carry nested criteria.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Marks the node as joined to the previous one with OR.
    pub fn with_or(mut self, is_or: bool) -> Self {
        self.is_or = is_or;
        self
    }

    /// Marks the node as negated.
    pub fn with_negating(mut self, is_negating: bool) -> Self {
        self.is_negating = is_negating;
        self
    }

    /// Sets the boost. NaN leaves the boost unset.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = if boost.is_nan() { None } else { Some(boost) };
        self
    }

    /// Adds an entry, placed in the query or filter set by its operator's
    /// context.
    pub fn with_entry(mut self, entry: CriteriaEntry) -> Self {
        self.push_entry(entry);
        self
    }

    /// Adds an entry to the query set regardless of its operator's context.
    pub fn with_query_entry(mut self, entry: CriteriaEntry) -> Self {
        self.query_entries.push(entry);
        self
    }

    /// Adds an entry to the filter set regardless of its operator's context.
    pub fn with_filter_entry(mut self, entry: CriteriaEntry) -> Self {
        self.filter_entries.push(entry);
        self
    }

    /// Adds nested criteria.
    pub fn with_sub_criteria(mut self, criteria: Criteria) -> Self {
        self.sub_criteria.push(criteria);
        self
    }

    fn push_entry(&mut self, entry: CriteriaEntry) {
        match entry.operator.context() {
            OperatorContext::Query => self.query_entries.push(entry),
            OperatorContext::Filter => self.filter_entries.push(entry),
        }
    }

    /// Field this node is scoped to.
    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    /// Mutable access to the field, for normalizers.
    pub fn field_mut(&mut self) -> Option<&mut Field> {
        self.field.as_mut()
    }

    /// True if the node joins the previous one with OR.
    pub fn is_or(&self) -> bool {
        self.is_or
    }

    /// True if the node is negated.
    pub fn is_negating(&self) -> bool {
        self.is_negating
    }

    /// Entries for the scoring query.
    pub fn query_entries(&self) -> &[CriteriaEntry] {
        &self.query_entries
    }

    /// Mutable query entries, for normalizers.
    pub fn query_entries_mut(&mut self) -> &mut Vec<CriteriaEntry> {
        &mut self.query_entries
    }

    /// Entries for the non-scoring filter.
    pub fn filter_entries(&self) -> &[CriteriaEntry] {
        &self.filter_entries
    }

    /// Boost, if set.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    /// Nested criteria.
    pub fn sub_criteria(&self) -> &[Criteria] {
        &self.sub_criteria
    }

    /// Mutable nested criteria, for normalizers.
    pub fn sub_criteria_mut(&mut self) -> &mut Vec<Criteria> {
        &mut self.sub_criteria
    }
}

/// An ordered chain of criteria nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    nodes: Vec<CriteriaNode>,
}

impl Criteria {
    /// Creates an empty chain. Compiles to no query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain from prepared nodes.
    pub fn from_nodes(nodes: Vec<CriteriaNode>) -> Self {
        Self { nodes }
    }

    /// Starts a chain at `field`.
    pub fn where_field(field: impl Into<Field>) -> Self {
        Self {
            nodes: vec![CriteriaNode::new(field)],
        }
    }

    /// The nodes in chain order.
    pub fn nodes(&self) -> &[CriteriaNode] {
        &self.nodes
    }

    /// Mutable nodes, for normalizers.
    pub fn nodes_mut(&mut self) -> &mut [CriteriaNode] {
        &mut self.nodes
    }

    /// True if the chain has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in this chain and every nested chain.
    pub fn total_nodes(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| 1 + node.sub_criteria.iter().map(Criteria::total_nodes).sum::<usize>())
            .sum()
    }

    fn last_mut(&mut self) -> &mut CriteriaNode {
        if self.nodes.is_empty() {
            self.nodes.push(CriteriaNode::empty());
        }
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Appends a node for `field`, ANDed with the chain.
    pub fn and(mut self, field: impl Into<Field>) -> Self {
        self.nodes.push(CriteriaNode::new(field));
        self
    }

    /// Appends a node for `field`, ORed with the chain.
    pub fn or(mut self, field: impl Into<Field>) -> Self {
        self.nodes.push(CriteriaNode::new(field).with_or(true));
        self
    }

    /// Appends nested criteria, ANDed with the chain.
    pub fn and_criteria(mut self, criteria: Criteria) -> Self {
        self.nodes
            .push(CriteriaNode::empty().with_sub_criteria(criteria));
        self
    }

    /// Appends nested criteria, ORed with the chain.
    pub fn or_criteria(mut self, criteria: Criteria) -> Self {
        self.nodes.push(
            CriteriaNode::empty()
                .with_or(true)
                .with_sub_criteria(criteria),
        );
        self
    }

    /// Attaches nested criteria to the current node.
    pub fn sub_criteria(mut self, criteria: Criteria) -> Self {
        self.last_mut().sub_criteria.push(criteria);
        self
    }

    /// Negates the current node.
    pub fn not(mut self) -> Self {
        self.last_mut().is_negating = true;
        self
    }

    /// Sets the boost of the current node. NaN leaves it unset.
    pub fn boost(mut self, boost: f32) -> Self {
        let node = self.last_mut();
        node.boost = if boost.is_nan() { None } else { Some(boost) };
        self
    }

    /// Adds an entry to the current node.
    pub fn with_entry(mut self, operator: Operator, value: impl Into<CriteriaValue>) -> Self {
        self.last_mut()
            .push_entry(CriteriaEntry::new(operator, value));
        self
    }

    /// Analyzed equality.
    pub fn is(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::Equals, value)
    }

    /// Substring match.
    pub fn contains(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::Contains, value)
    }

    /// Prefix match.
    pub fn starts_with(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::StartsWith, value)
    }

    /// Suffix match.
    pub fn ends_with(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::EndsWith, value)
    }

    /// Raw query-string expression, not escaped.
    pub fn expression(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::Expression, value)
    }

    /// Fuzzy match.
    pub fn fuzzy(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::Fuzzy, value)
    }

    /// Match query requiring any term.
    pub fn matches(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::Matches, value)
    }

    /// Match query requiring all terms.
    pub fn matches_all(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::MatchesAll, value)
    }

    /// Set membership.
    pub fn in_values<T: Into<CriteriaValue>>(self, values: Vec<T>) -> Self {
        self.with_entry(Operator::In, values)
    }

    /// Set exclusion.
    pub fn not_in<T: Into<CriteriaValue>>(self, values: Vec<T>) -> Self {
        self.with_entry(Operator::NotIn, values)
    }

    /// Inclusive range. Pass `None` for an open side.
    pub fn between(
        self,
        lower: impl Into<CriteriaValue>,
        upper: impl Into<CriteriaValue>,
    ) -> Self {
        self.with_entry(
            Operator::Between,
            CriteriaValue::List(vec![lower.into(), upper.into()]),
        )
    }

    /// Strictly less than.
    pub fn less_than(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::Less, value)
    }

    /// Less than or equal.
    pub fn less_than_equal(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::LessEqual, value)
    }

    /// Strictly greater than.
    pub fn greater_than(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::Greater, value)
    }

    /// Greater than or equal.
    pub fn greater_than_equal(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::GreaterEqual, value)
    }

    /// Field has any value.
    pub fn exists(self) -> Self {
        self.with_entry(Operator::Exists, CriteriaValue::Null)
    }

    /// Field exists but holds nothing.
    pub fn empty(self) -> Self {
        self.with_entry(Operator::Empty, CriteriaValue::Null)
    }

    /// Field holds something.
    pub fn not_empty(self) -> Self {
        self.with_entry(Operator::NotEmpty, CriteriaValue::Null)
    }

    /// Regular expression match.
    pub fn regexp(self, value: impl Into<CriteriaValue>) -> Self {
        self.with_entry(Operator::Regexp, value)
    }

    /// Parent has matching children.
    pub fn has_child(self, spec: HasChild) -> Self {
        self.with_entry(Operator::HasChild, spec)
    }

    /// Child has a matching parent.
    pub fn has_parent(self, spec: HasParent) -> Self {
        self.with_entry(Operator::HasParent, spec)
    }

    /// Within `distance` of `point`.
    ///
    /// `point` may be a geo point, a cartesian point, `"lat,lon"` text or a
    /// geohash; `distance` a structured distance or text such as `"10km"`.
    pub fn within(
        self,
        point: impl Into<CriteriaValue>,
        distance: impl Into<CriteriaValue>,
    ) -> Self {
        self.with_entry(
            Operator::Within,
            CriteriaValue::List(vec![point.into(), distance.into()]),
        )
    }

    /// Inside an explicit bounding box.
    pub fn bounding_box(self, geo_box: GeoBox) -> Self {
        self.with_entry(Operator::BBox, geo_box)
    }

    /// Inside the box spanned by two corners.
    pub fn bounding_box_corners(
        self,
        top_left: impl Into<CriteriaValue>,
        bottom_right: impl Into<CriteriaValue>,
    ) -> Self {
        self.with_entry(
            Operator::BBox,
            CriteriaValue::List(vec![top_left.into(), bottom_right.into()]),
        )
    }

    /// Shape intersects `geometry`.
    pub fn intersects(self, geometry: GeoJson) -> Self {
        self.with_entry(Operator::GeoIntersects, geometry)
    }

    /// Shape is disjoint from `geometry`.
    pub fn disjoint(self, geometry: GeoJson) -> Self {
        self.with_entry(Operator::GeoIsDisjoint, geometry)
    }

    /// Shape lies within `geometry`.
    pub fn within_shape(self, geometry: GeoJson) -> Self {
        self.with_entry(Operator::GeoWithin, geometry)
    }

    /// Shape contains `geometry`.
    pub fn contains_shape(self, geometry: GeoJson) -> Self {
        self.with_entry(Operator::GeoContains, geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Distance, GeoPoint};

    #[test]
    fn test_chain_flags() {
        let criteria = Criteria::where_field("a")
            .is("x")
            .or("b")
            .is("y")
            .and("c")
            .is("z")
            .not();

        let nodes = criteria.nodes();
        assert_eq!(nodes.len(), 3);
        assert!(!nodes[0].is_or() && !nodes[0].is_negating());
        assert!(nodes[1].is_or());
        assert!(nodes[2].is_negating() && !nodes[2].is_or());
    }

    #[test]
    fn test_entries_routed_by_context() {
        let criteria = Criteria::where_field("location")
            .within(GeoPoint::new(1.0, 2.0), Distance::km(3.0))
            .exists();

        let node = &criteria.nodes()[0];
        assert_eq!(node.query_entries().len(), 1);
        assert_eq!(node.query_entries()[0].operator, Operator::Exists);
        assert_eq!(node.filter_entries().len(), 1);
        assert_eq!(node.filter_entries()[0].operator, Operator::Within);
    }

    #[test]
    fn test_nan_boost_is_unset() {
        let criteria = Criteria::where_field("a").is("x").boost(f32::NAN);
        assert_eq!(criteria.nodes()[0].boost(), None);
        let criteria = Criteria::where_field("a").is("x").boost(2.0);
        assert_eq!(criteria.nodes()[0].boost(), Some(2.0));
    }

    #[test]
    fn test_total_nodes_counts_nested() {
        let criteria = Criteria::where_field("a")
            .is("x")
            .or_criteria(Criteria::where_field("b").is("y").and("c").is("z"));
        assert_eq!(criteria.total_nodes(), 4);
    }

    #[test]
    fn test_entry_on_empty_chain_creates_fieldless_node() {
        let criteria = Criteria::new().is("x");
        assert_eq!(criteria.nodes().len(), 1);
        assert!(criteria.nodes()[0].field().is_none());
    }
}
