//! Criteria compilation.
//!
//! Translates [`Criteria`](crate::types::Criteria) into engine query trees.

pub mod escape;
pub mod facade;
pub mod filter_builder;
pub mod geo;
pub mod operators;
pub mod predicate_handlers;
pub mod query_builder;

pub use escape::{distance_to_text, escape, to_term_list};
pub use facade::{PropertyNameNormalizer, QueryFacade, QueryNormalizer};
pub use filter_builder::FilterBuilder;
pub use geo::{bounding_box_filter, distance_filter, geo_shape_filter};
pub use operators::{Arity, Operator, OperatorContext, OperatorInfo, validate_catalog};
pub use query_builder::{CriteriaQueryCompiler, SubQueryCompiler};
