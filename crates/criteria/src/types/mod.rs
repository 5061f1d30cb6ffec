//! Input types for the compiler.
//!
//! This module defines the criteria model ([`Criteria`], [`CriteriaNode`],
//! [`CriteriaEntry`]), the values entries carry, field references and their
//! resolution, and the top-level [`Query`] variants accepted by the facade.

mod criteria;
mod field;
mod geo;
mod query;
mod relationship;
mod value;

pub use criteria::{Criteria, CriteriaEntry, CriteriaNode};
pub use field::{
    Field, FieldMapping, FieldResolver, FieldType, IdentityFieldResolver, MappedFieldResolver,
    ResolvedField,
};
pub use geo::{
    Distance, DistanceUnit, GeoBox, GeoJson, GeoPoint, GeoShapeRelation, Point, decode_geohash,
    is_geohash, is_lat_lon_text,
};
pub use query::{NativeQuery, Query, SearchTemplate};
pub use relationship::{HasChild, HasParent, InnerHits, ScoreMode};
pub use value::{CriteriaValue, ValueKind};
