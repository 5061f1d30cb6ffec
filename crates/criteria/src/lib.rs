//! Helios Criteria Compiler
//!
//! This crate translates a database-agnostic predicate model ("criteria") into
//! the boolean query trees of a document search engine: must/should/must_not/
//! filter clauses over leaf predicates such as query-string, range, terms,
//! fuzzy, wildcard, geo and parent/child relationship queries.
//!
//! # Features
//!
//! - **Exact boolean semantics**: AND/OR/NOT chains and nested sub-criteria
//! - **Query vs. filter context**: scoring predicates and non-scoring geo
//!   filters are compiled separately and merged
//! - **Field resolution**: keyword-exact vs. analyzed behavior and nested
//!   envelopes driven by a pluggable [`FieldResolver`](types::FieldResolver)
//! - **Pure**: no I/O, no shared mutable state; safe to call from any thread
//!
//! # Architecture
//!
//! - [`types`] - Criteria model, values, fields and top-level query variants
//! - [`search`] - Operator catalog, escaping helpers, predicate builders,
//!   compiler and facade
//! - [`dsl`] - Output query tree and its JSON rendering
//! - [`config`] - Compiler configuration
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use helios_criteria::search::QueryFacade;
//! use helios_criteria::types::{
//!     Criteria, Distance, GeoPoint, MappedFieldResolver, Query,
//! };
//! use serde_json::json;
//!
//! let resolver = MappedFieldResolver::new().with_keyword("status");
//! let facade = QueryFacade::new(resolver);
//!
//! let criteria = Criteria::where_field("status")
//!     .in_values(vec!["open", "pending"])
//!     .and("location")
//!     .within(GeoPoint::new(52.52, 13.40), Distance::km(5.0));
//!
//! let query = facade
//!     .dispatch(&Query::Criteria(criteria), None)
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(
//!     query.to_json(),
//!     json!({
//!         "bool": {
//!             "must": [
//!                 { "bool": { "must": [ { "terms": { "status": ["open", "pending"] } } ] } }
//!             ],
//!             "filter": [
//!                 {
//!                     "geo_distance": {
//!                         "distance": "5km",
//!                         "distance_type": "plane",
//!                         "location": { "lat": 52.52, "lon": 13.40 }
//!                     }
//!                 }
//!             ]
//!         }
//!     })
//! );
//! ```
//!
//! # Escaping
//!
//! Values are escaped for the query-string syntax exactly once by the
//! compiler. Callers writing their own query strings use [`search::escape`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod dsl;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use config::CompilerConfig;
pub use dsl::QueryNode;
pub use error::{CriteriaError, CriteriaResult};
pub use search::{CriteriaQueryCompiler, Operator, QueryFacade, escape};
pub use types::{Criteria, CriteriaValue, Query};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
