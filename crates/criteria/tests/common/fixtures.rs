//! Fixtures: a field mapping for a small article index and compile helpers.

use helios_criteria::types::{FieldMapping, FieldType, MappedFieldResolver};
use helios_criteria::{CompilerConfig, Criteria, CriteriaQueryCompiler, CriteriaResult, QueryNode};

/// Resolver for an article index.
///
/// - `status`, `tags` are keyword fields
/// - `title`, `body` are analyzed text
/// - `author` maps to the nested `authors.name` field
/// - `location` is a geo point, `area` a geo shape
pub fn article_resolver() -> MappedFieldResolver {
    MappedFieldResolver::new()
        .with_keyword("status")
        .with_keyword("tags")
        .with_mapping(
            "title",
            FieldMapping {
                name: "title".to_string(),
                field_type: Some(FieldType::Text),
                nested_path: None,
            },
        )
        .with_mapping(
            "body",
            FieldMapping {
                name: "body".to_string(),
                field_type: Some(FieldType::Text),
                nested_path: None,
            },
        )
        .with_mapping(
            "author",
            FieldMapping {
                name: "authors.name".to_string(),
                field_type: Some(FieldType::Text),
                nested_path: Some("authors".to_string()),
            },
        )
        .with_mapping(
            "location",
            FieldMapping {
                name: "location".to_string(),
                field_type: Some(FieldType::GeoPoint),
                nested_path: None,
            },
        )
        .with_mapping(
            "area",
            FieldMapping {
                name: "area".to_string(),
                field_type: Some(FieldType::GeoShape),
                nested_path: None,
            },
        )
}

/// Compiles the scoring tree against the article index.
pub fn compile(criteria: &Criteria) -> CriteriaResult<Option<QueryNode>> {
    let resolver = article_resolver();
    let config = CompilerConfig::default();
    CriteriaQueryCompiler::new(&resolver, &config).compile(criteria)
}

/// Compiles the filter tree against the article index.
pub fn compile_filter(criteria: &Criteria) -> CriteriaResult<Option<QueryNode>> {
    let resolver = article_resolver();
    let config = CompilerConfig::default();
    CriteriaQueryCompiler::new(&resolver, &config).compile_filter(criteria)
}

/// Compiles and merges both trees against the article index.
pub fn build(criteria: &Criteria) -> CriteriaResult<Option<QueryNode>> {
    let resolver = article_resolver();
    let config = CompilerConfig::default();
    CriteriaQueryCompiler::new(&resolver, &config).build(criteria)
}
