//! Query facade: top-level dispatch over [`Query`] variants.

use std::collections::HashMap;

use tracing::debug;

use crate::config::CompilerConfig;
use crate::dsl::{QueryNode, WrapperQuery};
use crate::error::{CriteriaError, CriteriaResult};
use crate::types::{Criteria, CriteriaValue, FieldResolver, NativeQuery, Query};

use super::query_builder::{CriteriaQueryCompiler, SubQueryCompiler};

/// Hook applied to a query before dispatch.
///
/// Normalizers may rewrite field names and values in place. They run once
/// per top-level dispatch, on a copy of the caller's query.
pub trait QueryNormalizer {
    /// Rewrites `query` in place.
    fn normalize(&self, query: &mut Query);
}

impl<F> QueryNormalizer for F
where
    F: Fn(&mut Query),
{
    fn normalize(&self, query: &mut Query) {
        self(query)
    }
}

/// Renames criteria field names through a fixed property table.
///
/// Walks sub-criteria, wrapped native queries and the embedded queries of
/// relationship entries. Names without a table entry are left alone.
#[derive(Debug, Clone, Default)]
pub struct PropertyNameNormalizer {
    names: HashMap<String, String>,
}

impl PropertyNameNormalizer {
    /// Creates an empty normalizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `property` to `field_name`.
    pub fn with_name(mut self, property: impl Into<String>, field_name: impl Into<String>) -> Self {
        self.names.insert(property.into(), field_name.into());
        self
    }

    fn normalize_criteria(&self, criteria: &mut Criteria) {
        for node in criteria.nodes_mut() {
            if let Some(field) = node.field_mut() {
                if let Some(name) = self.names.get(&field.name) {
                    field.name = name.clone();
                }
            }
            for entry in node.query_entries_mut() {
                match entry.value {
                    CriteriaValue::HasChild(ref mut spec) => self.normalize(&mut spec.query),
                    CriteriaValue::HasParent(ref mut spec) => self.normalize(&mut spec.query),
                    _ => {}
                }
            }
            for sub in node.sub_criteria_mut() {
                self.normalize_criteria(sub);
            }
        }
    }
}

impl QueryNormalizer for PropertyNameNormalizer {
    fn normalize(&self, query: &mut Query) {
        match query {
            Query::Criteria(criteria) => self.normalize_criteria(criteria),
            Query::Native(NativeQuery::Wrapped(inner)) => self.normalize(inner),
            Query::Text(_) | Query::Native(NativeQuery::Literal(_)) | Query::Template(_) => {}
        }
    }
}

/// Dispatches top-level queries to the right compilation path.
///
/// - criteria are compiled, filter tree included
/// - text is wrapped as an opaque pass-through query
/// - native literal trees are returned unchanged
/// - wrapped queries are dispatched in turn
///
/// Search templates are executed by the engine and cannot be compiled.
pub struct QueryFacade<R: FieldResolver> {
    resolver: R,
    config: CompilerConfig,
}

impl<R: FieldResolver> QueryFacade<R> {
    /// Creates a facade with the default configuration.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            config: CompilerConfig::default(),
        }
    }

    /// Creates a facade with an explicit configuration.
    pub fn with_config(resolver: R, config: CompilerConfig) -> CriteriaResult<Self> {
        config.validate()?;
        Ok(Self { resolver, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Returns a compiler sharing this facade's resolver and configuration.
    ///
    /// Relationship sub-queries compiled by it are dispatched through the
    /// facade.
    pub fn compiler(&self) -> CriteriaQueryCompiler<'_> {
        CriteriaQueryCompiler::new(&self.resolver, &self.config).with_sub_queries(self)
    }

    /// Dispatches `query`, applying `normalizer` first.
    ///
    /// The caller's query is never modified; the normalizer works on a copy.
    pub fn dispatch(
        &self,
        query: &Query,
        normalizer: Option<&dyn QueryNormalizer>,
    ) -> CriteriaResult<Option<QueryNode>> {
        debug!(kind = query.kind(), "dispatching query");

        match normalizer {
            Some(normalizer) => {
                let mut query = query.clone();
                normalizer.normalize(&mut query);
                self.dispatch_at(&query, 0)
            }
            None => self.dispatch_at(query, 0),
        }
    }

    fn dispatch_at(&self, query: &Query, depth: usize) -> CriteriaResult<Option<QueryNode>> {
        match query {
            Query::Criteria(criteria) => self.compiler().build_at(criteria, depth),
            Query::Text(source) => Ok(Some(QueryNode::Wrapper(WrapperQuery {
                query: source.clone(),
            }))),
            Query::Native(NativeQuery::Literal(node)) => Ok(Some(node.clone())),
            Query::Native(NativeQuery::Wrapped(inner)) => self.dispatch_at(inner, depth),
            Query::Template(_) => Err(CriteriaError::UnsupportedQueryType {
                query_type: query.kind().to_string(),
            }),
        }
    }
}

impl<R: FieldResolver> SubQueryCompiler for QueryFacade<R> {
    fn compile_sub_query(&self, query: &Query, depth: usize) -> CriteriaResult<Option<QueryNode>> {
        self.dispatch_at(query, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HasChild, IdentityFieldResolver, SearchTemplate};

    fn facade() -> QueryFacade<IdentityFieldResolver> {
        QueryFacade::new(IdentityFieldResolver)
    }

    #[test]
    fn test_text_is_wrapped() {
        let node = facade()
            .dispatch(&Query::text(r#"{"term":{"a":"b"}}"#), None)
            .unwrap()
            .unwrap();
        assert_eq!(
            node,
            QueryNode::Wrapper(WrapperQuery {
                query: r#"{"term":{"a":"b"}}"#.to_string()
            })
        );
    }

    #[test]
    fn test_native_literal_is_unchanged() {
        let literal = QueryNode::match_all().with_boost(Some(1.5));
        let node = facade()
            .dispatch(&literal.clone().into(), None)
            .unwrap()
            .unwrap();
        assert_eq!(node, literal);
    }

    #[test]
    fn test_wrapped_query_recurses() {
        let query = Query::wrapped(Query::wrapped(Query::text("{}")));
        let node = facade().dispatch(&query, None).unwrap().unwrap();
        assert_eq!(node.query_type(), "wrapper");
    }

    #[test]
    fn test_template_is_unsupported() {
        let query = Query::Template(SearchTemplate {
            id: "by-title".to_string(),
            ..Default::default()
        });
        let err = facade().dispatch(&query, None).unwrap_err();
        assert_eq!(
            err,
            CriteriaError::UnsupportedQueryType {
                query_type: "template".to_string()
            }
        );
    }

    #[test]
    fn test_normalizer_renames_before_dispatch() {
        let query: Query = Criteria::where_field("title").is("rust").into();
        let normalizer = PropertyNameNormalizer::new().with_name("title", "doc_title");
        let node = facade()
            .dispatch(&query, Some(&normalizer))
            .unwrap()
            .unwrap();
        assert_eq!(
            node.to_json()["bool"]["must"][0]["query_string"]["fields"],
            serde_json::json!(["doc_title"])
        );

        // The caller's query is untouched
        let Query::Criteria(criteria) = &query else {
            panic!("expected criteria");
        };
        assert_eq!(criteria.nodes()[0].field().unwrap().name, "title");
    }

    #[test]
    fn test_normalizer_reaches_relationship_queries() {
        let query: Query = Criteria::where_field("_")
            .has_child(HasChild::new(
                "answer",
                Criteria::where_field("body").is("x").into(),
            ))
            .into();
        let normalizer = PropertyNameNormalizer::new().with_name("body", "answer_body");
        let node = facade()
            .dispatch(&query, Some(&normalizer))
            .unwrap()
            .unwrap();
        let rendered = node.to_json();
        assert_eq!(
            rendered["bool"]["must"][0]["has_child"]["query"]["bool"]["must"][0]["query_string"]
                ["fields"],
            serde_json::json!(["answer_body"])
        );
    }

    #[test]
    fn test_closure_normalizer() {
        let uppercase = |query: &mut Query| {
            if let Query::Text(source) = query {
                *source = source.to_uppercase();
            }
        };
        let node = facade()
            .dispatch(&Query::text("abc"), Some(&uppercase))
            .unwrap()
            .unwrap();
        assert_eq!(
            node,
            QueryNode::Wrapper(WrapperQuery {
                query: "ABC".to_string()
            })
        );
    }

    #[test]
    fn test_relationship_sub_query_can_be_text() {
        let query: Query = Criteria::where_field("_")
            .has_child(HasChild::new("answer", Query::text("{}")))
            .into();
        let node = facade().dispatch(&query, None).unwrap().unwrap();
        assert_eq!(
            node.to_json()["bool"]["must"][0]["has_child"]["query"]["wrapper"]["query"],
            serde_json::json!("e30=")
        );
    }
}
