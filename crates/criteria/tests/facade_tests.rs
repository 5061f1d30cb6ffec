//! Query facade integration tests.

mod common;

use common::*;
use helios_criteria::dsl::WrapperQuery;
use helios_criteria::search::{PropertyNameNormalizer, QueryFacade};
use helios_criteria::types::{
    Criteria, Distance, GeoPoint, HasChild, InnerHits, NativeQuery, Query, ScoreMode,
    SearchTemplate,
};
use helios_criteria::{CompilerConfig, CriteriaError, QueryNode};
use serde_json::json;

fn facade() -> QueryFacade<helios_criteria::types::MappedFieldResolver> {
    QueryFacade::new(article_resolver())
}

#[test]
fn test_criteria_dispatch_merges_filter() {
    let criteria = Criteria::where_field("title")
        .is("rust")
        .and("location")
        .within(GeoPoint::new(52.52, 13.40), Distance::km(1.0));
    let query = facade()
        .dispatch(&Query::Criteria(criteria), None)
        .unwrap()
        .unwrap();
    assert_bucket_sizes(&query, (1, 0, 0, 1));
}

#[test]
fn test_empty_criteria_dispatches_to_nothing() {
    let query = facade()
        .dispatch(&Query::Criteria(Criteria::new()), None)
        .unwrap();
    assert_eq!(query, None);
}

#[test]
fn test_text_and_native_variants() {
    let facade = facade();

    let wrapped = facade
        .dispatch(&Query::text(r#"{"match_all":{}}"#), None)
        .unwrap()
        .unwrap();
    assert_eq!(
        wrapped.to_json(),
        json!({ "wrapper": { "query": "eyJtYXRjaF9hbGwiOnt9fQ==" } })
    );

    let literal = QueryNode::match_all();
    let native = Query::Native(NativeQuery::Literal(literal.clone()));
    assert_eq!(facade.dispatch(&native, None).unwrap(), Some(literal));

    let nested = Query::wrapped(Query::Criteria(Criteria::where_field("title").is("x")));
    let compiled = facade.dispatch(&nested, None).unwrap().unwrap();
    assert_bucket_sizes(&compiled, (1, 0, 0, 0));
}

#[test]
fn test_template_names_variant() {
    let err = facade()
        .dispatch(&Query::Template(SearchTemplate::default()), None)
        .unwrap_err();
    assert!(err.is_query_error());
    assert_eq!(err.to_string(), "unsupported query type: template");
}

#[test]
fn test_wrapped_template_is_still_unsupported() {
    let query = Query::wrapped(Query::Template(SearchTemplate::default()));
    let err = facade().dispatch(&query, None).unwrap_err();
    assert!(matches!(err, CriteriaError::UnsupportedQueryType { .. }));
}

#[test]
fn test_normalizer_runs_before_dispatch() {
    let normalizer = PropertyNameNormalizer::new()
        .with_name("headline", "title")
        .with_name("labels", "tags");
    let query: Query = Criteria::where_field("headline")
        .is("x")
        .and_criteria(Criteria::where_field("labels").in_values(vec!["a"]))
        .into();

    let compiled = facade()
        .dispatch(&query, Some(&normalizer))
        .unwrap()
        .unwrap();
    let rendered = compiled.to_json();
    assert_eq!(
        rendered["bool"]["must"][0]["query_string"]["fields"],
        json!(["title"])
    );
    // Renamed to a keyword field, so the mapping picks exact terms
    assert_eq!(
        rendered["bool"]["must"][1]["bool"]["must"][0]["bool"]["must"][0],
        json!({ "terms": { "tags": ["a"] } })
    );
}

#[test]
fn test_relationship_sub_queries_go_through_facade() {
    let child = HasChild::new(
        "comment",
        Query::wrapped(Query::text(r#"{"term":{"spam":false}}"#)),
    )
    .with_inner_hits(InnerHits::named("comments").with_window(0, 5));
    let query: Query = Criteria::where_field("_").has_child(child).into();

    let compiled = facade().dispatch(&query, None).unwrap().unwrap();
    let has_child = &compiled.to_json()["bool"]["must"][0]["has_child"];
    assert_eq!(has_child["type"], json!("comment"));
    assert_eq!(has_child["score_mode"], json!("none"));
    assert_eq!(
        has_child["inner_hits"],
        json!({ "name": "comments", "from": 0, "size": 5 })
    );
    assert!(has_child["query"]["wrapper"]["query"].is_string());
}

#[test]
fn test_configured_child_score_mode() {
    let config = CompilerConfig {
        child_score_mode: ScoreMode::Sum,
        ..Default::default()
    };
    let facade = QueryFacade::with_config(article_resolver(), config).unwrap();
    let query: Query = Criteria::where_field("_")
        .has_child(HasChild::new("comment", Query::text("{}")))
        .into();
    let compiled = facade.dispatch(&query, None).unwrap().unwrap();
    assert_eq!(
        compiled.to_json()["bool"]["must"][0]["has_child"]["score_mode"],
        json!("sum")
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = CompilerConfig {
        max_depth: 0,
        ..Default::default()
    };
    let err = QueryFacade::with_config(article_resolver(), config).err().unwrap();
    assert!(!err.is_query_error());
}

#[test]
fn test_relationship_depth_is_bounded() {
    let config = CompilerConfig {
        max_depth: 2,
        ..Default::default()
    };
    let facade = QueryFacade::with_config(article_resolver(), config).unwrap();

    let mut query = Query::Criteria(Criteria::where_field("title").is("leaf"));
    for _ in 0..4 {
        query = Criteria::where_field("_")
            .has_child(HasChild::new("child", query))
            .into();
    }
    let err = facade.dispatch(&query, None).unwrap_err();
    assert!(matches!(err, CriteriaError::InvalidArgument { .. }));
}

#[test]
fn test_dispatch_is_thread_safe() {
    let facade = std::sync::Arc::new(facade());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let facade = std::sync::Arc::clone(&facade);
            std::thread::spawn(move || {
                let query = Query::Criteria(Criteria::where_field("title").is(format!("t{}", i)));
                facade.dispatch(&query, None).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().is_some());
    }
}

#[test]
fn test_text_passes_through_unparsed() {
    let node = facade()
        .dispatch(&Query::text("not even json"), None)
        .unwrap()
        .unwrap();
    assert_eq!(
        node,
        QueryNode::Wrapper(WrapperQuery {
            query: "not even json".to_string()
        })
    );
}
