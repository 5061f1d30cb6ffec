//! Rendering of query trees into the engine's query DSL.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::types::InnerHits;

use super::node::{GeoLocation, QueryNode, RangeQuery};

impl QueryNode {
    /// Renders the tree as engine query DSL JSON.
    pub fn to_json(&self) -> Value {
        match self {
            QueryNode::MatchAll(q) => {
                let mut body = json!({});
                insert_boost(&mut body, q.boost);
                json!({ "match_all": body })
            }
            QueryNode::Bool(q) => {
                let mut body = Map::new();
                for (key, clauses) in [
                    ("must", &q.must),
                    ("should", &q.should),
                    ("must_not", &q.must_not),
                    ("filter", &q.filter),
                ] {
                    if !clauses.is_empty() {
                        body.insert(
                            key.to_string(),
                            Value::Array(clauses.iter().map(QueryNode::to_json).collect()),
                        );
                    }
                }
                if let Some(minimum) = q.minimum_should_match {
                    body.insert("minimum_should_match".to_string(), json!(minimum));
                }
                let mut body = Value::Object(body);
                insert_boost(&mut body, q.boost);
                json!({ "bool": body })
            }
            QueryNode::QueryString(q) => {
                let mut body = json!({
                    "query": q.query,
                    "fields": q.fields,
                    "default_operator": q.default_operator.to_string(),
                });
                if q.analyze_wildcard {
                    body["analyze_wildcard"] = json!(true);
                }
                insert_boost(&mut body, q.boost);
                json!({ "query_string": body })
            }
            QueryNode::Match(q) => {
                let mut body = json!({
                    "query": q.query,
                    "operator": q.operator.to_string(),
                });
                insert_boost(&mut body, q.boost);
                json!({ "match": { q.field.as_str(): body } })
            }
            QueryNode::Fuzzy(q) => {
                let mut body = json!({ "value": q.value });
                if let Some(ref fuzziness) = q.fuzziness {
                    body["fuzziness"] = json!(fuzziness);
                }
                insert_boost(&mut body, q.boost);
                json!({ "fuzzy": { q.field.as_str(): body } })
            }
            QueryNode::Range(q) => json!({ "range": { q.field.as_str(): range_body(q) } }),
            QueryNode::Terms(q) => {
                let mut body = json!({ q.field.as_str(): q.values });
                insert_boost(&mut body, q.boost);
                json!({ "terms": body })
            }
            QueryNode::Exists(q) => {
                let mut body = json!({ "field": q.field });
                insert_boost(&mut body, q.boost);
                json!({ "exists": body })
            }
            QueryNode::Wildcard(q) => {
                let mut body = json!({ "value": q.value });
                insert_boost(&mut body, q.boost);
                json!({ "wildcard": { q.field.as_str(): body } })
            }
            QueryNode::Regexp(q) => {
                let mut body = json!({ "value": q.value });
                insert_boost(&mut body, q.boost);
                json!({ "regexp": { q.field.as_str(): body } })
            }
            QueryNode::Nested(q) => {
                let mut body = json!({
                    "path": q.path,
                    "query": q.query.to_json(),
                    "score_mode": q.score_mode.to_string(),
                });
                insert_boost(&mut body, q.boost);
                json!({ "nested": body })
            }
            QueryNode::HasChild(q) => {
                let mut body = json!({
                    "type": q.child_type,
                    "query": q.query.to_json(),
                    "score_mode": q.score_mode.to_string(),
                });
                if let Some(ref inner_hits) = q.inner_hits {
                    body["inner_hits"] = inner_hits_body(inner_hits);
                }
                insert_boost(&mut body, q.boost);
                json!({ "has_child": body })
            }
            QueryNode::HasParent(q) => {
                let mut body = json!({
                    "parent_type": q.parent_type,
                    "query": q.query.to_json(),
                    "score": q.score,
                });
                if let Some(ref inner_hits) = q.inner_hits {
                    body["inner_hits"] = inner_hits_body(inner_hits);
                }
                insert_boost(&mut body, q.boost);
                json!({ "has_parent": body })
            }
            QueryNode::GeoDistance(q) => json!({
                "geo_distance": {
                    "distance": q.distance,
                    "distance_type": q.distance_type.to_string(),
                    q.field.as_str(): location(&q.point),
                }
            }),
            QueryNode::GeoBoundingBox(q) => json!({
                "geo_bounding_box": {
                    q.field.as_str(): {
                        "top_left": location(&q.top_left),
                        "bottom_right": location(&q.bottom_right),
                    }
                }
            }),
            QueryNode::GeoShape(q) => json!({
                "geo_shape": {
                    q.field.as_str(): {
                        "shape": Value::Object(q.shape.clone()),
                        "relation": q.relation.to_string(),
                    }
                }
            }),
            // The engine expects wrapper sources base64-encoded
            QueryNode::Wrapper(q) => json!({
                "wrapper": { "query": STANDARD.encode(q.query.as_bytes()) }
            }),
        }
    }
}

impl Serialize for QueryNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn insert_boost(body: &mut Value, boost: Option<f32>) {
    if let (Some(boost), Value::Object(map)) = (boost, body) {
        map.insert("boost".to_string(), json!(boost));
    }
}

fn range_body(q: &RangeQuery) -> Value {
    let mut body = Map::new();
    for (key, bound) in [("gt", &q.gt), ("gte", &q.gte), ("lt", &q.lt), ("lte", &q.lte)] {
        if let Some(bound) = bound {
            body.insert(key.to_string(), bound.clone());
        }
    }
    let mut body = Value::Object(body);
    insert_boost(&mut body, q.boost);
    body
}

fn location(location: &GeoLocation) -> Value {
    match location {
        GeoLocation::LatLon(point) => json!({ "lat": point.lat, "lon": point.lon }),
        GeoLocation::Text(text) | GeoLocation::Geohash(text) => json!(text),
    }
}

fn inner_hits_body(inner_hits: &InnerHits) -> Value {
    let mut body = Map::new();
    if let Some(ref name) = inner_hits.name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(from) = inner_hits.from {
        body.insert("from".to_string(), json!(from));
    }
    if let Some(size) = inner_hits.size {
        body.insert("size".to_string(), json!(size));
    }
    Value::Object(body)
}
