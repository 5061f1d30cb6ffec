//! Geo and spatial filter predicates.
//!
//! Every predicate built here is non-scoring and lands in the filter tree.
//! Negation is applied by the filter compiler, never here.

use tracing::{trace, warn};

use crate::dsl::{
    GeoBoundingBoxQuery, GeoDistanceQuery, GeoDistanceType, GeoLocation, GeoShapeQuery, QueryNode,
};
use crate::error::{CriteriaError, CriteriaResult};
use crate::types::{
    CriteriaEntry, CriteriaValue, GeoBox, GeoShapeRelation, decode_geohash, is_geohash,
    is_lat_lon_text,
};

use super::escape::distance_to_text;
use super::operators::Operator;

/// Builds the filter predicate for one filter-context entry.
pub fn build_filter(field: &str, entry: &CriteriaEntry) -> CriteriaResult<QueryNode> {
    entry.operator.validate_value(field, &entry.value)?;

    match entry.operator {
        Operator::Within => match entry.value.as_list() {
            Some([point, distance]) => distance_filter(field, point, distance),
            _ => Err(CriteriaError::invalid_argument(
                field,
                entry.operator,
                "expected a point followed by a distance",
            )),
        },
        Operator::BBox => match &entry.value {
            CriteriaValue::List(values) => bounding_box_filter(field, values),
            single => bounding_box_filter(field, std::slice::from_ref(single)),
        },
        Operator::GeoIntersects
        | Operator::GeoIsDisjoint
        | Operator::GeoWithin
        | Operator::GeoContains => {
            geo_shape_filter(field, &entry.value, shape_relation(entry.operator)?)
        }
        other => Err(CriteriaError::unsupported_operator(other, "filter context")),
    }
}

/// Maps a geo shape operator to its topological relation.
pub fn shape_relation(operator: Operator) -> CriteriaResult<GeoShapeRelation> {
    match operator {
        Operator::GeoIntersects => Ok(GeoShapeRelation::Intersects),
        Operator::GeoIsDisjoint => Ok(GeoShapeRelation::Disjoint),
        Operator::GeoWithin => Ok(GeoShapeRelation::Within),
        Operator::GeoContains => Ok(GeoShapeRelation::Contains),
        other => Err(CriteriaError::unsupported_operator(other, "geo shape relation")),
    }
}

/// Documents within `distance` of `point`.
///
/// `point` may be a [`GeoPoint`](crate::types::GeoPoint), a cartesian
/// [`Point`](crate::types::Point), `"lat,lon"` text or a geohash. `distance`
/// may be a [`Distance`](crate::types::Distance) or engine distance text.
/// Distances are always computed on the plane.
pub fn distance_filter(
    field: &str,
    point: &CriteriaValue,
    distance: &CriteriaValue,
) -> CriteriaResult<QueryNode> {
    let point = match point {
        CriteriaValue::GeoPoint(p) => GeoLocation::LatLon(*p),
        CriteriaValue::Point(p) => GeoLocation::LatLon((*p).into()),
        CriteriaValue::Text(text) if is_lat_lon_text(text) => GeoLocation::Text(text.clone()),
        CriteriaValue::Text(text) if is_geohash(text) => GeoLocation::Geohash(text.clone()),
        other => {
            return Err(CriteriaError::invalid_argument(
                field,
                Operator::Within,
                format!(
                    "expected a geo point, point, lat/lon text or geohash, got {}",
                    other.kind()
                ),
            ));
        }
    };

    let distance = match distance {
        CriteriaValue::Distance(d) => distance_to_text(d)?,
        CriteriaValue::Text(text) if !text.trim().is_empty() => text.clone(),
        other => {
            return Err(CriteriaError::invalid_argument(
                field,
                Operator::Within,
                format!("expected a distance or distance text, got {}", other.kind()),
            ));
        }
    };

    Ok(QueryNode::GeoDistance(GeoDistanceQuery {
        field: field.to_string(),
        point,
        distance,
        distance_type: GeoDistanceType::Plane,
    }))
}

/// Documents inside a bounding box.
///
/// Takes either one explicit [`GeoBox`] or two corners (top-left, then
/// bottom-right). Corner text may be `"lat,lon"` or a geohash; geohash
/// corners are decoded to `"lat,lon"` text before emission because the engine
/// rejects geohash bounding boxes.
pub fn bounding_box_filter(field: &str, values: &[CriteriaValue]) -> CriteriaResult<QueryNode> {
    let (top_left, bottom_right) = match values {
        [CriteriaValue::GeoBox(GeoBox {
            top_left,
            bottom_right,
        })] => (
            GeoLocation::LatLon(*top_left),
            GeoLocation::LatLon(*bottom_right),
        ),
        [top_left, bottom_right] => (corner(field, top_left)?, corner(field, bottom_right)?),
        _ => {
            return Err(CriteriaError::invalid_argument(
                field,
                Operator::BBox,
                format!(
                    "expected one bounding box or two corners, got {} value(s)",
                    values.len()
                ),
            ));
        }
    };

    Ok(QueryNode::GeoBoundingBox(GeoBoundingBoxQuery {
        field: field.to_string(),
        top_left,
        bottom_right,
    }))
}

fn corner(field: &str, value: &CriteriaValue) -> CriteriaResult<GeoLocation> {
    match value {
        CriteriaValue::GeoPoint(p) => Ok(GeoLocation::LatLon(*p)),
        CriteriaValue::Point(p) => Ok(GeoLocation::LatLon((*p).into())),
        CriteriaValue::Text(text) if is_lat_lon_text(text) => Ok(GeoLocation::Text(text.clone())),
        CriteriaValue::Text(text) if is_geohash(text) => match decode_geohash(text) {
            Some(point) => {
                warn!(
                    field = %field,
                    geohash = %text,
                    "decoding geohash bounding box corner client-side"
                );
                Ok(GeoLocation::Text(point.to_lat_lon_text()))
            }
            None => Err(CriteriaError::invalid_argument(
                field,
                Operator::BBox,
                format!("invalid geohash corner '{}'", text),
            )),
        },
        other => Err(CriteriaError::invalid_argument(
            field,
            Operator::BBox,
            format!(
                "expected a geo point, point, lat/lon text or geohash corner, got {}",
                other.kind()
            ),
        )),
    }
}

/// Documents whose shape stands in `relation` to `geometry`.
pub fn geo_shape_filter(
    field: &str,
    geometry: &CriteriaValue,
    relation: GeoShapeRelation,
) -> CriteriaResult<QueryNode> {
    let CriteriaValue::Geometry(geometry) = geometry else {
        return Err(CriteriaError::invalid_argument(
            field,
            relation,
            format!("expected a geometry, got {}", geometry.kind()),
        ));
    };

    let shape = geometry
        .to_map()
        .map_err(|e| CriteriaError::invalid_argument(field, relation, e.to_string()))?;
    trace!(field, shape = geometry.type_name(), %relation, "geo shape filter");

    Ok(QueryNode::GeoShape(GeoShapeQuery {
        field: field.to_string(),
        shape,
        relation,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Distance, GeoJson, GeoPoint, Point};
    use serde_json::json;

    #[test]
    fn test_distance_from_geo_point() {
        let node = distance_filter(
            "location",
            &GeoPoint::new(52.52, 13.40).into(),
            &Distance::km(5.0).into(),
        )
        .unwrap();
        assert_eq!(
            node.to_json(),
            json!({
                "geo_distance": {
                    "distance": "5km",
                    "distance_type": "plane",
                    "location": { "lat": 52.52, "lon": 13.40 }
                }
            })
        );
    }

    #[test]
    fn test_distance_from_cartesian_point_swaps_axes() {
        let node = distance_filter(
            "location",
            &Point { x: 13.4, y: 52.5 }.into(),
            &"3mi".into(),
        )
        .unwrap();
        let QueryNode::GeoDistance(q) = node else {
            panic!("expected geo distance");
        };
        assert_eq!(q.point, GeoLocation::LatLon(GeoPoint::new(52.5, 13.4)));
        assert_eq!(q.distance, "3mi");
    }

    #[test]
    fn test_distance_from_text_forms() {
        let node = distance_filter("location", &"52.5,13.4".into(), &"1km".into()).unwrap();
        assert_eq!(
            node.to_json()["geo_distance"]["location"],
            json!("52.5,13.4")
        );

        let node = distance_filter("location", &"u33dc0".into(), &"1km".into()).unwrap();
        let QueryNode::GeoDistance(q) = node else {
            panic!("expected geo distance");
        };
        assert_eq!(q.point, GeoLocation::Geohash("u33dc0".to_string()));
    }

    #[test]
    fn test_distance_rejects_bad_shapes() {
        let err = distance_filter("location", &42.into(), &"1km".into()).unwrap_err();
        assert_eq!(err.field(), Some("location"));

        let err =
            distance_filter("location", &GeoPoint::new(1.0, 2.0).into(), &5.into()).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidArgument { .. }));
    }

    #[test]
    fn test_bounding_box_from_box() {
        let geo_box = GeoBox::new(GeoPoint::new(10.0, -5.0), GeoPoint::new(0.0, 5.0));
        let node = bounding_box_filter("location", &[geo_box.into()]).unwrap();
        assert_eq!(
            node.to_json(),
            json!({
                "geo_bounding_box": {
                    "location": {
                        "top_left": { "lat": 10.0, "lon": -5.0 },
                        "bottom_right": { "lat": 0.0, "lon": 5.0 }
                    }
                }
            })
        );
    }

    #[test]
    fn test_bounding_box_decodes_geohash_corners() {
        let node = bounding_box_filter("location", &["s".into(), "7".into()]).unwrap();
        let QueryNode::GeoBoundingBox(q) = node else {
            panic!("expected bounding box");
        };
        // "s" covers [0, 45] x [0, 45], "7" covers [-45, 0] x [-45, 0]
        assert_eq!(q.top_left, GeoLocation::Text("22.5,22.5".to_string()));
        assert_eq!(q.bottom_right, GeoLocation::Text("-22.5,-22.5".to_string()));
    }

    #[test]
    fn test_bounding_box_arity() {
        let err = bounding_box_filter(
            "location",
            &["1,2".into(), "3,4".into(), "5,6".into()],
        )
        .unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidArgument { .. }));

        let err = bounding_box_filter("location", &["1,2".into()]).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidArgument { .. }));
    }

    #[test]
    fn test_geo_shape() {
        let polygon = GeoJson::Polygon {
            coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
        };
        let node =
            geo_shape_filter("area", &polygon.into(), GeoShapeRelation::Within).unwrap();
        assert_eq!(
            node.to_json(),
            json!({
                "geo_shape": {
                    "area": {
                        "shape": {
                            "type": "Polygon",
                            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                        },
                        "relation": "within"
                    }
                }
            })
        );
    }

    #[test]
    fn test_shape_relation_mapping() {
        assert_eq!(
            shape_relation(Operator::GeoIsDisjoint).unwrap(),
            GeoShapeRelation::Disjoint
        );
        assert!(matches!(
            shape_relation(Operator::Within),
            Err(CriteriaError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn test_build_filter_rejects_query_operators() {
        let entry = CriteriaEntry::new(Operator::Equals, "x");
        let err = build_filter("location", &entry).unwrap_err();
        assert!(matches!(err, CriteriaError::UnsupportedOperator { .. }));
    }
}
