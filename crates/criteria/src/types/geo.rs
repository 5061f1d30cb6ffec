//! Geo value types accepted by filter-context operators.
//!
//! Points arrive in several shapes: structured [`GeoPoint`]s, cartesian
//! [`Point`]s, `"lat,lon"` text or geohash text. Distances arrive either as a
//! structured [`Distance`] or as engine-native text such as `"12km"`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CriteriaError, CriteriaResult};

const GEOHASH_ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

static LAT_LON_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*-?\d+(\.\d+)?\s*,\s*-?\d+(\.\d+)?\s*$").expect("valid lat/lon pattern")
});

static GEOHASH_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9b-hjkmnp-z]{1,12}$").expect("valid geohash pattern"));

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Renders the point as `"lat,lon"` text.
    pub fn to_lat_lon_text(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

/// A cartesian point where `x` is the longitude and `y` the latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
}

impl From<Point> for GeoPoint {
    fn from(point: Point) -> Self {
        GeoPoint::new(point.y, point.x)
    }
}

/// An explicit bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBox {
    /// North-west corner.
    pub top_left: GeoPoint,
    /// South-east corner.
    pub bottom_right: GeoPoint,
}

impl GeoBox {
    /// Creates a box from its corners.
    pub fn new(top_left: GeoPoint, bottom_right: GeoPoint) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }
}

/// Distance units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Kilometers (`km`).
    Kilometers,
    /// Miles (`mi`).
    Miles,
    /// Unitless distance. Cannot be rendered for the engine.
    Neutral,
}

impl DistanceUnit {
    /// Returns the two-letter unit code used in distance text.
    pub fn code(&self) -> CriteriaResult<&'static str> {
        match self {
            DistanceUnit::Kilometers => Ok("km"),
            DistanceUnit::Miles => Ok("mi"),
            DistanceUnit::Neutral => Err(CriteriaError::unsupported_operator(
                self,
                "distance unit",
            )),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Kilometers => write!(f, "kilometers"),
            DistanceUnit::Miles => write!(f, "miles"),
            DistanceUnit::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "km" | "kilometers" => Ok(DistanceUnit::Kilometers),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            "neutral" => Ok(DistanceUnit::Neutral),
            _ => Err(CriteriaError::unsupported_operator(s, "distance unit")),
        }
    }
}

/// A distance with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    /// Magnitude.
    pub value: f64,
    /// Unit.
    pub unit: DistanceUnit,
}

impl Distance {
    /// Creates a distance.
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    /// Kilometers shorthand.
    pub fn km(value: f64) -> Self {
        Self::new(value, DistanceUnit::Kilometers)
    }

    /// Miles shorthand.
    pub fn miles(value: f64) -> Self {
        Self::new(value, DistanceUnit::Miles)
    }
}

/// Topological relation for geo shape filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoShapeRelation {
    /// Shapes share any point.
    Intersects,
    /// Shapes share no point.
    Disjoint,
    /// Indexed shape lies within the query shape.
    Within,
    /// Indexed shape contains the query shape.
    Contains,
}

impl fmt::Display for GeoShapeRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoShapeRelation::Intersects => write!(f, "intersects"),
            GeoShapeRelation::Disjoint => write!(f, "disjoint"),
            GeoShapeRelation::Within => write!(f, "within"),
            GeoShapeRelation::Contains => write!(f, "contains"),
        }
    }
}

impl FromStr for GeoShapeRelation {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "intersects" => Ok(GeoShapeRelation::Intersects),
            "disjoint" => Ok(GeoShapeRelation::Disjoint),
            "within" => Ok(GeoShapeRelation::Within),
            "contains" => Ok(GeoShapeRelation::Contains),
            _ => Err(CriteriaError::unsupported_operator(s, "geo shape relation")),
        }
    }
}

/// A GeoJSON geometry. Coordinates are `[lon, lat]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    /// A single position.
    Point {
        /// `[lon, lat]`.
        coordinates: [f64; 2],
    },
    /// Several positions.
    MultiPoint {
        /// Positions.
        coordinates: Vec<[f64; 2]>,
    },
    /// A line through positions.
    LineString {
        /// Positions.
        coordinates: Vec<[f64; 2]>,
    },
    /// Several lines.
    MultiLineString {
        /// Lines.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    /// A polygon: exterior ring followed by holes.
    Polygon {
        /// Rings.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    /// Several polygons.
    MultiPolygon {
        /// Polygons.
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
    /// Heterogeneous collection.
    GeometryCollection {
        /// Member geometries.
        geometries: Vec<GeoJson>,
    },
}

impl GeoJson {
    /// Returns the GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJson::Point { .. } => "Point",
            GeoJson::MultiPoint { .. } => "MultiPoint",
            GeoJson::LineString { .. } => "LineString",
            GeoJson::MultiLineString { .. } => "MultiLineString",
            GeoJson::Polygon { .. } => "Polygon",
            GeoJson::MultiPolygon { .. } => "MultiPolygon",
            GeoJson::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Converts the geometry into a generic map, passed through verbatim to
    /// the engine.
    pub fn to_map(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "geometry serialized to non-object: {}",
                other
            ))),
        }
    }
}

/// Returns true if `text` is a `"lat,lon"` pair.
pub fn is_lat_lon_text(text: &str) -> bool {
    LAT_LON_TEXT.is_match(text)
}

/// Returns true if `text` looks like a geohash.
pub fn is_geohash(text: &str) -> bool {
    GEOHASH_TEXT.is_match(text)
}

/// Decodes a geohash into the center point of its cell.
///
/// Returns `None` for empty input or characters outside the geohash alphabet.
pub fn decode_geohash(hash: &str) -> Option<GeoPoint> {
    if hash.is_empty() {
        return None;
    }

    let (mut lat_lo, mut lat_hi) = (-90.0_f64, 90.0_f64);
    let (mut lon_lo, mut lon_hi) = (-180.0_f64, 180.0_f64);
    let mut even = true;

    for byte in hash.bytes() {
        let index = GEOHASH_ALPHABET.iter().position(|&c| c == byte)?;
        for shift in (0..5).rev() {
            let bit = (index >> shift) & 1 == 1;
            if even {
                let mid = (lon_lo + lon_hi) / 2.0;
                if bit {
                    lon_lo = mid;
                } else {
                    lon_hi = mid;
                }
            } else {
                let mid = (lat_lo + lat_hi) / 2.0;
                if bit {
                    lat_lo = mid;
                } else {
                    lat_hi = mid;
                }
            }
            even = !even;
        }
    }

    Some(GeoPoint::new(
        (lat_lo + lat_hi) / 2.0,
        (lon_lo + lon_hi) / 2.0,
    ))
}
