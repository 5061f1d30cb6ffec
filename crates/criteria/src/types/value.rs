//! Values attached to criteria entries.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Number, Value};

use super::geo::{Distance, GeoBox, GeoJson, GeoPoint, Point};
use super::relationship::{HasChild, HasParent};

/// Coarse classification of a [`CriteriaValue`], used by the operator catalog
/// to check accepted shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Explicit absence of a value.
    Null,
    /// Text, number, boolean or date.
    Scalar,
    /// Ordered sequence of values.
    List,
    /// Structured geo point.
    GeoPoint,
    /// Cartesian point.
    Point,
    /// Structured distance.
    Distance,
    /// Explicit bounding box.
    GeoBox,
    /// GeoJSON geometry.
    Geometry,
    /// Has-child relationship.
    HasChild,
    /// Has-parent relationship.
    HasParent,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Scalar => "scalar",
            ValueKind::List => "sequence",
            ValueKind::GeoPoint => "geo point",
            ValueKind::Point => "point",
            ValueKind::Distance => "distance",
            ValueKind::GeoBox => "bounding box",
            ValueKind::Geometry => "geometry",
            ValueKind::HasChild => "has-child specification",
            ValueKind::HasParent => "has-parent specification",
        };
        write!(f, "{}", name)
    }
}

/// A value attached to a criteria entry.
///
/// `Null` is an explicit value, distinct from an omitted one: inside a
/// BETWEEN pair it means "no bound", inside an IN list it is a null term.
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaValue {
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integral number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// Instant, rendered as RFC 3339.
    DateTime(DateTime<Utc>),
    /// Calendar date, rendered as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Ordered sequence.
    List(Vec<CriteriaValue>),
    /// Structured geo point.
    GeoPoint(GeoPoint),
    /// Cartesian point.
    Point(Point),
    /// Structured distance.
    Distance(Distance),
    /// Explicit bounding box.
    GeoBox(GeoBox),
    /// GeoJSON geometry.
    Geometry(GeoJson),
    /// Has-child relationship.
    HasChild(HasChild),
    /// Has-parent relationship.
    HasParent(HasParent),
}

impl CriteriaValue {
    /// Returns the shape classification of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            CriteriaValue::Null => ValueKind::Null,
            CriteriaValue::Bool(_)
            | CriteriaValue::Integer(_)
            | CriteriaValue::Float(_)
            | CriteriaValue::Text(_)
            | CriteriaValue::DateTime(_)
            | CriteriaValue::Date(_) => ValueKind::Scalar,
            CriteriaValue::List(_) => ValueKind::List,
            CriteriaValue::GeoPoint(_) => ValueKind::GeoPoint,
            CriteriaValue::Point(_) => ValueKind::Point,
            CriteriaValue::Distance(_) => ValueKind::Distance,
            CriteriaValue::GeoBox(_) => ValueKind::GeoBox,
            CriteriaValue::Geometry(_) => ValueKind::Geometry,
            CriteriaValue::HasChild(_) => ValueKind::HasChild,
            CriteriaValue::HasParent(_) => ValueKind::HasParent,
        }
    }

    /// Returns true for [`CriteriaValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, CriteriaValue::Null)
    }

    /// Returns the elements of a sequence value.
    pub fn as_list(&self) -> Option<&[CriteriaValue]> {
        match self {
            CriteriaValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// Renders a scalar as the string the engine would see.
    ///
    /// Returns `None` for null, sequences and structured values.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CriteriaValue::Bool(b) => Some(b.to_string()),
            CriteriaValue::Integer(n) => Some(n.to_string()),
            CriteriaValue::Float(n) => Some(n.to_string()),
            CriteriaValue::Text(s) => Some(s.clone()),
            CriteriaValue::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            CriteriaValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            _ => None,
        }
    }

    /// Converts a scalar into a typed JSON value, keeping numbers numeric.
    ///
    /// Used for range bounds. Returns `None` for anything but scalars; a
    /// non-finite float is not representable and also yields `None`.
    pub fn to_scalar_json(&self) -> Option<Value> {
        match self {
            CriteriaValue::Bool(b) => Some(Value::Bool(*b)),
            CriteriaValue::Integer(n) => Some(Value::Number((*n).into())),
            CriteriaValue::Float(n) => Number::from_f64(*n).map(Value::Number),
            CriteriaValue::Text(_) | CriteriaValue::DateTime(_) | CriteriaValue::Date(_) => {
                self.to_text().map(Value::String)
            }
            _ => None,
        }
    }
}

impl From<&str> for CriteriaValue {
    fn from(value: &str) -> Self {
        CriteriaValue::Text(value.to_string())
    }
}

impl From<String> for CriteriaValue {
    fn from(value: String) -> Self {
        CriteriaValue::Text(value)
    }
}

impl From<bool> for CriteriaValue {
    fn from(value: bool) -> Self {
        CriteriaValue::Bool(value)
    }
}

impl From<i32> for CriteriaValue {
    fn from(value: i32) -> Self {
        CriteriaValue::Integer(value.into())
    }
}

impl From<i64> for CriteriaValue {
    fn from(value: i64) -> Self {
        CriteriaValue::Integer(value)
    }
}

impl From<u32> for CriteriaValue {
    fn from(value: u32) -> Self {
        CriteriaValue::Integer(value.into())
    }
}

impl From<f64> for CriteriaValue {
    fn from(value: f64) -> Self {
        CriteriaValue::Float(value)
    }
}

impl From<DateTime<Utc>> for CriteriaValue {
    fn from(value: DateTime<Utc>) -> Self {
        CriteriaValue::DateTime(value)
    }
}

impl From<NaiveDate> for CriteriaValue {
    fn from(value: NaiveDate) -> Self {
        CriteriaValue::Date(value)
    }
}

impl From<GeoPoint> for CriteriaValue {
    fn from(value: GeoPoint) -> Self {
        CriteriaValue::GeoPoint(value)
    }
}

impl From<Point> for CriteriaValue {
    fn from(value: Point) -> Self {
        CriteriaValue::Point(value)
    }
}

impl From<Distance> for CriteriaValue {
    fn from(value: Distance) -> Self {
        CriteriaValue::Distance(value)
    }
}

impl From<GeoBox> for CriteriaValue {
    fn from(value: GeoBox) -> Self {
        CriteriaValue::GeoBox(value)
    }
}

impl From<GeoJson> for CriteriaValue {
    fn from(value: GeoJson) -> Self {
        CriteriaValue::Geometry(value)
    }
}

impl From<HasChild> for CriteriaValue {
    fn from(value: HasChild) -> Self {
        CriteriaValue::HasChild(value)
    }
}

impl From<HasParent> for CriteriaValue {
    fn from(value: HasParent) -> Self {
        CriteriaValue::HasParent(value)
    }
}

impl<T: Into<CriteriaValue>> From<Vec<T>> for CriteriaValue {
    fn from(values: Vec<T>) -> Self {
        CriteriaValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CriteriaValue>> From<Option<T>> for CriteriaValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CriteriaValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_text_rendering() {
        assert_eq!(CriteriaValue::from(10.0).to_text().as_deref(), Some("10"));
        assert_eq!(CriteriaValue::from(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(CriteriaValue::from(true).to_text().as_deref(), Some("true"));
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            CriteriaValue::from(date).to_text().as_deref(),
            Some("2024-01-15")
        );
        assert!(CriteriaValue::Null.to_text().is_none());
    }

    #[test]
    fn test_scalar_json_keeps_numbers() {
        assert_eq!(CriteriaValue::from(10).to_scalar_json(), Some(Value::from(10)));
        assert_eq!(
            CriteriaValue::from("abc").to_scalar_json(),
            Some(Value::from("abc"))
        );
        assert!(CriteriaValue::from(f64::NAN).to_scalar_json().is_none());
        assert!(CriteriaValue::from(vec![1, 2]).to_scalar_json().is_none());
    }

    #[test]
    fn test_option_and_vec_conversion() {
        let value = CriteriaValue::from(vec![Some(10), None]);
        assert_eq!(
            value,
            CriteriaValue::List(vec![CriteriaValue::Integer(10), CriteriaValue::Null])
        );
        assert_eq!(value.kind(), ValueKind::List);
    }
}
