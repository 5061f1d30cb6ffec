//! Field references and field resolution.
//!
//! A [`Field`] is the logical reference a criteria node is scoped to. Before
//! predicates are built, a [`FieldResolver`] turns it into a [`ResolvedField`]
//! carrying the wire name, the declared type and the nested path.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared mapping type of a field.
///
/// Only the distinction between exact (`keyword`) and analyzed fields changes
/// compilation today; the other tags are carried for resolvers and callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Analyzed full-text field.
    Text,
    /// Exact-value field.
    Keyword,
    /// Integral number.
    Long,
    /// Integral number (32-bit).
    Integer,
    /// Floating point number.
    Double,
    /// Date or date-time.
    Date,
    /// Boolean.
    Boolean,
    /// Geo point.
    GeoPoint,
    /// Geo shape.
    GeoShape,
    /// Nested object.
    Nested,
    /// Plain object.
    Object,
}

impl FieldType {
    /// Returns true if values of this type are matched exactly, without analysis.
    pub fn is_keyword(&self) -> bool {
        matches!(self, FieldType::Keyword)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Keyword => write!(f, "keyword"),
            FieldType::Long => write!(f, "long"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Double => write!(f, "double"),
            FieldType::Date => write!(f, "date"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::GeoPoint => write!(f, "geo_point"),
            FieldType::GeoShape => write!(f, "geo_shape"),
            FieldType::Nested => write!(f, "nested"),
            FieldType::Object => write!(f, "object"),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "keyword" => Ok(FieldType::Keyword),
            "long" => Ok(FieldType::Long),
            "integer" => Ok(FieldType::Integer),
            "double" => Ok(FieldType::Double),
            "date" => Ok(FieldType::Date),
            "boolean" => Ok(FieldType::Boolean),
            "geo_point" => Ok(FieldType::GeoPoint),
            "geo_shape" => Ok(FieldType::GeoShape),
            "nested" => Ok(FieldType::Nested),
            "object" => Ok(FieldType::Object),
            _ => Err(format!("unknown field type: {}", s)),
        }
    }
}

/// A logical field reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Field name, possibly dotted (`address.city`).
    pub name: String,
    /// Declared type, if known at the call site.
    #[serde(default)]
    pub field_type: Option<FieldType>,
    /// Nested document path the field lives under (`address`).
    #[serde(default)]
    pub path: Option<String>,
}

impl Field {
    /// Creates an untyped, non-nested field reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            path: None,
        }
    }

    /// Sets the declared type.
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Sets the nested path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Convenience constructor for a keyword field.
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::new(name).with_type(FieldType::Keyword)
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::new(name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A field after resolution against the index mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    /// Name as it appears in the engine's documents.
    pub name: String,
    /// Declared type tag.
    pub field_type: Option<FieldType>,
    /// Nested path requiring a nested envelope, if any.
    pub nested_path: Option<String>,
}

impl ResolvedField {
    /// Returns true if IN/NOT_IN on this field should use exact term sets.
    pub fn is_keyword(&self) -> bool {
        self.field_type.map(|t| t.is_keyword()).unwrap_or(false)
    }
}

/// Maps logical field references to their engine representation.
///
/// Implementations must be pure: the compiler may call them any number of
/// times per compilation, from any thread.
pub trait FieldResolver: Send + Sync {
    /// Resolves a logical field reference.
    fn resolve(&self, field: &Field) -> ResolvedField;
}

/// Resolver that takes every field reference at face value.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFieldResolver;

impl FieldResolver for IdentityFieldResolver {
    fn resolve(&self, field: &Field) -> ResolvedField {
        ResolvedField {
            name: field.name.clone(),
            field_type: field.field_type,
            nested_path: field.path.clone(),
        }
    }
}

/// Mapping entry for a single logical property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Name in the engine's documents.
    pub name: String,
    /// Declared type tag.
    #[serde(default)]
    pub field_type: Option<FieldType>,
    /// Nested path.
    #[serde(default)]
    pub nested_path: Option<String>,
}

/// Resolver backed by an explicit property-to-mapping table.
///
/// Unmapped fields fall back to [`IdentityFieldResolver`] behavior. Type and
/// path declared on the [`Field`] itself win over the table, so a caller can
/// always narrow a single reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappedFieldResolver {
    mappings: HashMap<String, FieldMapping>,
}

impl MappedFieldResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping for a logical property.
    pub fn with_mapping(mut self, property: impl Into<String>, mapping: FieldMapping) -> Self {
        self.mappings.insert(property.into(), mapping);
        self
    }

    /// Adds a mapping for a keyword property stored under its own name.
    pub fn with_keyword(self, property: impl Into<String>) -> Self {
        let property = property.into();
        let mapping = FieldMapping {
            name: property.clone(),
            field_type: Some(FieldType::Keyword),
            nested_path: None,
        };
        self.with_mapping(property, mapping)
    }

    /// Returns the number of mapped properties.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if no properties are mapped.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl FieldResolver for MappedFieldResolver {
    fn resolve(&self, field: &Field) -> ResolvedField {
        match self.mappings.get(&field.name) {
            Some(mapping) => ResolvedField {
                name: mapping.name.clone(),
                field_type: field.field_type.or(mapping.field_type),
                nested_path: field.path.clone().or_else(|| mapping.nested_path.clone()),
            },
            None => IdentityFieldResolver.resolve(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_round_trip_names() {
        assert_eq!("keyword".parse::<FieldType>(), Ok(FieldType::Keyword));
        assert_eq!("GEO_POINT".parse::<FieldType>(), Ok(FieldType::GeoPoint));
        assert_eq!(FieldType::GeoShape.to_string(), "geo_shape");
        assert!("blob".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_identity_resolver() {
        let field = Field::keyword("tags").with_path("meta");
        let resolved = IdentityFieldResolver.resolve(&field);
        assert_eq!(resolved.name, "tags");
        assert!(resolved.is_keyword());
        assert_eq!(resolved.nested_path.as_deref(), Some("meta"));
    }

    #[test]
    fn test_mapped_resolver_renames_and_types() {
        let resolver = MappedFieldResolver::new().with_mapping(
            "city",
            FieldMapping {
                name: "address.city".to_string(),
                field_type: Some(FieldType::Keyword),
                nested_path: Some("address".to_string()),
            },
        );

        let resolved = resolver.resolve(&Field::new("city"));
        assert_eq!(resolved.name, "address.city");
        assert!(resolved.is_keyword());
        assert_eq!(resolved.nested_path.as_deref(), Some("address"));

        let unmapped = resolver.resolve(&Field::new("name"));
        assert_eq!(unmapped.name, "name");
        assert!(!unmapped.is_keyword());
    }

    #[test]
    fn test_field_declaration_overrides_mapping() {
        let resolver = MappedFieldResolver::new().with_keyword("status");
        let resolved = resolver.resolve(&Field::new("status").with_type(FieldType::Text));
        assert_eq!(resolved.field_type, Some(FieldType::Text));
    }
}
