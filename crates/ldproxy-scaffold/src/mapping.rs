//! Native column type and geometry subtype normalization.

use serde::{Deserialize, Serialize};

/// Property type as understood by the feature provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PropertyType {
    String,
    Integer,
    DateTime,
    Float,
    Geometry,
    /// Unmapped native type, emitted as-is.
    Native(String),
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::String => "STRING",
            PropertyType::Integer => "INTEGER",
            PropertyType::DateTime => "DATETIME",
            PropertyType::Float => "FLOAT",
            PropertyType::Geometry => "GEOMETRY",
            PropertyType::Native(raw) => raw,
        }
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        match value {
            PropertyType::Native(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl From<String> for PropertyType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "STRING" => PropertyType::String,
            "INTEGER" => PropertyType::Integer,
            "DATETIME" => PropertyType::DateTime,
            "FLOAT" => PropertyType::Float,
            "GEOMETRY" => PropertyType::Geometry,
            _ => PropertyType::Native(value),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic subtype token meaning "no specific geometry type registered".
pub const GENERIC_GEOMETRY: &str = "GEOMETRY";

/// Map a native column type to a provider property type.
///
/// Matching ignores case and any parameter list, so `varchar(255)` is a
/// string. Unknown types pass through unchanged.
pub fn map_scalar_type(native_type: &str) -> PropertyType {
    let base = base_type_name(native_type);

    match base.as_str() {
        "VARCHAR" | "CHARACTER VARYING" | "CHAR" | "CHARACTER" | "TEXT" | "STRING"
        | "NVARCHAR" | "BPCHAR" | "CITEXT" => PropertyType::String,
        "TIMESTAMP"
        | "TIMESTAMPTZ"
        | "TIMESTAMP WITHOUT TIME ZONE"
        | "TIMESTAMP WITH TIME ZONE" => PropertyType::DateTime,
        "INTEGER" | "INT" | "INT2" | "INT4" | "INT8" | "SMALLINT" | "BIGINT" | "SERIAL"
        | "BIGSERIAL" | "SMALLSERIAL" => PropertyType::Integer,
        "DOUBLE PRECISION" | "DOUBLE_PRECISION" | "DOUBLE" | "FLOAT8" => PropertyType::Float,
        _ => PropertyType::Native(native_type.to_string()),
    }
}

/// Rewrite a catalog geometry subtype into the provider's token.
pub fn normalize_geometry_subtype(raw: &str) -> String {
    match raw {
        "MULTILINESTRING" => "MULTI_LINE_STRING".to_string(),
        "LINESTRING" => "LINE_STRING".to_string(),
        "MULTIPOLYGON" => "MULTI_POLYGON".to_string(),
        "MULTIPOINT" => "MULTI_POINT".to_string(),
        other => other.to_string(),
    }
}

// `timestamp(6) with time zone` -> `TIMESTAMP WITH TIME ZONE`
fn base_type_name(native_type: &str) -> String {
    let mut base = String::with_capacity(native_type.len());
    let mut depth = 0usize;
    for ch in native_type.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => base.push(ch.to_ascii_uppercase()),
            _ => {}
        }
    }
    base.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_family() {
        assert_eq!(map_scalar_type("VARCHAR"), PropertyType::String);
        assert_eq!(map_scalar_type("varchar(255)"), PropertyType::String);
        assert_eq!(map_scalar_type("TEXT"), PropertyType::String);
        assert_eq!(map_scalar_type("character varying(80)"), PropertyType::String);
    }

    #[test]
    fn test_timestamp_family() {
        assert_eq!(map_scalar_type("TIMESTAMP"), PropertyType::DateTime);
        assert_eq!(
            map_scalar_type("timestamp(6) with time zone"),
            PropertyType::DateTime
        );
        assert_eq!(map_scalar_type("TIMESTAMPTZ"), PropertyType::DateTime);
    }

    #[test]
    fn test_numeric_families() {
        assert_eq!(map_scalar_type("INTEGER"), PropertyType::Integer);
        assert_eq!(map_scalar_type("BIGINT"), PropertyType::Integer);
        assert_eq!(map_scalar_type("DOUBLE PRECISION"), PropertyType::Float);
        assert_eq!(map_scalar_type("DOUBLE_PRECISION"), PropertyType::Float);
    }

    #[test]
    fn test_unknown_type_passes_through() {
        assert_eq!(
            map_scalar_type("NUMERIC(10, 2)"),
            PropertyType::Native("NUMERIC(10, 2)".to_string())
        );
        assert_eq!(map_scalar_type("BOOLEAN").as_str(), "BOOLEAN");
        assert_eq!(map_scalar_type("DATE").as_str(), "DATE");
    }

    #[test]
    fn test_geometry_subtype_rewrites() {
        assert_eq!(normalize_geometry_subtype("MULTIPOLYGON"), "MULTI_POLYGON");
        assert_eq!(normalize_geometry_subtype("MULTILINESTRING"), "MULTI_LINE_STRING");
        assert_eq!(normalize_geometry_subtype("LINESTRING"), "LINE_STRING");
        assert_eq!(normalize_geometry_subtype("MULTIPOINT"), "MULTI_POINT");
        assert_eq!(normalize_geometry_subtype("POINT"), "POINT");
        assert_eq!(normalize_geometry_subtype("POLYGON"), "POLYGON");
    }

    #[test]
    fn test_property_type_serializes_as_token() {
        assert_eq!(serde_yaml::to_string(&PropertyType::DateTime).unwrap(), "DATETIME\n");
        assert_eq!(
            serde_yaml::to_string(&PropertyType::Native("BOOLEAN".to_string())).unwrap(),
            "BOOLEAN\n"
        );
    }
}
