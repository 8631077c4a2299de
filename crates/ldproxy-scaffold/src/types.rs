//! Error types and small value types shared by every document builder.

use serde::{Deserialize, Serialize};

/// Coordinate axis policy attached to a CRS reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisOrder {
    None,
    LonLat,
    LatLon,
}

impl AxisOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisOrder::None => "NONE",
            AxisOrder::LonLat => "LON_LAT",
            AxisOrder::LatLon => "LAT_LON",
        }
    }
}

impl std::str::FromStr for AxisOrder {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(AxisOrder::None),
            "LON_LAT" => Ok(AxisOrder::LonLat),
            "LAT_LON" => Ok(AxisOrder::LatLon),
            other => Err(ScaffoldError::InvalidInput(format!(
                "Unknown axis order: {other}. Use NONE, LON_LAT or LAT_LON."
            ))),
        }
    }
}

/// A CRS reference by EPSG code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrsRef {
    pub code: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_axis_order: Option<AxisOrder>,
}

/// Failures reported by the schema-introspection collaborator.
#[derive(thiserror::Error, Debug)]
pub enum IntrospectionError {
    #[error("Table not found: {schema}.{table}")]
    TableNotFound { schema: String, table: String },

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),
}

/// Errors that can occur while compiling or persisting documents.
#[derive(thiserror::Error, Debug)]
pub enum ScaffoldError {
    #[error("Introspection error: {0}")]
    Introspection(#[from] IntrospectionError),

    #[error("Unrecognized capability: {0}")]
    UnrecognizedCapability(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Result type for introspection collaborators.
pub type IntrospectionResult<T> = Result<T, IntrospectionError>;
