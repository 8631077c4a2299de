//! Relational schema model handed over by the introspection collaborator.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tiles::ALL_TILESET;
use crate::types::{IntrospectionError, ScaffoldError, ScaffoldResult};

/// A single column and its source-system type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Native type as printed by the source system, e.g. `VARCHAR(255)`.
    #[serde(rename = "type")]
    pub native_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
        }
    }
}

/// A table with its columns in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    /// Raw subtype registered in the spatial catalog, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            name: name.into(),
            columns,
            geometry_type: None,
        }
    }

    /// Attach the raw geometry subtype reported by the spatial catalog.
    pub fn with_geometry_type(mut self, raw: impl Into<String>) -> Self {
        self.geometry_type = Some(raw.into());
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// An immutable snapshot of one database schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    pub schema_name: String,
    #[serde(default)]
    pub tables: Vec<TableDescriptor>,
}

impl SchemaDescriptor {
    pub fn new(schema_name: impl Into<String>, tables: Vec<TableDescriptor>) -> Self {
        Self {
            schema_name: schema_name.into(),
            tables,
        }
    }

    /// Parse a JSON schema snapshot.
    pub fn from_json(json: &str) -> ScaffoldResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON schema snapshot from a file.
    pub fn from_json_file(path: &Path) -> ScaffoldResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn table(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Keep only the named tables, preserving the schema's declared order.
    pub fn restrict_to(&self, names: &[String]) -> ScaffoldResult<Self> {
        if let Some(missing) = names.iter().find(|n| self.table(n).is_none()) {
            return Err(IntrospectionError::TableNotFound {
                schema: self.schema_name.clone(),
                table: missing.clone(),
            }
            .into());
        }

        let tables = self
            .tables
            .iter()
            .filter(|t| names.iter().any(|n| n == &t.name))
            .cloned()
            .collect();

        Ok(Self {
            schema_name: self.schema_name.clone(),
            tables,
        })
    }

    /// Check the uniqueness rules every document relies on.
    pub fn validate(&self) -> ScaffoldResult<()> {
        let mut seen_tables = HashSet::new();

        for table in &self.tables {
            if table.name.is_empty() {
                return Err(ScaffoldError::InvalidInput(
                    "Table name must not be empty".to_string(),
                ));
            }
            if table.name == ALL_TILESET {
                return Err(ScaffoldError::InvalidInput(format!(
                    "Table name \"{ALL_TILESET}\" is reserved for the combined tileset"
                )));
            }
            if !seen_tables.insert(table.name.as_str()) {
                return Err(ScaffoldError::InvalidInput(format!(
                    "Duplicate table: {}",
                    table.name
                )));
            }

            let mut seen_columns = HashSet::new();
            for column in &table.columns {
                if !seen_columns.insert(column.name.as_str()) {
                    return Err(ScaffoldError::InvalidInput(format!(
                        "Duplicate column {} in table {}",
                        column.name, table.name
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "public",
            vec![
                TableDescriptor::new("roads", vec![ColumnDescriptor::new("id", "INTEGER")]),
                TableDescriptor::new("parks", vec![ColumnDescriptor::new("id", "INTEGER")]),
                TableDescriptor::new("lakes", vec![ColumnDescriptor::new("id", "INTEGER")]),
            ],
        )
    }

    #[test]
    fn test_from_json_snapshot() {
        let json = r#"{
            "schemaName": "public",
            "tables": [{
                "name": "parks",
                "geometryType": "MULTIPOLYGON",
                "columns": [
                    {"name": "id", "type": "INTEGER"},
                    {"name": "geom", "type": "GEOMETRY"}
                ]
            }]
        }"#;
        let schema = SchemaDescriptor::from_json(json).unwrap();
        assert_eq!(schema.schema_name, "public");
        let parks = schema.table("parks").unwrap();
        assert_eq!(parks.geometry_type.as_deref(), Some("MULTIPOLYGON"));
        assert_eq!(parks.columns[1].native_type, "GEOMETRY");
    }

    #[test]
    fn test_restrict_keeps_declared_order() {
        let schema = sample();
        let restricted = schema
            .restrict_to(&["lakes".to_string(), "roads".to_string()])
            .unwrap();
        let names: Vec<_> = restricted.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["roads", "lakes"]);
    }

    #[test]
    fn test_restrict_unknown_table() {
        let err = sample().restrict_to(&["rivers".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Introspection(IntrospectionError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut schema = sample();
        schema.tables.push(TableDescriptor::new("roads", vec![]));
        assert!(schema.validate().is_err());

        let schema = SchemaDescriptor::new(
            "public",
            vec![TableDescriptor::new(
                "roads",
                vec![
                    ColumnDescriptor::new("name", "TEXT"),
                    ColumnDescriptor::new("name", "TEXT"),
                ],
            )],
        );
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_reserved_tileset_name() {
        let schema = SchemaDescriptor::new("public", vec![TableDescriptor::new("__all__", vec![])]);
        assert!(matches!(
            schema.validate(),
            Err(ScaffoldError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_schema_is_valid() {
        let schema = SchemaDescriptor::new("public", vec![]);
        assert!(schema.is_empty());
        assert!(schema.validate().is_ok());
    }
}
