//! Geometry subtype lookup against the spatial catalog.
//!
//! Lookups go through a [`CatalogCursor`] acquired from a [`GeometryCatalog`].
//! The cursor lives only for the duration of one lookup and is released when it
//! drops, including when the lookup fails.

use crate::mapping::{normalize_geometry_subtype, GENERIC_GEOMETRY};
use crate::schema::SchemaDescriptor;
use crate::types::{IntrospectionError, IntrospectionResult};

/// Geometry type emitted when the catalog has no specific subtype.
pub const ANY_GEOMETRY: &str = "ANY";

/// Source of scoped catalog cursors, typically backed by a database pool.
pub trait GeometryCatalog {
    fn open_cursor(&self) -> IntrospectionResult<Box<dyn CatalogCursor + '_>>;
}

/// A live query handle. Dropping it releases the underlying resource.
pub trait CatalogCursor {
    /// Raw subtype registered for `schema.table`, or `None` if no row exists.
    fn geometry_type(&mut self, schema: &str, table: &str) -> IntrospectionResult<Option<String>>;
}

/// Resolve the provider geometry type for a table.
pub fn resolve_geometry_type(
    catalog: &dyn GeometryCatalog,
    schema: &str,
    table: &str,
) -> IntrospectionResult<String> {
    let raw = {
        let mut cursor = catalog.open_cursor()?;
        cursor.geometry_type(schema, table)?
    };

    let resolved = match raw.as_deref() {
        None | Some(GENERIC_GEOMETRY) => ANY_GEOMETRY.to_string(),
        Some(subtype) => normalize_geometry_subtype(subtype),
    };

    tracing::debug!(
        "Geometry type for {schema}.{table}: {} -> {resolved}",
        raw.as_deref().unwrap_or("<none>")
    );

    Ok(resolved)
}

/// Cursor over the subtypes recorded in a schema snapshot.
pub struct SnapshotCursor<'a> {
    schema: &'a SchemaDescriptor,
}

impl CatalogCursor for SnapshotCursor<'_> {
    fn geometry_type(&mut self, schema: &str, table: &str) -> IntrospectionResult<Option<String>> {
        if schema != self.schema.schema_name {
            return Err(IntrospectionError::SchemaNotFound(schema.to_string()));
        }

        self.schema
            .table(table)
            .map(|t| t.geometry_type.clone())
            .ok_or_else(|| IntrospectionError::TableNotFound {
                schema: schema.to_string(),
                table: table.to_string(),
            })
    }
}

impl GeometryCatalog for SchemaDescriptor {
    fn open_cursor(&self) -> IntrospectionResult<Box<dyn CatalogCursor + '_>> {
        Ok(Box::new(SnapshotCursor { schema: self }))
    }
}
