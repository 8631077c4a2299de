//! Column-to-property conversion and special role assignment.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::{resolve_geometry_type, GeometryCatalog};
use crate::mapping::{map_scalar_type, PropertyType};
use crate::schema::TableDescriptor;
use crate::types::IntrospectionResult;

/// Column that becomes the primary geometry.
pub const GEOMETRY_COLUMN: &str = "geom";

/// Column that becomes the feature identifier.
pub const ID_COLUMN: &str = "id";

/// Scope the identifier is excluded from.
pub const RECEIVABLE_SCOPE: &str = "RECEIVABLE";

/// Special meaning a property carries for the feature API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Id,
    PrimaryGeometry,
    PrimaryInstant,
}

/// One entry under `types.<table>.properties` in the provider document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub source_path: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_scopes: Option<Vec<String>>,
}

/// Build the property map for a table.
///
/// `geom` and `id` are matched by literal name. The first remaining column
/// whose mapped type is DATETIME becomes the primary instant; later ones get
/// no role. The catalog is queried only when a `geom` column exists.
pub fn build_properties(
    table: &TableDescriptor,
    schema_name: &str,
    catalog: &dyn GeometryCatalog,
) -> IntrospectionResult<IndexMap<String, PropertyDescriptor>> {
    let mut properties = IndexMap::with_capacity(table.columns.len());
    let mut has_primary_instant = false;

    for column in &table.columns {
        let mut property = PropertyDescriptor {
            source_path: column.name.clone(),
            property_type: map_scalar_type(&column.native_type),
            role: None,
            geometry_type: None,
            excluded_scopes: None,
        };

        if column.name == GEOMETRY_COLUMN {
            property.property_type = PropertyType::Geometry;
            property.role = Some(Role::PrimaryGeometry);
            property.geometry_type = Some(resolve_geometry_type(catalog, schema_name, &table.name)?);
        } else if column.name == ID_COLUMN {
            property.role = Some(Role::Id);
            property.excluded_scopes = Some(vec![RECEIVABLE_SCOPE.to_string()]);
        } else if property.property_type == PropertyType::DateTime && !has_primary_instant {
            property.role = Some(Role::PrimaryInstant);
            has_primary_instant = true;
        }

        properties.insert(column.name.clone(), property);
    }

    Ok(properties)
}
