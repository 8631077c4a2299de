//! Tile provider document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::SchemaDescriptor;

/// Identifier of the aggregate tileset spanning every table.
pub const ALL_TILESET: &str = "__all__";

/// Suffix that turns a service id into its tile provider id.
pub const TILE_PROVIDER_SUFFIX: &str = "-tiles";

/// Tiling scheme used by every cache and tileset.
pub const WEB_MERCATOR_QUAD: &str = "WebMercatorQuad";

/// Id of the tile provider document for a service.
pub fn tile_document_id(service_id: &str) -> String {
    format!("{service_id}{TILE_PROVIDER_SUFFIX}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheType {
    Immutable,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheStorage {
    Mbtiles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCache {
    #[serde(rename = "type")]
    pub cache_type: CacheType,
    pub storage: CacheStorage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeded: Option<bool>,
    pub levels: IndexMap<String, ZoomRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetDefaults {
    pub levels: IndexMap<String, ZoomRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tileset {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDocument {
    pub id: String,
    pub provider_type: String,
    pub provider_sub_type: String,
    pub caches: Vec<TileCache>,
    pub tileset_defaults: TilesetDefaults,
    pub tilesets: IndexMap<String, Tileset>,
}

fn web_mercator(min: u8, max: u8) -> IndexMap<String, ZoomRange> {
    IndexMap::from([(WEB_MERCATOR_QUAD.to_string(), ZoomRange { min, max })])
}

/// Build the tile provider document.
///
/// Zoom 5-12 is served from an immutable cache, 13-18 from an unseeded
/// dynamic one. The `__all__` tileset comes first, then one per table.
pub fn build_tile_document(service_id: &str, schema: &SchemaDescriptor) -> TileDocument {
    let mut tilesets = IndexMap::with_capacity(schema.tables.len() + 1);
    tilesets.insert(
        ALL_TILESET.to_string(),
        Tileset {
            id: ALL_TILESET.to_string(),
            combine: Some(vec!["*".to_string()]),
        },
    );
    for table in &schema.tables {
        tilesets.insert(
            table.name.clone(),
            Tileset {
                id: table.name.clone(),
                combine: None,
            },
        );
    }

    TileDocument {
        id: tile_document_id(service_id),
        provider_type: "TILE".to_string(),
        provider_sub_type: "FEATURES".to_string(),
        caches: vec![
            TileCache {
                cache_type: CacheType::Immutable,
                storage: CacheStorage::Mbtiles,
                seeded: None,
                levels: web_mercator(5, 12),
            },
            TileCache {
                cache_type: CacheType::Dynamic,
                storage: CacheStorage::Mbtiles,
                seeded: Some(false),
                levels: web_mercator(13, 18),
            },
        ],
        tileset_defaults: TilesetDefaults {
            levels: web_mercator(5, 20),
        },
        tilesets,
    }
}
