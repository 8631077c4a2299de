//! ldproxy-scaffold: compile relational schema metadata into ldproxy service,
//! SQL feature provider and tile provider configuration documents.

pub mod capabilities;
pub mod compiler;
pub mod geometry;
pub mod mapping;
pub mod properties;
pub mod provider;
pub mod schema;
pub mod service;
pub mod storage;
pub mod tiles;
pub mod types;

pub use capabilities::{
    features_core, BuildingBlock, Capability, CapabilityDescriptor, CapabilityPolicy,
    CapabilitySelection,
};
pub use compiler::{Clock, CompileOptions, CompiledDocuments, Compiler, FixedClock, SystemClock};
pub use geometry::{resolve_geometry_type, CatalogCursor, GeometryCatalog, ANY_GEOMETRY};
pub use mapping::{map_scalar_type, normalize_geometry_subtype, PropertyType};
pub use properties::{build_properties, PropertyDescriptor, Role};
pub use provider::{build_provider_document, ConnectionDescriptor, ProviderDocument};
pub use schema::{ColumnDescriptor, SchemaDescriptor, TableDescriptor};
pub use service::{build_service_document, ServiceDocument};
pub use storage::{Category, DocumentSink, MemorySink, RenderedDocument, YamlDirectoryWriter};
pub use tiles::{build_tile_document, TileDocument, ALL_TILESET};
pub use types::*;
