//! Service document: metadata, API building blocks and collections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::capabilities::{
    build_service_capabilities, features_core, Capability, CapabilityContext, CapabilityDescriptor,
    CapabilitySelection,
};
use crate::schema::SchemaDescriptor;

/// Storage layout version understood by the feature server.
pub const ENTITY_STORAGE_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: String,
    pub label: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<Vec<CapabilityDescriptor>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDocument {
    pub id: String,
    pub created_at: i64,
    pub last_modified: i64,
    pub entity_storage_version: u32,
    pub label: String,
    pub description: String,
    pub enabled: bool,
    pub service_type: String,
    pub api: Vec<CapabilityDescriptor>,
    pub collections: IndexMap<String, CollectionEntry>,
}

/// Build the service document.
///
/// Collections follow the schema's table order. With FILTER selected every
/// collection carries its own FEATURES_CORE block.
pub fn build_service_document(
    service_id: &str,
    schema: &SchemaDescriptor,
    selection: &CapabilitySelection,
    timestamp: i64,
) -> ServiceDocument {
    let ctx = CapabilityContext { service_id };
    let with_filter = selection.contains(Capability::Filter);

    let collections = schema
        .tables
        .iter()
        .map(|table| {
            let entry = CollectionEntry {
                id: table.name.clone(),
                label: table.name.clone(),
                enabled: true,
                api: with_filter.then(|| vec![features_core(table)]),
            };
            (table.name.clone(), entry)
        })
        .collect();

    ServiceDocument {
        id: service_id.to_string(),
        created_at: timestamp,
        last_modified: timestamp,
        entity_storage_version: ENTITY_STORAGE_VERSION,
        label: service_id.to_string(),
        description: String::new(),
        enabled: true,
        service_type: "OGC_API".to_string(),
        api: build_service_capabilities(selection, &ctx),
        collections,
    }
}
