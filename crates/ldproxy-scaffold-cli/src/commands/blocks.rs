//! `blocks`: list the selectable capabilities.

use serde::Serialize;

use ldproxy_scaffold::{
    build_service_document, BuildingBlock, Capability, CapabilitySelection, SchemaDescriptor,
};

/// One selectable capability and the service-level blocks it emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    pub capability: Capability,
    pub building_blocks: Vec<BuildingBlock>,
}

/// Describe every capability, in default selection order.
pub fn list_blocks() -> Vec<BlockInfo> {
    let empty = SchemaDescriptor::new("public", Vec::new());
    Capability::ALL
        .iter()
        .map(|&capability| {
            let selection = CapabilitySelection::new(vec![capability]);
            let service = build_service_document("blocks", &empty, &selection, 0);
            BlockInfo {
                capability,
                building_blocks: service.api.iter().map(|d| d.building_block).collect(),
            }
        })
        .collect()
}
