//! API building blocks: selection parsing and descriptor construction.
//!
//! Each [`Capability`] maps to one builder function through a flat dispatch
//! table. Builders are invoked once per selection entry, in selection order.

use serde::{Deserialize, Serialize};

use crate::properties::{GEOMETRY_COLUMN, ID_COLUMN};
use crate::schema::TableDescriptor;
use crate::tiles::{tile_document_id, ALL_TILESET};
use crate::types::{AxisOrder, CrsRef, ScaffoldError, ScaffoldResult};

/// Columns never offered as free-text queryables.
pub const NON_QUERYABLE_COLUMNS: [&str; 3] = [GEOMETRY_COLUMN, ID_COLUMN, "created_by"];

/// CRS codes advertised in addition to the native one.
pub const ADDITIONAL_CRS_CODES: [u32; 2] = [4258, 3857];

/// A selectable API capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    Queryables,
    Projections,
    Tiles,
    Crs,
    Styles,
    Filter,
}

impl Capability {
    /// Every capability, in the order offered when "all" is chosen.
    pub const ALL: [Capability; 6] = [
        Capability::Queryables,
        Capability::Crs,
        Capability::Filter,
        Capability::Tiles,
        Capability::Styles,
        Capability::Projections,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Queryables => "QUERYABLES",
            Capability::Projections => "PROJECTIONS",
            Capability::Tiles => "TILES",
            Capability::Crs => "CRS",
            Capability::Styles => "STYLES",
            Capability::Filter => "FILTER",
        }
    }

    fn builder(self) -> CapabilityBuilder {
        match self {
            Capability::Queryables => build_queryables,
            Capability::Projections => build_projections,
            Capability::Tiles => build_tiles,
            Capability::Crs => build_crs,
            Capability::Styles => build_styles,
            Capability::Filter => build_filter,
        }
    }
}

impl std::str::FromStr for Capability {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "QUERYABLES" => Ok(Capability::Queryables),
            "PROJECTIONS" => Ok(Capability::Projections),
            "TILES" => Ok(Capability::Tiles),
            "CRS" => Ok(Capability::Crs),
            "STYLES" => Ok(Capability::Styles),
            "FILTER" => Ok(Capability::Filter),
            other => Err(ScaffoldError::UnrecognizedCapability(other.to_string())),
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How unknown identifiers are handled when parsing a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapabilityPolicy {
    /// Drop unknown identifiers with a warning.
    #[default]
    Lenient,
    /// Reject the whole selection.
    Strict,
}

/// Ordered capability selection. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySelection(Vec<Capability>);

impl CapabilitySelection {
    pub fn new(capabilities: Vec<Capability>) -> Self {
        Self(capabilities)
    }

    /// Parse identifiers such as `["QUERYABLES", "TILES"]`.
    pub fn parse<S: AsRef<str>>(identifiers: &[S], policy: CapabilityPolicy) -> ScaffoldResult<Self> {
        let mut capabilities = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            match identifier.as_ref().parse::<Capability>() {
                Ok(capability) => capabilities.push(capability),
                Err(err) if policy == CapabilityPolicy::Strict => return Err(err),
                Err(_) => {
                    tracing::warn!("Ignoring unrecognized capability: {}", identifier.as_ref());
                }
            }
        }
        Ok(Self(capabilities))
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CapabilitySelection {
    fn default() -> Self {
        Self(Capability::ALL.to_vec())
    }
}

/// Value of `buildingBlock` in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingBlock {
    Queryables,
    Projections,
    TileMatrixSets,
    Tiles,
    Crs,
    Styles,
    Filter,
    FeaturesCore,
}

/// Queryable configuration of a FEATURES_CORE block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queryables {
    pub spatial: Vec<String>,
    pub q: Vec<String>,
}

/// One entry of an `api` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    pub building_block: BuildingBlock,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_provider_tileset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_crs: Option<Vec<CrsRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derive_collection_styles: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queryables: Option<Queryables>,
}

impl CapabilityDescriptor {
    /// An enabled block with no extra settings.
    pub fn enabled(building_block: BuildingBlock) -> Self {
        Self {
            building_block,
            enabled: true,
            included: None,
            tile_provider: None,
            tile_provider_tileset: None,
            additional_crs: None,
            derive_collection_styles: None,
            item_type: None,
            queryables: None,
        }
    }
}

/// Data some builders need beyond the capability itself.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityContext<'a> {
    pub service_id: &'a str,
}

type CapabilityBuilder = fn(&CapabilityContext<'_>) -> Vec<CapabilityDescriptor>;

/// Build the service-level `api` list for a selection.
pub fn build_service_capabilities(
    selection: &CapabilitySelection,
    ctx: &CapabilityContext<'_>,
) -> Vec<CapabilityDescriptor> {
    selection
        .iter()
        .flat_map(|capability| (capability.builder())(ctx))
        .collect()
}

fn build_queryables(_ctx: &CapabilityContext<'_>) -> Vec<CapabilityDescriptor> {
    let mut block = CapabilityDescriptor::enabled(BuildingBlock::Queryables);
    block.included = Some(vec!["*".to_string()]);
    vec![block]
}

fn build_projections(_ctx: &CapabilityContext<'_>) -> Vec<CapabilityDescriptor> {
    vec![CapabilityDescriptor::enabled(BuildingBlock::Projections)]
}

fn build_tiles(ctx: &CapabilityContext<'_>) -> Vec<CapabilityDescriptor> {
    let mut tiles = CapabilityDescriptor::enabled(BuildingBlock::Tiles);
    tiles.tile_provider = Some(tile_document_id(ctx.service_id));
    tiles.tile_provider_tileset = Some(ALL_TILESET.to_string());
    vec![
        CapabilityDescriptor::enabled(BuildingBlock::TileMatrixSets),
        tiles,
    ]
}

fn build_crs(_ctx: &CapabilityContext<'_>) -> Vec<CapabilityDescriptor> {
    let mut block = CapabilityDescriptor::enabled(BuildingBlock::Crs);
    block.additional_crs = Some(
        ADDITIONAL_CRS_CODES
            .iter()
            .map(|&code| CrsRef {
                code,
                force_axis_order: Some(AxisOrder::None),
            })
            .collect(),
    );
    vec![block]
}

fn build_styles(_ctx: &CapabilityContext<'_>) -> Vec<CapabilityDescriptor> {
    let mut block = CapabilityDescriptor::enabled(BuildingBlock::Styles);
    block.derive_collection_styles = Some(true);
    vec![block]
}

fn build_filter(_ctx: &CapabilityContext<'_>) -> Vec<CapabilityDescriptor> {
    vec![CapabilityDescriptor::enabled(BuildingBlock::Filter)]
}

/// Per-collection FEATURES_CORE block, emitted when FILTER is selected.
pub fn features_core(table: &TableDescriptor) -> CapabilityDescriptor {
    let q = table
        .column_names()
        .filter(|name| !NON_QUERYABLE_COLUMNS.contains(name))
        .map(str::to_string)
        .collect();

    let mut block = CapabilityDescriptor::enabled(BuildingBlock::FeaturesCore);
    block.item_type = Some("feature".to_string());
    block.queryables = Some(Queryables {
        spatial: vec!["geometry".to_string()],
        q,
    });
    block
}
