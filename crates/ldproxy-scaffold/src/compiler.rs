//! Compilation entry point: one schema snapshot in, three documents out.

use crate::capabilities::CapabilitySelection;
use crate::geometry::GeometryCatalog;
use crate::provider::{build_provider_document, ConnectionDescriptor, ProviderDocument};
use crate::schema::SchemaDescriptor;
use crate::service::{build_service_document, ServiceDocument};
use crate::storage::{inline_sequence, render_yaml, Category, DocumentSink, RenderedDocument};
use crate::tiles::{build_tile_document, TileDocument};
use crate::types::{ScaffoldError, ScaffoldResult};

/// Source of the `createdAt` / `lastModified` timestamps.
pub trait Clock {
    fn now_epoch_seconds(&self) -> i64;
}

/// Wall clock, rounded to the nearest second.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        (chrono::Utc::now().timestamp_millis() + 500).div_euclid(1000)
    }
}

/// Clock frozen at one instant, for reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub service_id: String,
    /// Restrict compilation to these tables. `None` compiles every table.
    pub tables: Option<Vec<String>>,
}

impl CompileOptions {
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            tables: None,
        }
    }

    pub fn with_tables(mut self, tables: Vec<String>) -> Self {
        self.tables = Some(tables);
        self
    }
}

/// The three documents of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDocuments {
    pub service: ServiceDocument,
    pub provider: ProviderDocument,
    pub tiles: TileDocument,
}

impl CompiledDocuments {
    /// Render all documents, service first.
    pub fn render(&self) -> ScaffoldResult<Vec<RenderedDocument>> {
        Ok(vec![
            RenderedDocument {
                category: Category::Services,
                name: self.service.id.clone(),
                contents: render_yaml(&self.service)?,
            },
            RenderedDocument {
                category: Category::Providers,
                name: self.provider.id.clone(),
                contents: render_yaml(&self.provider)?,
            },
            RenderedDocument {
                category: Category::Providers,
                name: self.tiles.id.clone(),
                contents: inline_sequence(&render_yaml(&self.tiles)?, "combine"),
            },
        ])
    }

    /// Render everything, then hand each document to the sink.
    ///
    /// Nothing is written if rendering fails. A sink error stops the run.
    pub fn persist(&self, sink: &mut dyn DocumentSink) -> ScaffoldResult<Vec<RenderedDocument>> {
        let rendered = self.render()?;
        for document in &rendered {
            sink.write(document)?;
        }
        Ok(rendered)
    }
}

/// Compiles schema snapshots against a geometry catalog.
pub struct Compiler<'a> {
    catalog: &'a dyn GeometryCatalog,
    clock: Box<dyn Clock + 'a>,
}

impl<'a> Compiler<'a> {
    pub fn new(catalog: &'a dyn GeometryCatalog) -> Self {
        Self {
            catalog,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Build the service, provider and tile documents.
    ///
    /// An empty schema is valid and yields documents without collections,
    /// types or per-table tilesets. Any geometry lookup failure aborts the
    /// whole compilation.
    pub fn compile(
        &self,
        schema: &SchemaDescriptor,
        selection: &CapabilitySelection,
        connection: &ConnectionDescriptor,
        options: &CompileOptions,
    ) -> ScaffoldResult<CompiledDocuments> {
        let service_id = options.service_id.trim();
        validate_service_id(service_id)?;

        let restricted;
        let schema = match &options.tables {
            Some(names) => {
                restricted = schema.restrict_to(names)?;
                &restricted
            }
            None => schema,
        };
        schema.validate()?;

        if schema.is_empty() {
            tracing::warn!(
                "Schema {} has no tables; documents will have no collections",
                schema.schema_name
            );
        }

        let timestamp = self.clock.now_epoch_seconds();
        tracing::info!(
            "Compiling service {service_id} from schema {} ({} tables, {} capabilities)",
            schema.schema_name,
            schema.tables.len(),
            selection.len()
        );

        let provider =
            build_provider_document(service_id, schema, connection, self.catalog, timestamp)?;
        let service = build_service_document(service_id, schema, selection, timestamp);
        let tiles = build_tile_document(service_id, schema);

        Ok(CompiledDocuments {
            service,
            provider,
            tiles,
        })
    }
}

/// Service ids become file names: non-empty, one path component.
fn validate_service_id(service_id: &str) -> ScaffoldResult<()> {
    if service_id.is_empty() {
        return Err(ScaffoldError::InvalidInput(
            "Service id must not be empty".to_string(),
        ));
    }
    if service_id == "." || service_id == ".." || service_id.contains(['/', '\\']) {
        return Err(ScaffoldError::InvalidInput(format!(
            "Service id must not contain path separators or be . or ..: {service_id}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Capability;
    use crate::schema::{ColumnDescriptor, TableDescriptor};

    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "public",
            vec![
                TableDescriptor::new(
                    "roads",
                    vec![
                        ColumnDescriptor::new("id", "INTEGER"),
                        ColumnDescriptor::new("geom", "GEOMETRY"),
                    ],
                )
                .with_geometry_type("LINESTRING"),
                TableDescriptor::new("stops", vec![ColumnDescriptor::new("id", "INTEGER")]),
            ],
        )
    }

    fn connection() -> ConnectionDescriptor {
        ConnectionDescriptor::from_url("postgresql://gis:pw@localhost:5432/city", "public").unwrap()
    }

    #[test]
    fn test_ids_are_consistent() {
        let schema = schema();
        let docs = Compiler::new(&schema)
            .with_clock(FixedClock(100))
            .compile(
                &schema,
                &CapabilitySelection::new(vec![Capability::Tiles]),
                &connection(),
                &CompileOptions::new("city"),
            )
            .unwrap();

        assert_eq!(docs.service.id, "city");
        assert_eq!(docs.provider.id, "city");
        assert_eq!(docs.tiles.id, "city-tiles");
        assert_eq!(docs.service.api[1].tile_provider.as_deref(), Some(docs.tiles.id.as_str()));
        assert_eq!(docs.service.created_at, docs.provider.created_at);
    }

    #[test]
    fn test_empty_service_id_rejected() {
        let schema = schema();
        let err = Compiler::new(&schema)
            .compile(
                &schema,
                &CapabilitySelection::default(),
                &connection(),
                &CompileOptions::new("  "),
            )
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidInput(_)));
    }

    #[test]
    fn test_path_like_service_ids_rejected() {
        let schema = schema();
        let compiler = Compiler::new(&schema);
        for id in ["../../escaped", "a/b", "a\\b", ".", ".."] {
            let err = compiler
                .compile(
                    &schema,
                    &CapabilitySelection::default(),
                    &connection(),
                    &CompileOptions::new(id),
                )
                .unwrap_err();
            assert!(matches!(err, ScaffoldError::InvalidInput(_)), "{id} accepted");
        }
    }

    #[test]
    fn test_table_restriction() {
        let schema = schema();
        let docs = Compiler::new(&schema)
            .compile(
                &schema,
                &CapabilitySelection::default(),
                &connection(),
                &CompileOptions::new("city").with_tables(vec!["stops".to_string()]),
            )
            .unwrap();
        assert_eq!(docs.service.collections.len(), 1);
        assert!(docs.provider.types.contains_key("stops"));
        assert!(!docs.tiles.tilesets.contains_key("roads"));
    }

    #[test]
    fn test_render_layout() {
        let schema = schema();
        let docs = Compiler::new(&schema)
            .with_clock(FixedClock(1))
            .compile(
                &schema,
                &CapabilitySelection::default(),
                &connection(),
                &CompileOptions::new("city"),
            )
            .unwrap();
        let rendered = docs.render().unwrap();
        let paths: Vec<_> = rendered
            .iter()
            .map(|d| (d.category, d.name.as_str()))
            .collect();
        assert_eq!(
            paths,
            vec![
                (Category::Services, "city"),
                (Category::Providers, "city"),
                (Category::Providers, "city-tiles"),
            ]
        );
        assert!(rendered[2].contents.contains("combine: [\"*\"]\n"));
    }

    #[test]
    fn test_fixed_clock_is_reproducible() {
        let schema = schema();
        let compiler = Compiler::new(&schema).with_clock(FixedClock(1_717_000_000));
        let compile = || {
            compiler
                .compile(
                    &schema,
                    &CapabilitySelection::default(),
                    &connection(),
                    &CompileOptions::new("city"),
                )
                .unwrap()
                .render()
                .unwrap()
        };
        assert_eq!(compile(), compile());
    }
}
