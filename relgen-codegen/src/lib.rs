//! relgen-codegen: Generate Eloquent model and service classes from a MySQL schema
//!
//! The generator reads a schema's tables, columns, primary keys and foreign
//! keys, derives a `belongsTo` relation on the referencing table and a mirrored
//! `hasMany` relation on the referenced table for every foreign key, then
//! renders two PHP classes per table:
//!
//! - `<output_dir>/Models/<Class>.php`: an Eloquent model with one accessor per relation
//! - `<output_dir>/Services/<Class>Service.php`: a CRUD service that persists
//!   `hasMany` children alongside the parent
//!
//! The schema comes either from a live database (`INFORMATION_SCHEMA`) or from
//! a DDL file parsed with `sqlparser-rs`.
//!
//! # Programmatic Usage
//!
//! ```rust,ignore
//! relgen_codegen::CodegenBuilder::new("app", "App")
//!     .database("localhost", "shop", "root", "secret")
//!     .generate()
//!     .expect("Failed to generate classes");
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! relgen --schema schema.sql --output ./app --namespace App generate
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod introspect;

use std::path::Path;

use tracing::info;

pub use codegen::{CodeGenerator, GenerationReport};
pub use config::CodegenConfig;
pub use error::{CodegenError, Result};

use config::{GeneratorSettings, SchemaSource, TableFilter};
use introspect::{DdlCatalog, SchemaCatalog, SchemaGraph};

/// Main entry point for code generation.
///
/// The configuration is validated before any connection is attempted.
pub fn generate(config: &CodegenConfig) -> Result<GenerationReport> {
    let settings = config.validate()?;
    let graph = load_schema(&settings.source, &settings.table_filter)?;
    run(&settings, &graph)
}

/// Read and derive the schema graph without generating anything.
///
/// Only the schema source settings are required.
pub fn inspect(config: &CodegenConfig) -> Result<SchemaGraph> {
    let source = config.schema_source()?;
    load_schema(&source, &config.table_filter())
}

/// Generate from an already opened catalog.
pub fn generate_with_catalog<C: SchemaCatalog + ?Sized>(
    config: &CodegenConfig,
    catalog: &mut C,
) -> Result<GenerationReport> {
    let settings = config.validate()?;
    let graph = introspect::read_schema(catalog, &settings.table_filter)?;
    run(&settings, &graph)
}

/// Read the schema graph from `source`
pub fn load_schema(source: &SchemaSource, filter: &TableFilter) -> Result<SchemaGraph> {
    match source {
        SchemaSource::Database(params) => introspect::introspect(params, filter),
        SchemaSource::DdlFile(path) => {
            info!("Parsing schema: {}", path.display());
            let sql = std::fs::read_to_string(path).map_err(|e| {
                CodegenError::Introspection(format!(
                    "Failed to read schema file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let mut catalog = DdlCatalog::from_sql(&sql)?;
            introspect::read_schema(&mut catalog, filter)
        }
    }
}

fn run(settings: &GeneratorSettings, graph: &SchemaGraph) -> Result<GenerationReport> {
    info!(
        "Generating classes for {} tables into {}",
        graph.len(),
        settings.output_dir.display()
    );
    let report = CodeGenerator::new(settings).generate(graph)?;
    info!(
        "Code generation complete: {} models, {} services",
        report.models.len(),
        report.services.len()
    );
    Ok(report)
}

/// Builder pattern for programmatic configuration
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder writing under `output_dir` with the given namespace prefix
    pub fn new(output_dir: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            config: CodegenConfig {
                output_dir: Some(output_dir.as_ref().to_string_lossy().into_owned()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
        }
    }

    /// Introspect a live database
    pub fn database(mut self, host: &str, database: &str, user: &str, password: &str) -> Self {
        let options = std::mem::take(&mut self.config.options);
        self.config
            .set_database(host, database, user, password, options);
        self
    }

    /// Set the database port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connection character set
    pub fn charset(mut self, charset: &str) -> Self {
        self.config
            .options
            .insert("charset".to_string(), charset.to_string());
        self
    }

    /// Read the schema from a DDL file instead of a database
    pub fn schema_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config.schema_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load `model.stub` and `service.stub` from a directory
    pub fn template_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.template_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Generate only models, no services
    pub fn models_only(mut self) -> Self {
        self.config.generate_services = false;
        self
    }

    /// Generate only services, no models
    pub fn services_only(mut self) -> Self {
        self.config.generate_models = false;
        self
    }

    /// Enable dry run mode (render without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// The configuration built so far
    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate the classes
    pub fn generate(self) -> Result<GenerationReport> {
        generate(&self.config)
    }
}

impl From<CodegenBuilder> for CodegenConfig {
    fn from(builder: CodegenBuilder) -> Self {
        builder.config
    }
}
