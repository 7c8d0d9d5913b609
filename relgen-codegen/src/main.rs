//! CLI entry point for relgen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use relgen_codegen::config::CodegenConfig;
use relgen_codegen::introspect::SchemaGraph;
use relgen_codegen::CodegenError;

#[derive(Parser)]
#[command(name = "relgen")]
#[command(about = "Generate Eloquent model and service classes from a MySQL schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to SQL schema file; replaces database introspection
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output directory receiving Models/ and Services/
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Namespace prefix of the generated classes (e.g. App)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Directory holding model.stub and service.stub
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all (models and services)
    Generate,
    /// Generate only models
    Models,
    /// Generate only services
    Services,
    /// Inspect schema (show derived tables and relations)
    Inspect {
        /// Print the schema graph as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CodegenError>() {
                Some(e) => eprintln!("[{}] {}", e.kind(), e),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(schema) = cli.schema {
        config.schema_file = Some(schema);
    }
    if let Some(output) = cli.output {
        config.output_dir = Some(output.to_string_lossy().into_owned());
    }
    if let Some(namespace) = cli.namespace {
        config.namespace = Some(namespace);
    }
    if let Some(templates) = cli.templates {
        config.template_dir = Some(templates);
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Apply command-specific settings
    match &cli.command {
        Some(Commands::Models) => {
            config.generate_services = false;
        }
        Some(Commands::Services) => {
            config.generate_models = false;
        }
        Some(Commands::Inspect { json }) => {
            let graph = relgen_codegen::inspect(&config)?;
            return print_schema(&graph, *json);
        }
        _ => {}
    }

    let report = relgen_codegen::generate(&config)?;

    if report.dry_run {
        println!("Dry run mode - would generate:");
        for path in &report.models {
            println!("  Model:   {}", path.display());
        }
        for path in &report.services {
            println!("  Service: {}", path.display());
        }
        return Ok(());
    }

    info!("Code generation completed successfully");
    Ok(())
}

fn print_schema(graph: &SchemaGraph, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(graph)?);
        return Ok(());
    }

    println!("Found {} tables:\n", graph.len());
    for table in graph.tables() {
        println!("Table: {}", table.name);
        println!("  Primary Key: {}", table.primary_key);
        println!("  Columns:");
        for col in &table.columns {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            match &col.default_value {
                Some(default) => println!(
                    "    - {} {} {} DEFAULT {}",
                    col.name, col.data_type, nullable, default
                ),
                None => println!("    - {} {} {}", col.name, col.data_type, nullable),
            }
        }
        let rels = &table.relationships;
        if !rels.belongs_to.is_empty() {
            println!("  Belongs To:");
            for rel in &rels.belongs_to {
                println!(
                    "    - {} via {} -> {}.{}",
                    rel.target_table, rel.foreign_key, rel.target_table, rel.owner_key
                );
            }
        }
        if !rels.has_many.is_empty() {
            println!("  Has Many:");
            for rel in &rels.has_many {
                println!(
                    "    - {} via {}.{} -> {}",
                    rel.target_table, rel.target_table, rel.foreign_key, rel.local_key
                );
            }
        }
        println!();
    }

    Ok(())
}
