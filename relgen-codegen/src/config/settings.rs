//! Configuration settings for relgen-codegen

use config::{Config, Environment, File};
use relgen_catalog::check_charset;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};

/// Raw configuration as loaded from file, environment, CLI or builder.
///
/// Every field may be missing here; [`CodegenConfig::validate`] turns it into
/// the read-only [`GeneratorSettings`] used by the rest of the crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Database host
    #[serde(default)]
    pub host: Option<String>,

    /// Database port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database (schema) name to introspect
    #[serde(default)]
    pub database: Option<String>,

    /// Database user
    #[serde(default)]
    pub user: Option<String>,

    /// Database password
    #[serde(default)]
    pub password: Option<Password>,

    /// Driver options; only `charset` is recognized
    #[serde(default)]
    pub options: BTreeMap<String, String>,

    /// DDL file to read the schema from instead of a live database
    #[serde(default)]
    pub schema_file: Option<PathBuf>,

    /// Root directory receiving `Models/` and `Services/`
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Namespace prefix of the generated classes (e.g. `App`)
    #[serde(default)]
    pub namespace: Option<String>,

    /// Directory holding `model.stub` and `service.stub`; built-in stubs if unset
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Whether to generate model classes
    #[serde(default = "default_generate_models")]
    pub generate_models: bool,

    /// Whether to generate service classes
    #[serde(default = "default_generate_services")]
    pub generate_services: bool,

    /// Dry run mode - render without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_port() -> u16 {
    defaults::PORT
}
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_generate_models() -> bool {
    defaults::GENERATE_MODELS
}
fn default_generate_services() -> bool {
    defaults::GENERATE_SERVICES
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            database: None,
            user: None,
            password: None,
            options: BTreeMap::new(),
            schema_file: None,
            output_dir: None,
            namespace: None,
            template_dir: None,
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            generate_models: default_generate_models(),
            generate_services: default_generate_services(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

/// A password that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// The clear-text password, for handing to the driver.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Validated connection parameters for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Password,
    pub charset: String,
}

/// Where the schema comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// Live database catalog (`INFORMATION_SCHEMA`)
    Database(ConnectionParams),
    /// MySQL DDL file
    DdlFile(PathBuf),
}

/// Include/exclude filter applied to the table listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    include: Option<HashSet<String>>,
    exclude: HashSet<String>,
}

impl TableFilter {
    /// Build a filter from comma-separated include/exclude lists.
    /// An include list of `*` or empty means all tables.
    pub fn new(include: &str, exclude: &str) -> Self {
        let include_all = include.trim() == "*" || include.trim().is_empty();
        let include = if include_all {
            None
        } else {
            Some(split_list(include))
        };
        Self {
            include,
            exclude: split_list(exclude),
        }
    }

    /// Whether `table` survives the filter.
    pub fn matches(&self, table: &str) -> bool {
        let included = self
            .include
            .as_ref()
            .map(|set| set.contains(table))
            .unwrap_or(true);
        included && !self.exclude.contains(table)
    }
}

fn split_list(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Validated, read-only settings for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub source: SchemaSource,
    pub output_dir: PathBuf,
    pub namespace: String,
    pub template_dir: Option<PathBuf>,
    pub table_filter: TableFilter,
    pub generate_models: bool,
    pub generate_services: bool,
    pub dry_run: bool,
}

impl GeneratorSettings {
    /// Namespace of generated models, e.g. `App\Models`
    pub fn model_namespace(&self) -> String {
        format!("{}\\Models", self.namespace)
    }

    /// Namespace of generated services, e.g. `App\Services`
    pub fn service_namespace(&self) -> String {
        format!("{}\\Services", self.namespace)
    }
}

impl CodegenConfig {
    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // RELGEN_HOST, RELGEN_OUTPUT_DIR, RELGEN_OPTIONS__CHARSET, ...
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Set the database connection parameters in one go
    pub fn set_database(
        &mut self,
        host: &str,
        database: &str,
        user: &str,
        password: &str,
        options: BTreeMap<String, String>,
    ) -> &mut Self {
        self.host = Some(host.to_string());
        self.database = Some(database.to_string());
        self.user = Some(user.to_string());
        self.password = Some(Password::new(password));
        self.options = options;
        self
    }

    /// Validate the configuration.
    ///
    /// Performs no I/O besides checking that a configured schema file exists.
    pub fn validate(&self) -> Result<GeneratorSettings> {
        let source = self.schema_source()?;

        let output_dir = self
            .output_dir
            .as_deref()
            .map(normalize_output_dir)
            .filter(|dir| !dir.is_empty())
            .ok_or_else(|| CodegenError::Configuration("Output directory is not set.".into()))?;

        let namespace = self
            .namespace
            .as_deref()
            .map(normalize_namespace)
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| CodegenError::Configuration("Namespace is not set.".into()))?;

        if !self.generate_models && !self.generate_services {
            return Err(CodegenError::Configuration(
                "Nothing to generate: both generate_models and generate_services are false".into(),
            ));
        }

        Ok(GeneratorSettings {
            source,
            output_dir: PathBuf::from(output_dir),
            namespace,
            template_dir: self.template_dir.clone(),
            table_filter: self.table_filter(),
            generate_models: self.generate_models,
            generate_services: self.generate_services,
            dry_run: self.dry_run,
        })
    }

    /// Resolve the schema source: a DDL file when `schema_file` is set,
    /// otherwise the database described by the connection settings.
    pub fn schema_source(&self) -> Result<SchemaSource> {
        match &self.schema_file {
            Some(path) => {
                if path.as_os_str().is_empty() {
                    return Err(CodegenError::Configuration(
                        "schema_file must not be empty".into(),
                    ));
                }
                if !path.exists() {
                    return Err(CodegenError::Configuration(format!(
                        "Schema file not found: {}",
                        path.display()
                    )));
                }
                Ok(SchemaSource::DdlFile(path.clone()))
            }
            None => Ok(SchemaSource::Database(self.connection_params()?)),
        }
    }

    /// The include/exclude filter
    pub fn table_filter(&self) -> TableFilter {
        TableFilter::new(&self.include_tables, &self.exclude_tables)
    }

    fn connection_params(&self) -> Result<ConnectionParams> {
        let (Some(host), Some(database), Some(user), Some(password)) = (
            self.host.as_ref(),
            self.database.as_ref(),
            self.user.as_ref(),
            self.password.as_ref(),
        ) else {
            return Err(CodegenError::Configuration(
                "Database configuration is incomplete.".into(),
            ));
        };

        let charset = self
            .options
            .get("charset")
            .cloned()
            .unwrap_or_else(|| defaults::CHARSET.to_string());
        check_charset(&charset).map_err(|_| {
            CodegenError::Configuration(format!("Invalid charset option: {:?}", charset))
        })?;

        Ok(ConnectionParams {
            host: host.clone(),
            port: self.port,
            database: database.clone(),
            user: user.clone(),
            password: password.clone(),
            charset,
        })
    }
}

/// Strip trailing path separators, keeping a bare root intact.
fn normalize_output_dir(dir: &str) -> String {
    let trimmed = dir.trim_end_matches(std::path::is_separator);
    if trimmed.is_empty() && !dir.is_empty() {
        dir[..1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Strip leading and trailing namespace separators (`\`).
fn normalize_namespace(namespace: &str) -> String {
    namespace.trim_matches('\\').to_string()
}
