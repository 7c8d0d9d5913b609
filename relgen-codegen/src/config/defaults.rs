//! Default configuration values - single source of truth

/// Default MySQL port
pub const PORT: u16 = 3306;

/// Default session character set (`options.charset`)
pub const CHARSET: &str = "utf8mb4";

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Whether to generate model classes by default
pub const GENERATE_MODELS: bool = true;

/// Whether to generate service classes by default
pub const GENERATE_SERVICES: bool = true;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE: &str = "relgen";

/// Prefix for environment overrides (`RELGEN_HOST`, `RELGEN_OPTIONS__CHARSET`, ...)
pub const ENV_PREFIX: &str = "RELGEN";
