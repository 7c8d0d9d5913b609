//! Error types for relgen-codegen

use thiserror::Error;

/// Result type alias for relgen-codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that abort a generation run
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Incomplete or invalid settings, raised before any I/O
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The catalog is unreachable or rejects the credentials
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed or inconsistent catalog data
    #[error("Introspection error: {0}")]
    Introspection(String),

    /// A named template is missing or unreadable
    #[error("Template error: {0}")]
    Template(String),

    /// Directory creation or file write failure
    #[error("Generation error: {0}")]
    Generation(String),
}

impl CodegenError {
    /// Short name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CodegenError::Configuration(_) => "ConfigurationError",
            CodegenError::Connection(_) => "ConnectionError",
            CodegenError::Introspection(_) => "IntrospectionError",
            CodegenError::Template(_) => "TemplateError",
            CodegenError::Generation(_) => "GenerationError",
        }
    }
}

impl From<relgen_catalog::Error> for CodegenError {
    fn from(err: relgen_catalog::Error) -> Self {
        if err.is_connection() {
            CodegenError::Connection(err.to_string())
        } else {
            CodegenError::Introspection(err.to_string())
        }
    }
}

impl From<sqlparser::parser::ParserError> for CodegenError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        CodegenError::Introspection(format!("Failed to parse SQL schema: {}", err))
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_errors_split_by_kind() {
        let err: CodegenError = relgen_catalog::Error::Connection("refused".into()).into();
        assert_eq!(err.kind(), "ConnectionError");

        let err: CodegenError = relgen_catalog::Error::UnexpectedNull("DATA_TYPE".into()).into();
        assert_eq!(err.kind(), "IntrospectionError");
        assert!(err.to_string().contains("DATA_TYPE"));
    }
}
