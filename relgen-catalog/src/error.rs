//! Error types for relgen-catalog

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the catalog
#[derive(Error, Debug)]
pub enum Error {
    /// MySQL driver error
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// The server could not be reached or refused the session
    #[error("Connection error: {0}")]
    Connection(String),

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Column not found in row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Null value for non-optional field
    #[error("Unexpected null value for column: {0}")]
    UnexpectedNull(String),
}

impl Error {
    /// Whether this error means the catalog was never reachable.
    pub fn is_connection(&self) -> bool {
        match self {
            Error::Connection(_) => true,
            Error::MySql(mysql_async::Error::Io(_)) => true,
            _ => false,
        }
    }
}
