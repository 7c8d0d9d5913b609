//! The catalog query surface consumed by the introspector

use super::metadata::{ColumnMetadata, ForeignKeyMetadata};
use crate::error::Result;

/// The four logical catalog queries the introspector needs.
///
/// Implementations answer in a stable order: tables by name in byte order,
/// columns in ordinal order, foreign keys by the ordinal of their column.
pub trait SchemaCatalog {
    /// Names of all tables in the target schema.
    fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Columns of `table`.
    fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnMetadata>>;

    /// First primary key column of `table`, if the catalog reports one.
    fn primary_key(&mut self, table: &str) -> Result<Option<String>>;

    /// Foreign keys originating in `table`.
    fn list_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyMetadata>>;
}

impl<C: SchemaCatalog + ?Sized> SchemaCatalog for &mut C {
    fn list_tables(&mut self) -> Result<Vec<String>> {
        (**self).list_tables()
    }

    fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnMetadata>> {
        (**self).list_columns(table)
    }

    fn primary_key(&mut self, table: &str) -> Result<Option<String>> {
        (**self).primary_key(table)
    }

    fn list_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyMetadata>> {
        (**self).list_foreign_keys(table)
    }
}
