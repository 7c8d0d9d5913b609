//! Query builder for relgen-catalog

use crate::error::Result;
use crate::traits::{Connection, FromRow, ToValue};
use crate::value::Value;

/// A query builder that supports fluent parameter binding.
///
/// # Example
///
/// ```ignore
/// use relgen_catalog::{Connection, Query};
///
/// fn columns(conn: &mut impl Connection, schema: &str, table: &str) -> relgen_catalog::Result<Vec<ColumnRow>> {
///     Query::new("SELECT * FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?")
///         .bind(schema)
///         .bind(table)
///         .fetch_all(conn)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Query<'q> {
    sql: &'q str,
    params: Vec<Value>,
}

impl<'q> Query<'q> {
    /// Create a new query with the given SQL.
    pub fn new(sql: &'q str) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Bind a single value to the query.
    ///
    /// Values are bound in order, replacing `?` placeholders.
    pub fn bind<T: ToValue>(mut self, value: T) -> Self {
        self.params.push(value.to_value());
        self
    }

    /// Get the SQL string.
    pub fn sql(&self) -> &str {
        self.sql
    }

    /// Get the bound parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Execute the statement and return the number of affected rows.
    pub fn execute<C: Connection>(self, conn: &mut C) -> Result<u64> {
        conn.execute(self.sql, self.params)
    }

    /// Fetch all matching rows.
    pub fn fetch_all<T: FromRow, C: Connection>(self, conn: &mut C) -> Result<Vec<T>> {
        conn.fetch_all(self.sql, self.params)
    }

    /// Fetch the first row, if any.
    pub fn fetch_optional<T: FromRow, C: Connection>(self, conn: &mut C) -> Result<Option<T>> {
        conn.fetch_optional(self.sql, self.params)
    }
}
