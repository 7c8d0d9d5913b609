//! Connection trait for blocking catalog access

use crate::error::Result;
use crate::traits::FromRow;
use crate::value::Value;

/// A blocking connection to a database catalog.
///
/// Implementations hold one session for their whole lifetime and run
/// statements strictly one after another.
pub trait Connection {
    /// Execute a statement and return the number of affected rows.
    fn execute(&mut self, sql: &str, params: Vec<Value>) -> Result<u64>;

    /// Fetch all rows matching the query.
    fn fetch_all<T: FromRow>(&mut self, sql: &str, params: Vec<Value>) -> Result<Vec<T>>;

    /// Fetch the first row, if any.
    fn fetch_optional<T: FromRow>(&mut self, sql: &str, params: Vec<Value>) -> Result<Option<T>>;
}

impl<C: Connection> Connection for &mut C {
    fn execute(&mut self, sql: &str, params: Vec<Value>) -> Result<u64> {
        (**self).execute(sql, params)
    }

    fn fetch_all<T: FromRow>(&mut self, sql: &str, params: Vec<Value>) -> Result<Vec<T>> {
        (**self).fetch_all(sql, params)
    }

    fn fetch_optional<T: FromRow>(&mut self, sql: &str, params: Vec<Value>) -> Result<Option<T>> {
        (**self).fetch_optional(sql, params)
    }
}
