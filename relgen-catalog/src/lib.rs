//! relgen-catalog - blocking access to a MySQL catalog
//!
//! A thin layer over `mysql_async` used to read `INFORMATION_SCHEMA`. All
//! calls block the current thread: the connection drives its own
//! current-thread Tokio runtime, so callers never deal with futures.
//!
//! # Features
//!
//! - **Single connection**: acquired on connect, released on `close()` or drop
//! - **Clean Query API**: Fluent query builder with `.bind()` chaining
//! - **Row mapping**: `FromRow` / `FromValue` traits for typed row access
//!
//! # Example
//!
//! ```ignore
//! use relgen_catalog::{MySqlConnection, Query};
//!
//! let mut conn = MySqlConnection::builder("127.0.0.1", "shop")
//!     .user("root")
//!     .password("secret")
//!     .connect()?;
//!
//! let tables: Vec<TableName> = Query::new(
//!     "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = ?",
//! )
//! .bind("shop")
//! .fetch_all(&mut conn)?;
//! conn.close()?;
//! ```

pub mod error;
pub mod mysql;
pub mod query;
pub mod traits;
pub mod value;

pub use error::{Error, Result};
pub use mysql::{check_charset, MySqlConnection, MySqlConnectionBuilder, MySqlRow};
pub use query::Query;
pub use traits::{Connection, FromRow, FromValue, Row, RowExt, ToValue};
pub use value::Value;
