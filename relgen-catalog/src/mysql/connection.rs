//! Blocking MySQL connection

use crate::error::{Error, Result};
use crate::traits::{Connection, FromRow};
use crate::value::Value;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder, Row as MySqlAsyncRow};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::row::MySqlRow;
use super::types::to_mysql_value;

/// Default MySQL port.
pub const DEFAULT_PORT: u16 = 3306;

/// Default session character set.
pub const DEFAULT_CHARSET: &str = "utf8mb4";

/// A single blocking MySQL session.
///
/// The session is opened by [`MySqlConnectionBuilder::connect`] and kept
/// until [`MySqlConnection::close`] is called or the value is dropped, so it
/// is released on every exit path of the caller.
///
/// Must not be used from inside another Tokio runtime: every call blocks on
/// the connection's own current-thread runtime.
pub struct MySqlConnection {
    runtime: Runtime,
    conn: Option<Conn>,
}

impl MySqlConnection {
    /// Create a builder for a connection to `database` on `host`.
    pub fn builder(host: &str, database: &str) -> MySqlConnectionBuilder {
        MySqlConnectionBuilder::new(host, database)
    }

    /// Disconnect from the server.
    pub fn close(mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            self.runtime.block_on(conn.disconnect())?;
            debug!("MySQL connection closed");
        }
        Ok(())
    }

    fn parts(&mut self) -> Result<(&Runtime, &mut Conn)> {
        match self.conn.as_mut() {
            Some(conn) => Ok((&self.runtime, conn)),
            None => Err(Error::Connection("connection already closed".into())),
        }
    }
}

impl Drop for MySqlConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = self.runtime.block_on(conn.disconnect()) {
                warn!("Failed to close MySQL connection cleanly: {}", e);
            }
        }
    }
}

impl Connection for MySqlConnection {
    fn execute(&mut self, sql: &str, params: Vec<Value>) -> Result<u64> {
        let (runtime, conn) = self.parts()?;
        let mysql_params: Vec<mysql_async::Value> = params.iter().map(to_mysql_value).collect();

        runtime.block_on(conn.exec_drop(sql, mysql_params))?;
        Ok(conn.affected_rows())
    }

    fn fetch_all<T: FromRow>(&mut self, sql: &str, params: Vec<Value>) -> Result<Vec<T>> {
        let (runtime, conn) = self.parts()?;
        let mysql_params: Vec<mysql_async::Value> = params.iter().map(to_mysql_value).collect();

        let rows: Vec<MySqlAsyncRow> = runtime.block_on(conn.exec(sql, mysql_params))?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let catalog_row = MySqlRow::from_mysql_row(row)?;
            results.push(T::from_row(&catalog_row)?);
        }

        Ok(results)
    }

    fn fetch_optional<T: FromRow>(&mut self, sql: &str, params: Vec<Value>) -> Result<Option<T>> {
        let (runtime, conn) = self.parts()?;
        let mysql_params: Vec<mysql_async::Value> = params.iter().map(to_mysql_value).collect();

        let row: Option<MySqlAsyncRow> = runtime.block_on(conn.exec_first(sql, mysql_params))?;

        match row {
            Some(row) => {
                let catalog_row = MySqlRow::from_mysql_row(row)?;
                Ok(Some(T::from_row(&catalog_row)?))
            }
            None => Ok(None),
        }
    }
}

/// Reject a session character set that is not a plain identifier.
///
/// The charset ends up in `SET NAMES`, which takes no bound parameters.
pub fn check_charset(charset: &str) -> Result<()> {
    if charset.is_empty()
        || !charset
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(Error::Connection(format!("invalid charset: {:?}", charset)));
    }
    Ok(())
}

/// Builder for a [`MySqlConnection`].
///
/// # Example
///
/// ```ignore
/// use relgen_catalog::MySqlConnectionBuilder;
///
/// let conn = MySqlConnectionBuilder::new("db.internal", "shop")
///     .port(3307)
///     .user("reader")
///     .password("secret")
///     .charset("utf8mb4")
///     .connect()?;
/// ```
#[derive(Clone)]
pub struct MySqlConnectionBuilder {
    host: String,
    port: u16,
    database: String,
    user: Option<String>,
    password: Option<String>,
    charset: String,
}

impl MySqlConnectionBuilder {
    /// Create a new builder for `database` on `host`.
    pub fn new(host: &str, database: &str) -> Self {
        Self {
            host: host.to_string(),
            port: DEFAULT_PORT,
            database: database.to_string(),
            user: None,
            password: None,
            charset: DEFAULT_CHARSET.to_string(),
        }
    }

    /// Set the TCP port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the user name.
    pub fn user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Set the session character set (`SET NAMES`).
    pub fn charset(mut self, charset: &str) -> Self {
        self.charset = charset.to_string();
        self
    }

    /// Open the session.
    ///
    /// Any failure to reach or authenticate against the server is reported
    /// as [`Error::Connection`].
    pub fn connect(self) -> Result<MySqlConnection> {
        check_charset(&self.charset)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Connection(format!("failed to start I/O runtime: {}", e)))?;

        let opts = OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .user(self.user.clone())
            .pass(self.password.clone())
            .db_name(Some(self.database.clone()))
            .init(vec![format!("SET NAMES {}", self.charset)]);

        debug!(
            "Connecting to mysql://{}@{}:{}/{}",
            self.user.as_deref().unwrap_or(""),
            self.host,
            self.port,
            self.database
        );

        let conn = runtime.block_on(Conn::new(opts)).map_err(|e| {
            Error::Connection(format!(
                "cannot connect to {}:{}/{}: {}",
                self.host, self.port, self.database, e
            ))
        })?;

        Ok(MySqlConnection {
            runtime,
            conn: Some(conn),
        })
    }
}

impl std::fmt::Debug for MySqlConnectionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConnectionBuilder")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("charset", &self.charset)
            .finish()
    }
}
