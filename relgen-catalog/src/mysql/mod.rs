//! MySQL implementation of the catalog connection

mod connection;
mod row;
mod types;

pub use connection::{check_charset, MySqlConnection, MySqlConnectionBuilder};
pub use row::MySqlRow;
