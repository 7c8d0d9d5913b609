//! Core traits for relgen-catalog

mod connection;
mod from_row;
mod from_value;
mod to_value;

pub use connection::Connection;
pub use from_row::{FromRow, Row, RowExt};
pub use from_value::FromValue;
pub use to_value::ToValue;
