//! `INFORMATION_SCHEMA` backed catalog

use relgen_catalog::{Connection, FromRow, Query, Row, RowExt};

use super::catalog::SchemaCatalog;
use super::metadata::{ColumnMetadata, ForeignKeyMetadata};
use crate::error::Result;

const TABLES_SQL: &str = "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES \
     WHERE TABLE_SCHEMA = ? ORDER BY CAST(TABLE_NAME AS BINARY)";

const COLUMNS_SQL: &str = "SELECT COLUMN_NAME, DATA_TYPE, IS_NULLABLE, COLUMN_DEFAULT \
     FROM INFORMATION_SCHEMA.COLUMNS \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? ORDER BY ORDINAL_POSITION";

const PRIMARY_KEY_SQL: &str = "SELECT COLUMN_NAME FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND CONSTRAINT_NAME = 'PRIMARY' \
     ORDER BY ORDINAL_POSITION LIMIT 1";

// Ordered by the referencing column's position, so auto-named constraints
// (`t_ibfk_2`, `t_ibfk_10`) do not sort lexicographically.
const FOREIGN_KEYS_SQL: &str =
    "SELECT k.COLUMN_NAME, k.REFERENCED_TABLE_NAME, k.REFERENCED_COLUMN_NAME \
     FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE k \
     JOIN INFORMATION_SCHEMA.COLUMNS c \
       ON c.TABLE_SCHEMA = k.TABLE_SCHEMA AND c.TABLE_NAME = k.TABLE_NAME \
      AND c.COLUMN_NAME = k.COLUMN_NAME \
     WHERE k.TABLE_SCHEMA = ? AND k.TABLE_NAME = ? AND k.REFERENCED_TABLE_NAME IS NOT NULL \
     ORDER BY c.ORDINAL_POSITION, k.CONSTRAINT_NAME";

struct TableNameRow(String);

impl FromRow for TableNameRow {
    fn from_row<R: Row>(row: &R) -> relgen_catalog::Result<Self> {
        Ok(Self(row.get("TABLE_NAME")?))
    }
}

struct KeyColumnRow(String);

impl FromRow for KeyColumnRow {
    fn from_row<R: Row>(row: &R) -> relgen_catalog::Result<Self> {
        Ok(Self(row.get("COLUMN_NAME")?))
    }
}

struct ColumnRow(ColumnMetadata);

impl FromRow for ColumnRow {
    fn from_row<R: Row>(row: &R) -> relgen_catalog::Result<Self> {
        let data_type: String = row.get("DATA_TYPE")?;
        Ok(Self(ColumnMetadata {
            name: row.get("COLUMN_NAME")?,
            data_type: data_type.to_lowercase(),
            nullable: row.get("IS_NULLABLE")?,
            default_value: row.get("COLUMN_DEFAULT")?,
        }))
    }
}

struct ForeignKeyRow(ForeignKeyMetadata);

impl FromRow for ForeignKeyRow {
    fn from_row<R: Row>(row: &R) -> relgen_catalog::Result<Self> {
        Ok(Self(ForeignKeyMetadata {
            column: row.get("COLUMN_NAME")?,
            referenced_table: row.get("REFERENCED_TABLE_NAME")?,
            referenced_column: row.get("REFERENCED_COLUMN_NAME")?,
        }))
    }
}

/// Catalog reading the `INFORMATION_SCHEMA` views of one database.
pub struct InformationSchema<C> {
    conn: C,
    database: String,
}

impl<C: Connection> InformationSchema<C> {
    /// Read the catalog of `database` through `conn`.
    pub fn new(conn: C, database: &str) -> Self {
        Self {
            conn,
            database: database.to_string(),
        }
    }

    /// Give the connection back, e.g. to close it.
    pub fn into_inner(self) -> C {
        self.conn
    }
}

impl<C: Connection> SchemaCatalog for InformationSchema<C> {
    fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows: Vec<TableNameRow> = Query::new(TABLES_SQL)
            .bind(&self.database)
            .fetch_all(&mut self.conn)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnMetadata>> {
        let rows: Vec<ColumnRow> = Query::new(COLUMNS_SQL)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&mut self.conn)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    fn primary_key(&mut self, table: &str) -> Result<Option<String>> {
        let row: Option<KeyColumnRow> = Query::new(PRIMARY_KEY_SQL)
            .bind(&self.database)
            .bind(table)
            .fetch_optional(&mut self.conn)?;
        Ok(row.map(|r| r.0))
    }

    fn list_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyMetadata>> {
        let rows: Vec<ForeignKeyRow> = Query::new(FOREIGN_KEYS_SQL)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&mut self.conn)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
