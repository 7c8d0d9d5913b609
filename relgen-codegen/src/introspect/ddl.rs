//! Offline catalog built from MySQL DDL using sqlparser-rs

use sqlparser::ast::{
    ColumnOption, Expr, ForeignKeyConstraint, Ident, IndexColumn, ObjectName,
    PrimaryKeyConstraint, Statement, TableConstraint, Value as SqlValue,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

use super::catalog::SchemaCatalog;
use super::metadata::{ColumnMetadata, ForeignKeyMetadata};
use crate::error::{CodegenError, Result};

/// A table as declared by a `CREATE TABLE` statement
#[derive(Debug, Clone)]
pub struct DeclaredTable {
    pub name: String,
    pub columns: Vec<ColumnMetadata>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyMetadata>,
}

/// Parse a SQL schema string into declared tables, in declaration order
pub fn parse_schema(sql: &str) -> Result<Vec<DeclaredTable>> {
    let dialect = MySqlDialect {};
    let statements = Parser::parse_sql(&dialect, sql)?;

    let mut tables = Vec::new();

    for stmt in statements {
        if let Statement::CreateTable(create_table) = stmt {
            tables.push(extract_table(&create_table));
        }
    }

    Ok(tables)
}

/// Catalog answering from parsed DDL instead of a live server.
#[derive(Debug, Clone)]
pub struct DdlCatalog {
    tables: Vec<DeclaredTable>,
}

impl DdlCatalog {
    /// Parse `sql` and serve its `CREATE TABLE` statements.
    pub fn from_sql(sql: &str) -> Result<Self> {
        Ok(Self::new(parse_schema(sql)?))
    }

    /// Serve already declared tables.
    ///
    /// Answers follow the live catalog's order: tables by name, foreign keys
    /// by the position of their column.
    pub fn new(mut tables: Vec<DeclaredTable>) -> Self {
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        for table in &mut tables {
            let columns = &table.columns;
            table.foreign_keys.sort_by_key(|fk| {
                columns
                    .iter()
                    .position(|c| c.name == fk.column)
                    .unwrap_or(usize::MAX)
            });
        }
        Self { tables }
    }

    fn table(&self, name: &str) -> Result<&DeclaredTable> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| CodegenError::Introspection(format!("Unknown table `{}`", name)))
    }
}

impl SchemaCatalog for DdlCatalog {
    fn list_tables(&mut self) -> Result<Vec<String>> {
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnMetadata>> {
        Ok(self.table(table)?.columns.clone())
    }

    fn primary_key(&mut self, table: &str) -> Result<Option<String>> {
        Ok(self.table(table)?.primary_key.first().cloned())
    }

    fn list_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyMetadata>> {
        Ok(self.table(table)?.foreign_keys.clone())
    }
}

/// Extract table structure from a CREATE TABLE statement
fn extract_table(create: &sqlparser::ast::CreateTable) -> DeclaredTable {
    let name = extract_table_name(&create.name);

    let mut columns = Vec::new();
    let mut foreign_keys = Vec::new();
    let mut primary_key = Vec::new();

    for col_def in &create.columns {
        let (column, col_pk) = extract_column(col_def);
        if col_pk {
            primary_key = vec![column.name.clone()];
        }
        columns.push(column);
    }

    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey(PrimaryKeyConstraint {
                columns: pk_cols, ..
            }) => {
                primary_key = pk_cols
                    .iter()
                    .map(extract_ident_from_index_column)
                    .collect();
                for col_name in &primary_key {
                    if let Some(col) = columns.iter_mut().find(|c| &c.name == col_name) {
                        col.nullable = false;
                    }
                }
            }
            TableConstraint::ForeignKey(ForeignKeyConstraint {
                columns: fk_cols,
                foreign_table,
                referred_columns,
                ..
            }) => {
                for (col, ref_col) in fk_cols.iter().zip(referred_columns.iter()) {
                    foreign_keys.push(ForeignKeyMetadata {
                        column: extract_ident(col),
                        referenced_table: extract_table_name(foreign_table),
                        referenced_column: extract_ident(ref_col),
                    });
                }
            }
            _ => {}
        }
    }

    DeclaredTable {
        name,
        columns,
        primary_key,
        foreign_keys,
    }
}

/// Extract column metadata, and whether the column is declared PRIMARY KEY
fn extract_column(col_def: &sqlparser::ast::ColumnDef) -> (ColumnMetadata, bool) {
    let name = extract_ident(&col_def.name);
    let data_type = base_type_name(&format!("{}", col_def.data_type));

    let mut nullable = true;
    let mut default_value = None;
    let mut is_primary = false;

    for option in &col_def.options {
        match &option.option {
            ColumnOption::NotNull => {
                nullable = false;
            }
            ColumnOption::Null => {
                nullable = true;
            }
            ColumnOption::Default(expr) => {
                default_value = default_literal(expr);
            }
            ColumnOption::PrimaryKey(_) => {
                is_primary = true;
                nullable = false;
            }
            _ => {}
        }
    }

    let column = ColumnMetadata {
        name,
        data_type,
        nullable,
        default_value,
    };

    (column, is_primary)
}

/// `VARCHAR(255)` -> `varchar`, `BIGINT UNSIGNED` -> `bigint`, matching
/// what `INFORMATION_SCHEMA.COLUMNS.DATA_TYPE` reports.
fn base_type_name(declared: &str) -> String {
    declared
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Default as the catalog would report it: string literals unquoted, NULL as none
fn default_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Value(v) => match &v.value {
            SqlValue::Null => None,
            SqlValue::SingleQuotedString(s) | SqlValue::DoubleQuotedString(s) => Some(s.clone()),
            other => Some(other.to_string()),
        },
        other => Some(other.to_string()),
    }
}

/// Extract a simple string from an ObjectName
fn extract_table_name(name: &ObjectName) -> String {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

/// Extract a string from an Ident, removing backticks if present
fn extract_ident(ident: &Ident) -> String {
    ident.value.clone()
}

/// Extract a column name string from an IndexColumn
fn extract_ident_from_index_column(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_table() {
        let sql = r#"
            CREATE TABLE users (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                username VARCHAR(255) NOT NULL,
                nickname VARCHAR(64) DEFAULT 'anon'
            );
        "#;

        let tables = parse_schema(sql).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "users");
        assert_eq!(tables[0].columns.len(), 3);
        assert_eq!(tables[0].primary_key, vec!["id".to_string()]);
        assert_eq!(tables[0].columns[1].data_type, "varchar");
        assert!(!tables[0].columns[1].nullable);
        assert!(tables[0].columns[2].nullable);
        assert_eq!(tables[0].columns[2].default_value.as_deref(), Some("anon"));
    }

    #[test]
    fn test_parse_foreign_key() {
        let sql = r#"
            CREATE TABLE orders (
                id BIGINT PRIMARY KEY,
                user_id BIGINT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            );
        "#;

        let tables = parse_schema(sql).unwrap();
        assert_eq!(tables[0].foreign_keys.len(), 1);
        assert_eq!(tables[0].foreign_keys[0].column, "user_id");
        assert_eq!(tables[0].foreign_keys[0].referenced_table, "users");
        assert_eq!(tables[0].foreign_keys[0].referenced_column, "id");
    }

    #[test]
    fn test_composite_primary_key_reports_first_column() {
        let sql = r#"
            CREATE TABLE order_items (
                order_id BIGINT,
                product_id BIGINT,
                quantity INT NOT NULL,
                PRIMARY KEY (order_id, product_id)
            );
        "#;

        let mut catalog = DdlCatalog::from_sql(sql).unwrap();
        assert_eq!(
            catalog.primary_key("order_items").unwrap(),
            Some("order_id".to_string())
        );
        let columns = catalog.list_columns("order_items").unwrap();
        assert!(!columns[0].nullable);
        assert!(!columns[1].nullable);
    }

    #[test]
    fn test_catalog_lists_tables_by_name() {
        let sql = r#"
            CREATE TABLE zebras (id INT PRIMARY KEY);
            CREATE TABLE apples (id INT PRIMARY KEY);
            CREATE TABLE Pears (id INT PRIMARY KEY);
        "#;
        let mut catalog = DdlCatalog::from_sql(sql).unwrap();
        // byte order, as `CAST(TABLE_NAME AS BINARY)` sorts
        assert_eq!(catalog.list_tables().unwrap(), vec!["Pears", "apples", "zebras"]);
        assert!(catalog.list_columns("pears").is_err());
    }

    #[test]
    fn test_foreign_keys_follow_column_position() {
        let sql = r#"
            CREATE TABLE t (
                id INT PRIMARY KEY,
                a_id INT,
                b_id INT,
                c_id INT,
                CONSTRAINT t_ibfk_10 FOREIGN KEY (c_id) REFERENCES c (id),
                CONSTRAINT t_ibfk_2 FOREIGN KEY (b_id) REFERENCES b (id),
                CONSTRAINT t_ibfk_1 FOREIGN KEY (a_id) REFERENCES a (id)
            );
        "#;
        let mut catalog = DdlCatalog::from_sql(sql).unwrap();
        let columns: Vec<String> = catalog
            .list_foreign_keys("t")
            .unwrap()
            .into_iter()
            .map(|fk| fk.column)
            .collect();
        assert_eq!(columns, vec!["a_id", "b_id", "c_id"]);

        // parsing alone keeps declaration order
        let tables = parse_schema(sql).unwrap();
        assert_eq!(tables[0].foreign_keys[0].column, "c_id");
    }

    #[test]
    fn test_table_without_primary_key() {
        let mut catalog =
            DdlCatalog::from_sql("CREATE TABLE logs (message TEXT);").unwrap();
        assert_eq!(catalog.primary_key("logs").unwrap(), None);
    }

    #[test]
    fn test_invalid_sql() {
        let err = DdlCatalog::from_sql("CREATE TABLE (").unwrap_err();
        assert_eq!(err.kind(), "IntrospectionError");
    }
}
