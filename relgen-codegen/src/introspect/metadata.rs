//! Schema graph data model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Primary key assumed when the catalog reports none
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Metadata for a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,

    /// Declared base type, lower-case (e.g. "bigint", "varchar")
    pub data_type: String,

    /// Whether the column is nullable
    pub nullable: bool,

    /// Default value expression (if any)
    pub default_value: Option<String>,
}

/// Outgoing foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyMetadata {
    /// Column name in this table
    pub column: String,

    /// Referenced table name
    pub referenced_table: String,

    /// Referenced column name
    pub referenced_column: String,
}

/// Structure of one table as read from the catalog, before derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStructure {
    pub name: String,
    pub columns: Vec<ColumnMetadata>,
    pub primary_key: String,
    pub foreign_keys: Vec<ForeignKeyMetadata>,
}

/// Many-to-one: this table holds `foreign_key`, pointing at `owner_key` of `target_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelongsTo {
    pub target_table: String,
    pub foreign_key: String,
    pub owner_key: String,
}

/// One-to-many: `target_table.foreign_key` points back at `local_key` of this table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasMany {
    pub target_table: String,
    pub foreign_key: String,
    pub local_key: String,
}

/// Many-to-many through a pivot table. Never derived; junction tables are
/// reported as a plain pair of `has_many` / `belongs_to` relations instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelongsToMany {
    pub target_table: String,
    pub pivot_table: String,
}

/// Relations derived for one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSet {
    pub belongs_to: Vec<BelongsTo>,
    pub has_many: Vec<HasMany>,
    pub belongs_to_many: Vec<BelongsToMany>,
}

impl RelationshipSet {
    /// True if the table neither references nor is referenced by another table
    pub fn is_empty(&self) -> bool {
        self.belongs_to.is_empty() && self.has_many.is_empty() && self.belongs_to_many.is_empty()
    }
}

/// A table together with its derived relations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,

    /// Columns in the table, in ordinal order
    pub columns: Vec<ColumnMetadata>,

    /// Primary key column
    pub primary_key: String,

    /// Foreign key constraints, in catalog order
    pub foreign_keys: Vec<ForeignKeyMetadata>,

    /// Derived relations
    pub relationships: RelationshipSet,
}

impl TableSchema {
    pub(crate) fn new(table: TableStructure, relationships: RelationshipSet) -> Self {
        Self {
            name: table.name,
            columns: table.columns,
            primary_key: table.primary_key,
            foreign_keys: table.foreign_keys,
            relationships,
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// All tables of one run, in catalog listing order, keyed by unique name.
///
/// Built once by the introspector and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaGraph {
    tables: Vec<TableSchema>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SchemaGraph {
    pub(crate) fn from_parts(tables: Vec<TableSchema>, index: HashMap<String, usize>) -> Self {
        Self { tables, index }
    }

    /// Look up a table by name
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Tables in stable order
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the graph has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
