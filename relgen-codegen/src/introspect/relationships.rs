//! Relationship derivation over the whole table set

use std::collections::HashMap;
use tracing::debug;

use super::metadata::{BelongsTo, HasMany, RelationshipSet, SchemaGraph, TableSchema, TableStructure};
use crate::error::{CodegenError, Result};

/// Turn raw table structures into the bidirectional relationship graph.
///
/// Every foreign key `A.col -> B.refcol` yields one `belongs_to` entry on A and
/// its mirror `has_many` entry on B. Entries are appended in table order, then
/// foreign key order, which fixes the order of generated methods.
pub fn derive_relationships(tables: Vec<TableStructure>) -> Result<SchemaGraph> {
    let mut index = HashMap::with_capacity(tables.len());
    for (i, table) in tables.iter().enumerate() {
        if index.insert(table.name.clone(), i).is_some() {
            return Err(CodegenError::Introspection(format!(
                "Table `{}` is listed more than once",
                table.name
            )));
        }
    }

    let mut relationships = vec![RelationshipSet::default(); tables.len()];

    for (owner, table) in tables.iter().enumerate() {
        for fk in &table.foreign_keys {
            let target = *index.get(&fk.referenced_table).ok_or_else(|| {
                CodegenError::Introspection(format!(
                    "Foreign key `{}`.`{}` references table `{}`, which is not part of the introspected schema",
                    table.name, fk.column, fk.referenced_table
                ))
            })?;

            debug!(
                "{}.{} -> {}.{}",
                table.name, fk.column, fk.referenced_table, fk.referenced_column
            );

            relationships[owner].belongs_to.push(BelongsTo {
                target_table: fk.referenced_table.clone(),
                foreign_key: fk.column.clone(),
                owner_key: fk.referenced_column.clone(),
            });
            relationships[target].has_many.push(HasMany {
                target_table: table.name.clone(),
                foreign_key: fk.column.clone(),
                local_key: fk.referenced_column.clone(),
            });
        }
    }

    let tables = tables
        .into_iter()
        .zip(relationships)
        .map(|(table, rels)| TableSchema::new(table, rels))
        .collect();

    Ok(SchemaGraph::from_parts(tables, index))
}
