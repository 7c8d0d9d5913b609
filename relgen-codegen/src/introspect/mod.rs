//! Schema introspection and relationship derivation

mod catalog;
mod ddl;
mod information_schema;
mod metadata;
mod relationships;

pub use catalog::SchemaCatalog;
pub use ddl::{parse_schema, DdlCatalog, DeclaredTable};
pub use information_schema::InformationSchema;
pub use metadata::*;
pub use relationships::derive_relationships;

use relgen_catalog::MySqlConnection;
use tracing::{debug, info};

use crate::config::{ConnectionParams, TableFilter};
use crate::error::Result;

/// Introspect the live database described by `params`.
///
/// The connection is opened before the first catalog query and released when
/// this function returns, whether it succeeds or fails.
pub fn introspect(params: &ConnectionParams, filter: &TableFilter) -> Result<SchemaGraph> {
    info!(
        "Introspecting {}@{}:{}/{}",
        params.user, params.host, params.port, params.database
    );
    let conn = MySqlConnection::builder(&params.host, &params.database)
        .port(params.port)
        .user(&params.user)
        .password(params.password.expose())
        .charset(&params.charset)
        .connect()?;

    let mut catalog = InformationSchema::new(conn, &params.database);
    let graph = read_schema(&mut catalog, filter)?;
    catalog.into_inner().close()?;

    Ok(graph)
}

/// Read every table from `catalog` and derive the relationship graph.
pub fn read_schema<C: SchemaCatalog + ?Sized>(
    catalog: &mut C,
    filter: &TableFilter,
) -> Result<SchemaGraph> {
    let names = catalog.list_tables()?;
    info!("Found {} tables", names.len());
    if names.is_empty() {
        return Ok(SchemaGraph::default());
    }

    let names: Vec<String> = names.into_iter().filter(|n| filter.matches(n)).collect();
    debug!("After filtering: {} tables", names.len());

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let columns = catalog.list_columns(&name)?;
        let primary_key = catalog
            .primary_key(&name)?
            .unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string());
        let foreign_keys = catalog.list_foreign_keys(&name)?;
        debug!(
            "Table {}: {} columns, primary key {}, {} foreign keys",
            name,
            columns.len(),
            primary_key,
            foreign_keys.len()
        );

        tables.push(TableStructure {
            name,
            columns,
            primary_key,
            foreign_keys,
        });
    }

    derive_relationships(tables)
}
