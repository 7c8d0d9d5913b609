//! Service generator - renders one service class per table
//!
//! Cascade logic is derived from `hasMany` relations only. For `belongsTo`
//! the foreign key lives on the model itself and is saved with it.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::introspect::{RelationshipSet, SchemaGraph, TableSchema};

use super::naming::{class_name_of, relation_accessor_name, service_class_name_of};
use super::output::{ensure_dir, write_file, GeneratedFile};
use super::template::{render, TemplateKind, TemplateSource};

/// Directory under the output root receiving services
pub const SERVICES_DIR: &str = "Services";

/// Generate service files for all tables, returning the written paths
pub fn generate_services(
    graph: &SchemaGraph,
    templates: &dyn TemplateSource,
    service_namespace: &str,
    model_namespace: &str,
    output_root: &Path,
) -> Result<Vec<PathBuf>> {
    let services_dir = output_root.join(SERVICES_DIR);
    ensure_dir(&services_dir)?;

    let template = templates.load(TemplateKind::Service)?;
    let files = render_services(graph, &template, service_namespace, model_namespace, output_root);

    for file in &files {
        write_file(file)?;
    }
    info!("Wrote {} services to {}", files.len(), services_dir.display());

    Ok(files.into_iter().map(|f| f.path).collect())
}

/// Render service files without touching the filesystem
pub fn render_services(
    graph: &SchemaGraph,
    template: &str,
    service_namespace: &str,
    model_namespace: &str,
    output_root: &Path,
) -> Vec<GeneratedFile> {
    let services_dir = output_root.join(SERVICES_DIR);

    graph
        .tables()
        .iter()
        .map(|table| {
            let class_name = service_class_name_of(&table.name);
            debug!("Rendering service {} for table {}", class_name, table.name);
            GeneratedFile {
                path: services_dir.join(format!("{}.php", class_name)),
                contents: render_service(table, template, service_namespace, model_namespace),
            }
        })
        .collect()
}

/// Render the service class of one table
pub fn render_service(
    table: &TableSchema,
    template: &str,
    service_namespace: &str,
    model_namespace: &str,
) -> String {
    let rels = &table.relationships;
    let class_name = service_class_name_of(&table.name);
    let model_class = class_name_of(&table.name);
    let relationships_array = relationship_names(rels)
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(",");

    render(
        template,
        TemplateKind::Service,
        &[
            ("namespace", service_namespace),
            ("modelNamespace", model_namespace),
            ("className", &class_name),
            ("modelClass", &model_class),
            ("relationshipsArray", &relationships_array),
            ("relatedCreateLogic", &related_create_logic(rels)),
            ("relatedUpdateLogic", &related_update_logic(rels)),
            ("relatedDeleteLogic", &related_delete_logic(rels)),
        ],
    )
}

/// Accessor names of all relations, `belongsTo` first
pub fn relationship_names(relationships: &RelationshipSet) -> Vec<String> {
    relationships
        .belongs_to
        .iter()
        .map(|rel| relation_accessor_name(&rel.target_table, false))
        .chain(
            relationships
                .has_many
                .iter()
                .map(|rel| relation_accessor_name(&rel.target_table, true)),
        )
        .collect()
}

fn has_many_accessors(relationships: &RelationshipSet) -> impl Iterator<Item = String> + '_ {
    relationships
        .has_many
        .iter()
        .map(|rel| relation_accessor_name(&rel.target_table, true))
}

/// Create children passed under the accessor's key
pub fn related_create_logic(relationships: &RelationshipSet) -> String {
    let mut code = String::new();
    for m in has_many_accessors(relationships) {
        let _ = write!(
            code,
            "if (isset($data['{m}'])) {{\n    $model->{m}()->createMany($data['{m}']);\n}}\n"
        );
    }
    code
}

/// Replace children passed under the accessor's key: delete all, then create
pub fn related_update_logic(relationships: &RelationshipSet) -> String {
    let mut code = String::new();
    for m in has_many_accessors(relationships) {
        let _ = write!(
            code,
            "if (isset($data['{m}'])) {{\n    $model->{m}()->delete();\n    $model->{m}()->createMany($data['{m}']);\n}}\n"
        );
    }
    code
}

/// Delete direct children; grandchildren are not visited
pub fn related_delete_logic(relationships: &RelationshipSet) -> String {
    let mut code = String::new();
    for m in has_many_accessors(relationships) {
        let _ = writeln!(code, "$model->{m}()->delete();");
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{BelongsTo, HasMany};

    fn order_rels() -> RelationshipSet {
        RelationshipSet {
            belongs_to: vec![BelongsTo {
                target_table: "users".into(),
                foreign_key: "user_id".into(),
                owner_key: "id".into(),
            }],
            has_many: vec![
                HasMany {
                    target_table: "order_items".into(),
                    foreign_key: "order_id".into(),
                    local_key: "id".into(),
                },
                HasMany {
                    target_table: "payments".into(),
                    foreign_key: "order_id".into(),
                    local_key: "id".into(),
                },
            ],
            belongs_to_many: vec![],
        }
    }

    #[test]
    fn test_relationship_names() {
        assert_eq!(
            relationship_names(&order_rels()),
            vec!["user", "orderItems", "payments"]
        );
    }

    #[test]
    fn test_create_logic() {
        let code = related_create_logic(&order_rels());
        assert_eq!(
            code,
            "if (isset($data['orderItems'])) {\n    $model->orderItems()->createMany($data['orderItems']);\n}\n\
             if (isset($data['payments'])) {\n    $model->payments()->createMany($data['payments']);\n}\n"
        );
    }

    #[test]
    fn test_update_logic_replaces() {
        let code = related_update_logic(&order_rels());
        let delete = code.find("$model->orderItems()->delete();").unwrap();
        let create = code.find("$model->orderItems()->createMany").unwrap();
        assert!(delete < create);
        assert_eq!(code.matches("if (isset(").count(), 2);
    }

    #[test]
    fn test_delete_logic_is_unconditional() {
        let code = related_delete_logic(&order_rels());
        assert_eq!(
            code,
            "$model->orderItems()->delete();\n$model->payments()->delete();\n"
        );
    }

    #[test]
    fn test_belongs_to_only_has_no_cascade() {
        let rels = RelationshipSet {
            has_many: vec![],
            ..order_rels()
        };
        assert_eq!(related_create_logic(&rels), "");
        assert_eq!(related_update_logic(&rels), "");
        assert_eq!(related_delete_logic(&rels), "");
    }

    #[test]
    fn test_render_service() {
        let table = TableSchema {
            name: "orders".into(),
            columns: vec![],
            primary_key: "id".into(),
            foreign_keys: vec![],
            relationships: order_rels(),
        };
        let out = render_service(
            &table,
            "{{namespace}}|{{modelNamespace}}|{{className}}|{{modelClass}}|[{{relationshipsArray}}]",
            "App\\Services",
            "App\\Models",
        );
        assert_eq!(
            out,
            "App\\Services|App\\Models|OrderService|Order|['user','orderItems','payments']"
        );
    }
}
