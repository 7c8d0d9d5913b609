//! Model generator - renders one model class per table

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::introspect::{RelationshipSet, SchemaGraph, TableSchema};

use super::naming::{class_name_of, relation_accessor_name};
use super::output::{ensure_dir, write_file, GeneratedFile};
use super::template::{render, TemplateKind, TemplateSource};

/// Directory under the output root receiving models
pub const MODELS_DIR: &str = "Models";

/// Generate model files for all tables, returning the written paths
pub fn generate_models(
    graph: &SchemaGraph,
    templates: &dyn TemplateSource,
    model_namespace: &str,
    output_root: &Path,
) -> Result<Vec<PathBuf>> {
    let models_dir = output_root.join(MODELS_DIR);
    ensure_dir(&models_dir)?;

    let template = templates.load(TemplateKind::Model)?;
    let files = render_models(graph, &template, model_namespace, output_root);

    for file in &files {
        write_file(file)?;
    }
    info!("Wrote {} models to {}", files.len(), models_dir.display());

    Ok(files.into_iter().map(|f| f.path).collect())
}

/// Render model files without touching the filesystem
pub fn render_models(
    graph: &SchemaGraph,
    template: &str,
    model_namespace: &str,
    output_root: &Path,
) -> Vec<GeneratedFile> {
    let models_dir = output_root.join(MODELS_DIR);

    graph
        .tables()
        .iter()
        .map(|table| {
            let class_name = class_name_of(&table.name);
            debug!("Rendering model {} for table {}", class_name, table.name);
            GeneratedFile {
                path: models_dir.join(format!("{}.php", class_name)),
                contents: render_model(table, template, model_namespace),
            }
        })
        .collect()
}

/// Render the model class of one table
pub fn render_model(table: &TableSchema, template: &str, model_namespace: &str) -> String {
    let class_name = class_name_of(&table.name);
    let relationships = relationship_methods(&table.relationships, model_namespace);

    render(
        template,
        TemplateKind::Model,
        &[
            ("namespace", model_namespace),
            ("className", &class_name),
            ("tableName", &table.name),
            ("relationships", &relationships),
        ],
    )
}

/// Accessor methods for every relation: `belongsTo` ones first, then `hasMany`.
pub fn relationship_methods(relationships: &RelationshipSet, model_namespace: &str) -> String {
    let mut code = String::new();

    for rel in &relationships.belongs_to {
        push_accessor(
            &mut code,
            &relation_accessor_name(&rel.target_table, false),
            "belongsTo",
            &format!("\\{}\\{}", model_namespace, class_name_of(&rel.target_table)),
            &rel.foreign_key,
            &rel.owner_key,
        );
    }

    for rel in &relationships.has_many {
        push_accessor(
            &mut code,
            &relation_accessor_name(&rel.target_table, true),
            "hasMany",
            &format!("\\{}\\{}", model_namespace, class_name_of(&rel.target_table)),
            &rel.foreign_key,
            &rel.local_key,
        );
    }

    code
}

fn push_accessor(
    code: &mut String,
    method: &str,
    association: &str,
    target_class: &str,
    foreign_key: &str,
    other_key: &str,
) {
    let _ = write!(
        code,
        "\n    public function {method}()\n    {{\n        return $this->{association}({target_class}::class, '{foreign_key}', '{other_key}');\n    }}\n"
    );
}
