//! Main code generator orchestrator

use std::path::PathBuf;
use tracing::info;

use crate::config::GeneratorSettings;
use crate::error::Result;
use crate::introspect::SchemaGraph;

use super::model_generator::{generate_models, render_models};
use super::service_generator::{generate_services, render_services};
use super::template::{BuiltinTemplates, DirectoryTemplates, TemplateKind, TemplateSource};

/// Files produced (or, in dry-run mode, planned) by a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub models: Vec<PathBuf>,
    pub services: Vec<PathBuf>,
    pub dry_run: bool,
}

impl GenerationReport {
    /// All paths, models first
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.models.iter().chain(self.services.iter())
    }
}

/// Template source selected by the settings
pub fn template_source(settings: &GeneratorSettings) -> Box<dyn TemplateSource> {
    match &settings.template_dir {
        Some(dir) => Box::new(DirectoryTemplates::new(dir)),
        None => Box::new(BuiltinTemplates),
    }
}

/// Runs the model and service generators over one schema graph
pub struct CodeGenerator<'a> {
    settings: &'a GeneratorSettings,
    templates: Box<dyn TemplateSource>,
}

impl<'a> CodeGenerator<'a> {
    /// Create a generator using the template source the settings name
    pub fn new(settings: &'a GeneratorSettings) -> Self {
        Self {
            settings,
            templates: template_source(settings),
        }
    }

    /// Create a generator with an explicit template source
    pub fn with_templates(settings: &'a GeneratorSettings, templates: Box<dyn TemplateSource>) -> Self {
        Self {
            settings,
            templates,
        }
    }

    /// Generate all enabled outputs
    pub fn generate(&self, graph: &SchemaGraph) -> Result<GenerationReport> {
        let mut report = GenerationReport {
            dry_run: self.settings.dry_run,
            ..Default::default()
        };
        if self.settings.generate_models {
            report.models = self.generate_models(graph)?;
        }
        if self.settings.generate_services {
            report.services = self.generate_services(graph)?;
        }
        Ok(report)
    }

    /// Generate model files
    pub fn generate_models(&self, graph: &SchemaGraph) -> Result<Vec<PathBuf>> {
        let settings = self.settings;
        let model_namespace = settings.model_namespace();
        if settings.dry_run {
            let template = self.templates.load(TemplateKind::Model)?;
            let files = render_models(graph, &template, &model_namespace, &settings.output_dir);
            info!("Dry run: {} models rendered", files.len());
            return Ok(files.into_iter().map(|f| f.path).collect());
        }
        generate_models(
            graph,
            self.templates.as_ref(),
            &model_namespace,
            &settings.output_dir,
        )
    }

    /// Generate service files
    pub fn generate_services(&self, graph: &SchemaGraph) -> Result<Vec<PathBuf>> {
        let settings = self.settings;
        let service_namespace = settings.service_namespace();
        let model_namespace = settings.model_namespace();
        if settings.dry_run {
            let template = self.templates.load(TemplateKind::Service)?;
            let files = render_services(
                graph,
                &template,
                &service_namespace,
                &model_namespace,
                &settings.output_dir,
            );
            info!("Dry run: {} services rendered", files.len());
            return Ok(files.into_iter().map(|f| f.path).collect());
        }
        generate_services(
            graph,
            self.templates.as_ref(),
            &service_namespace,
            &model_namespace,
            &settings.output_dir,
        )
    }
}
