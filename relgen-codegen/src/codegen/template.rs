//! Stub templates and `{{token}}` substitution

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CodegenError, Result};

const BUILTIN_MODEL: &str = include_str!("../../stubs/model.stub");
const BUILTIN_SERVICE: &str = include_str!("../../stubs/service.stub");

/// The two templates a run consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Model,
    Service,
}

impl TemplateKind {
    /// Template name, also the stub file stem
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::Model => "model",
            TemplateKind::Service => "service",
        }
    }

    /// Placeholders recognized in this template
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            TemplateKind::Model => &["namespace", "className", "tableName", "relationships"],
            TemplateKind::Service => &[
                "namespace",
                "modelNamespace",
                "className",
                "modelClass",
                "relationshipsArray",
                "relatedCreateLogic",
                "relatedUpdateLogic",
                "relatedDeleteLogic",
            ],
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where template text comes from
pub trait TemplateSource {
    /// Load the template text for `kind`.
    fn load(&self, kind: TemplateKind) -> Result<String>;
}

/// Stubs compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateSource for BuiltinTemplates {
    fn load(&self, kind: TemplateKind) -> Result<String> {
        Ok(match kind {
            TemplateKind::Model => BUILTIN_MODEL,
            TemplateKind::Service => BUILTIN_SERVICE,
        }
        .to_string())
    }
}

/// Stubs read from `<dir>/<name>.stub`
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    dir: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the stub for `kind`
    pub fn path_of(&self, kind: TemplateKind) -> PathBuf {
        self.dir.join(format!("{}.stub", kind.name()))
    }
}

impl TemplateSource for DirectoryTemplates {
    fn load(&self, kind: TemplateKind) -> Result<String> {
        let path = self.path_of(kind);
        debug!("Loading {} template from {}", kind, path.display());
        std::fs::read_to_string(&path).map_err(|e| {
            CodegenError::Template(format!(
                "Could not read {} stub at {}: {}",
                kind,
                path.display(),
                e
            ))
        })
    }
}

/// Substitute `{{token}}` placeholders in a single left-to-right pass.
///
/// Only tokens recognized for `kind` are replaced, every occurrence of them.
/// Unknown placeholders are copied through untouched, as is any placeholder
/// without a value in `values`. Substituted text is never rescanned.
pub fn render(template: &str, kind: TemplateKind, values: &[(&str, &str)]) -> String {
    let recognized = kind.tokens();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let token = &after_open[..end];
        let value = if recognized.contains(&token) {
            values.iter().find(|(k, _)| *k == token).map(|(_, v)| *v)
        } else {
            None
        };

        match value {
            Some(v) => {
                out.push_str(v);
                rest = &after_open[end + 2..];
            }
            None => {
                // Emit one brace only: `{{{token}}}` must still match `{{token}}`.
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_occurrence() {
        let out = render(
            "class {{className}} {} // {{className}}",
            TemplateKind::Model,
            &[("className", "Product")],
        );
        assert_eq!(out, "class Product {} // Product");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        let out = render(
            "{{namespace}} {{author}} {{modelClass}}",
            TemplateKind::Model,
            &[("namespace", "App\\Models"), ("modelClass", "X")],
        );
        assert_eq!(out, "App\\Models {{author}} {{modelClass}}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = render(
            "{{tableName}}|{{className}}",
            TemplateKind::Model,
            &[("tableName", "{{className}}"), ("className", "Product")],
        );
        assert_eq!(out, "{{className}}|Product");
    }

    #[test]
    fn test_unterminated_placeholder() {
        let out = render("a {{className", TemplateKind::Model, &[("className", "X")]);
        assert_eq!(out, "a {{className");
    }

    #[test]
    fn test_nested_braces() {
        let out = render("{{{{className}}}}", TemplateKind::Model, &[("className", "X")]);
        assert_eq!(out, "{{X}}");

        let out = render("{{{className}}}", TemplateKind::Model, &[("className", "X")]);
        assert_eq!(out, "{X}");
    }

    #[test]
    fn test_builtin_templates_carry_all_tokens() {
        for kind in [TemplateKind::Model, TemplateKind::Service] {
            let text = BuiltinTemplates.load(kind).unwrap();
            for token in kind.tokens() {
                assert!(
                    text.contains(&format!("{{{{{}}}}}", token)),
                    "{} stub lacks {}",
                    kind,
                    token
                );
            }
        }
    }

    #[test]
    fn test_directory_templates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.stub"), "<?php // {{className}}").unwrap();
        let source = DirectoryTemplates::new(dir.path());

        assert_eq!(
            source.load(TemplateKind::Model).unwrap(),
            "<?php // {{className}}"
        );
        let err = source.load(TemplateKind::Service).unwrap_err();
        assert!(matches!(err, CodegenError::Template(ref m) if m.contains("service.stub")));
    }
}
