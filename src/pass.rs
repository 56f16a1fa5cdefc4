// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! One generation pass.
//!
//! A [`Snapshot`] of the calling project's classes and its referenced
//! modules goes in; a [`PassOutput`] of rendered artifacts and diagnostics
//! comes out. The pass is a pure function of the snapshot and the
//! configuration, so identical snapshots produce identical output.
//!
//! ```text
//! Snapshot ──► EntityGraph ──┬──► UiAssembler  ──► render ──► *.generated.ts
//!                            └──► ApiAssembler ──► render ──► *_base_controller.generated.rs
//! ```
//!
//! Rendering failures are reported as `render-failed` diagnostics; the
//! remaining artifacts are still produced. Both sides skip when the calling
//! project declares fewer classes than their `min_classes`; referenced
//! classes do not count.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf}
};

use crate::{
    api::{self, ApiAssembler},
    config::ScaffoldConfig,
    error::{Diagnostic, DiagnosticCode, Result, ScaffoldError},
    graph::EntityGraph,
    model::EntityDef,
    reflect::{ModuleSource, reflect_modules},
    ui::{UiAssembler, render}
};

/// Classes visible to one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Classes of the calling project.
    pub current:      Vec<EntityDef>,
    /// Classes of referenced modules.
    pub referenced:   Vec<EntityDef>,
    /// Names that are values rather than classes, e.g. enums.
    pub value_types:  BTreeSet<String>,
    /// Root of the calling project; output directories are relative to it.
    pub calling_path: PathBuf
}

impl Snapshot {
    /// Empty snapshot rooted at a project path.
    pub fn new(calling_path: impl Into<PathBuf>) -> Self {
        Self {
            calling_path: calling_path.into(),
            ..Self::default()
        }
    }

    /// Add classes of the calling project.
    #[must_use]
    pub fn with_current(mut self, classes: impl IntoIterator<Item = EntityDef>) -> Self {
        self.current.extend(classes);
        self
    }

    /// Add classes of referenced modules.
    #[must_use]
    pub fn with_referenced(mut self, classes: impl IntoIterator<Item = EntityDef>) -> Self {
        self.referenced.extend(classes);
        self
    }

    /// Add value type names.
    #[must_use]
    pub fn with_value_types<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.value_types.extend(names.into_iter().map(Into::into));
        self
    }

    /// Snapshot reflected from Rust module sources.
    ///
    /// # Errors
    ///
    /// Propagates reflection errors.
    pub fn from_sources(
        calling_path: impl Into<PathBuf>,
        current: &[ModuleSource],
        referenced: &[ModuleSource]
    ) -> Result<Self> {
        let current = reflect_modules(current)?;
        let referenced = reflect_modules(referenced)?;
        Ok(Self::new(calling_path)
            .with_current(current.classes)
            .with_referenced(referenced.classes)
            .with_value_types(current.value_types)
            .with_value_types(referenced.value_types))
    }
}

/// Which assembler produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Base details component.
    Ui,
    /// Base controller.
    Api
}

/// A rendered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Producing assembler.
    pub kind:     ArtifactKind,
    /// Target path, under the calling project.
    pub path:     PathBuf,
    /// File contents.
    pub contents: String
}

/// Result of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassOutput {
    /// Rendered artifacts, UI first, each side in graph order.
    pub artifacts:   Vec<Artifact>,
    /// Non-fatal problems.
    pub diagnostics: Vec<Diagnostic>
}

impl PassOutput {
    /// Artifacts of one kind.
    pub fn of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(move |a| a.kind == kind)
    }

    /// Artifact whose file name matches.
    #[must_use]
    pub fn artifact(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|a| a.path.file_name().is_some_and(|n| n == file_name))
    }

    /// Record diagnostics; one already reported by the other side is kept once.
    fn report(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            if !self.diagnostics.contains(&diagnostic) {
                self.diagnostics.push(diagnostic);
            }
        }
    }

    /// Write every artifact, creating directories as needed.
    ///
    /// Files whose contents already match are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Io`] on the first failing file operation.
    pub fn write_to_disk(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for artifact in &self.artifacts {
            if write_if_changed(&artifact.path, &artifact.contents)? {
                written.push(artifact.path.clone());
            }
        }
        tracing::debug!(written = written.len(), total = self.artifacts.len(), "artifacts emitted");
        Ok(written)
    }
}

fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == contents) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| ScaffoldError::io(path, e))?;
    Ok(true)
}

/// Runs generation passes with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: ScaffoldConfig
}

impl Generator {
    /// Create a generator.
    #[must_use]
    pub const fn new(config: ScaffoldConfig) -> Self {
        Self {
            config
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Run one pass.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Render`] if the UI template fails to compile.
    /// Per-artifact failures become diagnostics instead.
    pub fn run(&self, snapshot: Snapshot) -> Result<PassOutput> {
        let Snapshot {
            current,
            referenced,
            value_types,
            calling_path
        } = snapshot;
        let graph =
            EntityGraph::merge(current, referenced, self.config.conventions.clone()).with_value_types(value_types);
        let span = tracing::info_span!(
            "scaffold_pass",
            calling_path = %calling_path.display(),
            classes = graph.len()
        );
        let _enter = span.enter();

        let mut output = PassOutput::default();
        self.ui_pass(&graph, &calling_path, &mut output)?;
        self.api_pass(&graph, &calling_path, &mut output);

        for diagnostic in &output.diagnostics {
            tracing::debug!(code = diagnostic.code.as_str(), entity = %diagnostic.entity, "{}", diagnostic.message);
        }
        tracing::info!(
            artifacts = output.artifacts.len(),
            diagnostics = output.diagnostics.len(),
            "pass finished"
        );
        Ok(output)
    }

    fn ui_pass(&self, graph: &EntityGraph, calling_path: &Path, output: &mut PassOutput) -> Result<()> {
        let config = &self.config.ui;
        if !config.enabled {
            return Ok(());
        }
        if graph.current().len() < config.min_classes {
            tracing::debug!(classes = graph.current().len(), min = config.min_classes, "too few classes, UI pass skipped");
            return Ok(());
        }
        let env = render::environment()?;
        let assembler = UiAssembler::new(graph, config);
        let dir = calling_path.join(&config.output_dir);
        for entity in assembler.eligible() {
            let (artifact, diagnostics) = assembler.assemble(entity);
            output.report(diagnostics);
            match render::render_with(&env, &artifact) {
                Ok(contents) => output.artifacts.push(Artifact {
                    kind: ArtifactKind::Ui,
                    path: dir.join(&artifact.file_name),
                    contents
                }),
                Err(err) => output.diagnostics.push(render_failed(&entity.name, &err))
            }
        }
        Ok(())
    }

    fn api_pass(&self, graph: &EntityGraph, calling_path: &Path, output: &mut PassOutput) {
        let config = &self.config.api;
        if !config.enabled {
            return;
        }
        if graph.current().len() < config.min_classes {
            tracing::debug!(classes = graph.current().len(), min = config.min_classes, "too few classes, API pass skipped");
            return;
        }
        let (artifacts, diagnostics) = ApiAssembler::new(graph).assemble_all();
        output.report(diagnostics);
        let dir = calling_path.join(&config.output_dir);
        for artifact in artifacts {
            match api::render(&artifact, config) {
                Ok(contents) => output.artifacts.push(Artifact {
                    kind: ArtifactKind::Api,
                    path: dir.join(&artifact.file_name),
                    contents
                }),
                Err(err) => output.diagnostics.push(render_failed(&artifact.controller, &err))
            }
        }
    }
}

fn render_failed(scope: &str, err: &ScaffoldError) -> Diagnostic {
    tracing::error!(scope, error = %err, "artifact not rendered");
    Diagnostic::error(DiagnosticCode::RenderFailed, scope, err.to_string())
}
