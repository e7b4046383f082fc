// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project Loader (C3): reads `dft_project.yml`, recursively discovers
//! `pipelines/**/*.yml` (each file may hold several `---`-separated YAML
//! documents, one per pipeline), converts the raw wire shapes into
//! `dft_core::{Project, Pipeline}`, and validates every cross-reference
//! that doesn't require graph algorithms (those belong to the DAG, C5).
//!
//! The loader never renders templates: `config` and `variables` leaves are
//! carried through as opaque JSON, to be evaluated later against a
//! `RenderContext`.

use crate::error::{DependencyError, DuplicatePipelineError, LoadError, PipelineParseError, ProjectError};
use crate::raw::{PipelineRaw, StepRaw};
use crate::registry::ComponentRegistry;
use dft_core::{MicrobatchConfig, Pipeline, PipelineName, Project, Step};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Everything the engine needs to plan and run: the project config, every
/// declared pipeline keyed by name (insertion order = discovery order, not
/// significant — the DAG imposes the order that matters), and the
/// component registry used to validate `component_type` references.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub project: Project,
    pub pipelines: IndexMap<PipelineName, Pipeline>,
    pub registry: ComponentRegistry,
}

impl LoadedProject {
    pub fn pipeline(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.get(name)
    }
}

/// Load and validate a project rooted at `root`.
pub fn load_project(root: &Path) -> Result<LoadedProject, LoadError> {
    tracing::debug!(root = %root.display(), "loading project");
    let project = load_project_file(&root.join("dft_project.yml"))?;
    let registry = ComponentRegistry::load(&root.join("components"))?;
    let pipelines = load_pipelines(&root.join("pipelines"))?;
    tracing::info!(pipelines = pipelines.len(), "project loaded");

    let loaded = LoadedProject {
        project,
        pipelines,
        registry,
    };
    let errors = validate_references(&loaded);
    if !errors.is_empty() {
        tracing::warn!(errors = errors.len(), "project failed reference validation");
        return Err(LoadError::Dependencies { errors });
    }
    Ok(loaded)
}

fn load_project_file(path: &Path) -> Result<Project, ProjectError> {
    if !path.exists() {
        return Err(ProjectError::NotFound(path.to_path_buf()));
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| ProjectError::Io(path.to_path_buf(), e))?;
    serde_yaml::from_str(&content).map_err(|e| ProjectError::Yaml(path.to_path_buf(), e))
}

fn load_pipelines(pipelines_dir: &Path) -> Result<IndexMap<PipelineName, Pipeline>, LoadError> {
    let mut pipelines: IndexMap<PipelineName, Pipeline> = IndexMap::new();
    let mut origin: IndexMap<PipelineName, PathBuf> = IndexMap::new();

    if !pipelines_dir.exists() {
        return Ok(pipelines);
    }

    for file in collect_yaml_files(pipelines_dir)
        .map_err(|e| LoadError::Project(ProjectError::Io(pipelines_dir.to_path_buf(), e)))?
    {
        let content = std::fs::read_to_string(&file)
            .map_err(|e| PipelineParseError::new(&file, e.to_string()))?;

        for document in serde_yaml::Deserializer::from_str(&content) {
            let raw = PipelineRaw::deserialize(document)
                .map_err(|e| PipelineParseError::new(&file, e.to_string()))?;
            let pipeline = convert_pipeline(&file, raw)?;
            let name = pipeline.name.clone();

            if let Some(prev_file) = origin.get(&name) {
                return Err(DuplicatePipelineError {
                    name: name.as_str().to_string(),
                    files: [prev_file.clone(), file.clone()],
                }
                .into());
            }
            origin.insert(name.clone(), file.clone());
            pipelines.insert(name, pipeline);
        }
    }

    Ok(pipelines)
}

const MICROBATCH_KEY: &str = "microbatch";

fn convert_pipeline(file: &Path, raw: PipelineRaw) -> Result<Pipeline, PipelineParseError> {
    let mut variables = raw.variables;
    let microbatch = match variables.shift_remove(MICROBATCH_KEY) {
        Some(value) => Some(
            serde_json::from_value::<MicrobatchConfig>(value)
                .map_err(|e| PipelineParseError::new(file, format!("variables.microbatch: {e}")))?,
        ),
        None => None,
    };

    let steps = raw
        .steps
        .into_iter()
        .map(|s| convert_step(file, &raw.pipeline_name, s))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Pipeline {
        name: PipelineName::new(raw.pipeline_name),
        description: raw.description,
        tags: raw.tags,
        depends_on: raw.depends_on.into_iter().map(PipelineName::new).collect(),
        variables,
        microbatch,
        steps,
    })
}

fn convert_step(file: &Path, pipeline_name: &str, raw: StepRaw) -> Result<Step, PipelineParseError> {
    let component_type = raw.declared_component_type().ok_or_else(|| {
        PipelineParseError::new(
            file,
            format!(
                "pipeline '{}' step '{}': missing {}_type for kind {}",
                pipeline_name,
                raw.id,
                raw.kind.as_str(),
                raw.kind.as_str()
            ),
        )
    })?;

    Ok(Step {
        id: raw.id,
        kind: raw.kind,
        component_type: component_type.to_string(),
        connection: raw.connection,
        depends_on: raw.depends_on,
        config: raw.config,
    })
}

/// Check every `depends_on`, `connection`, and `component_type` reference.
/// Does not check for cycles — that's `dft_engine::dag`'s job.
fn validate_references(loaded: &LoadedProject) -> Vec<DependencyError> {
    let mut errors = Vec::new();

    for (name, pipeline) in &loaded.pipelines {
        for dep in &pipeline.depends_on {
            if !loaded.pipelines.contains_key(dep) {
                errors.push(DependencyError::UnknownPipeline {
                    pipeline: name.as_str().to_string(),
                    target: dep.as_str().to_string(),
                });
            }
        }

        for step in &pipeline.steps {
            for dep in &step.depends_on {
                if pipeline.step(dep.as_str()).is_none() {
                    errors.push(DependencyError::UnknownStep {
                        pipeline: name.as_str().to_string(),
                        step: step.id.as_str().to_string(),
                        target: dep.as_str().to_string(),
                    });
                }
            }

            if let Some(connection) = &step.connection {
                if !loaded.project.connections.contains_key(connection) {
                    errors.push(DependencyError::UnknownConnection {
                        pipeline: name.as_str().to_string(),
                        step: step.id.as_str().to_string(),
                        connection: connection.clone(),
                    });
                }
            }

            if !loaded.registry.knows(step.kind, &step.component_type) {
                errors.push(DependencyError::UnknownComponentType {
                    pipeline: name.as_str().to_string(),
                    step: step.id.as_str().to_string(),
                    kind: step.kind.as_str().to_string(),
                    component_type: step.component_type.clone(),
                });
            }
        }
    }

    errors
}

/// Recursively collect `.yml`/`.yaml` files under `dir`, depth-first.
fn collect_yaml_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let mut entries: Vec<_> = std::fs::read_dir(&current)?.flatten().collect();
        entries.sort_by_key(|e| e.path());
        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if matches!(path.extension().and_then(|e| e.to_str()), Some("yml" | "yaml")) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
