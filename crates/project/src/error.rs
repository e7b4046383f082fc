// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while loading a project directory into the typed model.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level project file (`dft_project.yml`) is missing or malformed.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("{path}: not found", path = .0.display())]
    NotFound(PathBuf),
    #[error("{path}: {source}", path = .0.display())]
    Io(PathBuf, #[source] std::io::Error),
    #[error("{path}: {source}", path = .0.display())]
    Yaml(PathBuf, #[source] serde_yaml::Error),
}

/// A single pipeline file failed to parse.
#[derive(Debug, Error)]
#[error("{file}: {detail}", file = .file.display())]
pub struct PipelineParseError {
    pub file: PathBuf,
    pub detail: String,
}

impl PipelineParseError {
    pub fn new(file: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            detail: detail.into(),
        }
    }
}

/// Two pipeline files declare the same pipeline name.
#[derive(Debug, Error)]
#[error("pipeline '{name}' is defined in both {} and {}", files[0].display(), files[1].display())]
pub struct DuplicatePipelineError {
    pub name: String,
    pub files: [PathBuf; 2],
}

/// A `depends_on`, `connection`, or `component_type` reference does not resolve.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("pipeline '{pipeline}' depends_on unknown pipeline '{target}'")]
    UnknownPipeline { pipeline: String, target: String },
    #[error("pipeline '{pipeline}' step '{step}' depends_on unknown step '{target}'")]
    UnknownStep {
        pipeline: String,
        step: String,
        target: String,
    },
    #[error("pipeline '{pipeline}' step '{step}' references unknown connection '{connection}'")]
    UnknownConnection {
        pipeline: String,
        step: String,
        connection: String,
    },
    #[error(
        "pipeline '{pipeline}' step '{step}' references unknown component_type '{component_type}' ({kind})"
    )]
    UnknownComponentType {
        pipeline: String,
        step: String,
        kind: String,
        component_type: String,
    },
}

/// Aggregates every failure mode of the Project Loader (C3).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    PipelineParse(#[from] PipelineParseError),
    #[error(transparent)]
    DuplicatePipeline(#[from] DuplicatePipelineError),
    #[error("{} dependency error(s):\n{}", errors.len(), render_dependency_errors(errors))]
    Dependencies { errors: Vec<DependencyError> },
}

fn render_dependency_errors(errors: &[DependencyError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
