// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator (C9): the top-level control loop (§4.9).
//!
//! 1. Load the project and all pipelines (C3).
//! 2. Validate: inter-pipeline cycle check, per-pipeline step cycle check
//!    (C5) — reference validation already happened in the loader.
//! 3. Apply the selector (C6) to produce the ordered pipeline list.
//! 4. Run each selected pipeline in order, building its execution plan
//!    (C7) and invoking the runner (C8) per plan entry; a pipeline with a
//!    failed upstream in this invocation is skipped rather than run.
//! 5. Summarize.

use crate::dag::Graph;
use crate::runner::{self, StepFailure};
use crate::selector::{self, SelectorContext, SelectorError};
use crate::strategy::{self, MicrobatchConfigError};
use dft_components::ComponentFactory;
use dft_core::{state_keys, Clock, Pipeline, PlanEntry};
use dft_project::LoadedProject;
use dft_storage::{StateError, StateStore};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("project failed validation: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<String>,
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Load(#[from] dft_project::LoadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// What the caller asked for on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub select: Vec<String>,
    pub exclude: Vec<String>,
    pub cli_vars: IndexMap<String, JsonValue>,
    pub full_refresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Success,
    Failure,
    Skipped,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub pipeline: String,
    pub status: PipelineStatus,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<PipelineOutcome>,
}

impl RunSummary {
    /// `0` if every selected pipeline succeeded (or none were selected);
    /// `1` if anything failed or was skipped due to an upstream failure.
    pub fn exit_code(&self) -> i32 {
        if self
            .outcomes
            .iter()
            .any(|o| o.status != PipelineStatus::Success)
        {
            1
        } else {
            0
        }
    }
}

/// Validate cycles at both graph levels: the inter-pipeline graph and,
/// for every pipeline, its own step graph. Errors are aggregated rather
/// than stopping at the first one.
fn validate_graphs(project: &LoadedProject) -> Result<Graph, ValidationError> {
    let mut issues = Vec::new();

    let pipeline_graph = Graph::new(
        project.pipelines.keys().map(|n| n.as_str().to_string()),
        |name| {
            project
                .pipeline(name)
                .map(|p| p.depends_on.iter().map(|d| d.as_str().to_string()).collect())
                .unwrap_or_default()
        },
    );
    if let Err(e) = pipeline_graph.topological_order() {
        issues.push(format!("inter-pipeline {e}"));
    }

    for pipeline in project.pipelines.values() {
        let step_graph = step_graph(pipeline);
        if let Err(e) = step_graph.topological_order() {
            issues.push(format!("pipeline '{}' step graph {e}", pipeline.name));
        }
    }

    if issues.is_empty() {
        Ok(pipeline_graph)
    } else {
        Err(ValidationError { issues })
    }
}

fn step_graph(pipeline: &Pipeline) -> Graph {
    Graph::new(
        pipeline.steps.iter().map(|s| s.id.as_str().to_string()),
        |id| {
            pipeline
                .step(id)
                .map(|s| s.depends_on.iter().map(|d| d.as_str().to_string()).collect())
                .unwrap_or_default()
        },
    )
}

fn tags_by_pipeline(project: &LoadedProject) -> HashMap<String, Vec<String>> {
    project
        .pipelines
        .values()
        .map(|p| (p.name.as_str().to_string(), p.tags.clone()))
        .collect()
}

/// Load a project, validate both graph levels, and resolve `--select`/
/// `--exclude` to the ordered list of pipelines that would run. Shared by
/// `run`, and by the `validate`/`deps` CLI commands, which stop here.
pub async fn plan(
    root: &Path,
    select: &[String],
    exclude: &[String],
) -> Result<(LoadedProject, Vec<String>), OrchestratorError> {
    let project = dft_project::load_project(root)?;
    let pipeline_graph = validate_graphs(&project)?;

    let tags = tags_by_pipeline(&project);
    let ctx = SelectorContext::new(&pipeline_graph, &tags);
    let order = selector::apply(select, exclude, &ctx)?;
    Ok((project, order))
}

/// Run the full project: load, validate, select, and execute.
pub async fn run(
    root: &Path,
    options: &RunOptions,
    factory: &ComponentFactory,
    clock: Arc<dyn Clock>,
) -> Result<RunSummary, OrchestratorError> {
    let (project, order) = plan(root, &options.select, &options.exclude).await?;

    let state = StateStore::new(root.join(".dft").join("state"));
    let mut failed: HashSet<String> = HashSet::new();
    let mut outcomes = Vec::with_capacity(order.len());

    for name in &order {
        let pipeline = project
            .pipeline(name)
            .expect("selector only returns names present in the graph");

        let blocked = pipeline
            .depends_on
            .iter()
            .any(|dep| failed.contains(dep.as_str()));
        if blocked {
            failed.insert(name.clone());
            tracing::warn!(pipeline = %name, "skipping: an upstream pipeline failed in this invocation");
            outcomes.push(PipelineOutcome {
                pipeline: name.clone(),
                status: PipelineStatus::Skipped,
                detail: Some("an upstream pipeline failed in this invocation".to_string()),
            });
            continue;
        }

        tracing::info!(pipeline = %name, "running pipeline");
        match run_pipeline(pipeline, &project, &state, factory, options, clock.clone()).await {
            Ok(()) => {
                tracing::info!(pipeline = %name, "pipeline succeeded");
                outcomes.push(PipelineOutcome {
                    pipeline: name.clone(),
                    status: PipelineStatus::Success,
                    detail: None,
                })
            }
            Err(detail) => {
                tracing::warn!(pipeline = %name, error = %detail, "pipeline failed");
                failed.insert(name.clone());
                outcomes.push(PipelineOutcome {
                    pipeline: name.clone(),
                    status: PipelineStatus::Failure,
                    detail: Some(detail),
                });
            }
        }
    }

    Ok(RunSummary { outcomes })
}

#[derive(Debug, Error)]
enum PipelineRunError {
    #[error(transparent)]
    Microbatch(#[from] MicrobatchConfigError),
    #[error(transparent)]
    Step(#[from] StepFailure),
    #[error(transparent)]
    State(#[from] StateError),
}

async fn run_pipeline(
    pipeline: &Pipeline,
    project: &LoadedProject,
    state: &StateStore,
    factory: &ComponentFactory,
    options: &RunOptions,
    clock: Arc<dyn Clock>,
) -> Result<(), String> {
    run_pipeline_inner(pipeline, project, state, factory, options, clock)
        .await
        .map_err(|e| e.to_string())
}

async fn run_pipeline_inner(
    pipeline: &Pipeline,
    project: &LoadedProject,
    state: &StateStore,
    factory: &ComponentFactory,
    options: &RunOptions,
    clock: Arc<dyn Clock>,
) -> Result<(), PipelineRunError> {
    let current_state = state.load(pipeline.name.as_str())?;

    let entries = match &pipeline.microbatch {
        None => strategy::full_plan(),
        Some(cfg) => {
            let cursor = current_state
                .get(state_keys::LAST_PROCESSED_TIMESTAMP)
                .and_then(JsonValue::as_str)
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&chrono::Local));
            strategy::microbatch_plan(cfg, cursor, clock.now(), options.full_refresh)?
        }
    };

    for entry in &entries {
        runner::run_plan_entry(
            pipeline,
            entry,
            &project.project,
            factory,
            &current_state,
            &options.cli_vars,
            clock.clone(),
        )
        .await?;

        // Advance the cursor right after each window succeeds, so a later
        // window's failure leaves state at this window's end rather than
        // discarding the whole run's progress.
        if let PlanEntry::Window(window) = entry {
            state.update(
                pipeline.name.as_str(),
                [
                    (
                        state_keys::LAST_PROCESSED_TIMESTAMP.to_string(),
                        JsonValue::String(window.end.to_rfc3339()),
                    ),
                    (
                        state_keys::LAST_PROCESSED_DATE.to_string(),
                        JsonValue::String(window.end.date_naive().to_string()),
                    ),
                ],
            )?;
        }
    }

    let now = clock.now();
    let mut updates: Vec<(String, JsonValue)> = vec![
        (state_keys::LAST_STATUS.to_string(), JsonValue::String("success".to_string())),
        (state_keys::LAST_RUN_AT.to_string(), JsonValue::String(now.to_rfc3339())),
    ];
    if pipeline.microbatch.is_none() {
        updates.push((
            state_keys::LAST_PROCESSED_DATE.to_string(),
            JsonValue::String(now.date_naive().to_string()),
        ));
    }
    state.update(pipeline.name.as_str(), updates)?;

    Ok(())
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
