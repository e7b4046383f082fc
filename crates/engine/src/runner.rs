// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline Runner (C8): executes one pipeline's step DAG for one plan
//! entry (§4.8).
//!
//! 1. Compute the step graph's topological order.
//! 2. For each step, render its `config` (and, when it declares a
//!    `connection`, that connection's fields) — string leaves only.
//! 3. Instantiate the component via the factory and invoke the operation
//!    matching its `kind`.
//! 4. Track `step_id -> DataPacket` for producers. A step's single input
//!    is chosen from `depends_on`: with exactly one upstream, that packet;
//!    with several, the one latest in topological order, ties (impossible
//!    once the graph is fully linearized, but resolved defensively) by
//!    `depends_on` list position.
//!
//! Steps run sequentially in topological order; any step failure fails
//! the whole plan entry, carrying pipeline/step/cause.

use crate::dag::{CycleError, Graph};
use dft_components::{ComponentContext, ComponentFactory};
use dft_core::{BatchWindow, DataPacket, Pipeline, PlanEntry, Project, Step, StepKind};
use dft_template::{BatchVars, RenderContext};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("pipeline '{pipeline}' step '{step}' failed: {cause}")]
pub struct StepFailure {
    pub pipeline: String,
    pub step: String,
    #[source]
    pub cause: RunnerCause,
}

#[derive(Debug, Error)]
pub enum RunnerCause {
    #[error(transparent)]
    Template(#[from] dft_template::TemplateError),
    #[error(transparent)]
    Component(#[from] dft_components::ComponentError),
    #[error("step has no upstream packet to consume")]
    NoUpstreamPacket,
    #[error("endpoint step reported failure")]
    EndpointRejected,
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

/// Run every step of `pipeline` once, for a single `PlanEntry`.
pub async fn run_plan_entry(
    pipeline: &Pipeline,
    entry: &PlanEntry,
    project: &Project,
    factory: &ComponentFactory,
    state: &IndexMap<String, JsonValue>,
    cli_overrides: &IndexMap<String, JsonValue>,
    clock: std::sync::Arc<dyn dft_core::Clock>,
) -> Result<(), StepFailure> {
    let graph = Graph::new(
        pipeline.steps.iter().map(|s| s.id.as_str().to_string()),
        |id| {
            pipeline
                .step(id)
                .map(|s| s.depends_on.iter().map(|d| d.as_str().to_string()).collect())
                .unwrap_or_default()
        },
    );
    let order = graph.topological_order().map_err(|cause| StepFailure {
        pipeline: pipeline.name.as_str().to_string(),
        step: String::new(),
        cause: RunnerCause::Cycle(cause),
    })?;

    let base_ctx = RenderContext::new(clock)
        .push_layer("project", project.variables.clone())
        .push_layer("pipeline", pipeline.variables.clone())
        .push_layer("cli", cli_overrides.clone())
        .with_state(state.clone());
    let ctx = match entry {
        PlanEntry::Full => base_ctx,
        PlanEntry::Window(window) => base_ctx.with_batch(batch_vars(window)),
    };

    let mut outputs: IndexMap<String, DataPacket> = IndexMap::new();

    for step_id in &order {
        let step = pipeline
            .step(step_id)
            .expect("topological order only contains this pipeline's step ids");

        tracing::debug!(
            pipeline = %pipeline.name,
            step = %step.id,
            kind = step.kind.as_str(),
            component_type = %step.component_type,
            "running step"
        );
        run_step(pipeline, step, entry, project, factory, &ctx, &order, &mut outputs)
            .await
            .map_err(|cause| {
                tracing::warn!(pipeline = %pipeline.name, step = %step.id, error = %cause, "step failed");
                StepFailure {
                    pipeline: pipeline.name.as_str().to_string(),
                    step: step.id.as_str().to_string(),
                    cause,
                }
            })?;
    }

    Ok(())
}

async fn run_step(
    pipeline: &Pipeline,
    step: &Step,
    entry: &PlanEntry,
    project: &Project,
    factory: &ComponentFactory,
    ctx: &RenderContext,
    order: &[String],
    outputs: &mut IndexMap<String, DataPacket>,
) -> Result<(), RunnerCause> {
    let config = render_json(&step.config, ctx)?;
    let connection = match &step.connection {
        Some(id) => match project.connections.get(id) {
            Some(conn) => {
                let mut fields = IndexMap::new();
                fields.insert("type".to_string(), JsonValue::String(conn.type_.clone()));
                for (k, v) in &conn.fields {
                    fields.insert(k.clone(), render_value(v, ctx)?);
                }
                Some(fields)
            }
            None => None,
        },
        None => None,
    };

    let window = match entry {
        PlanEntry::Full => None,
        PlanEntry::Window(w) => Some(w.clone()),
    };

    let component_ctx = ComponentContext {
        pipeline: pipeline.name.as_str().to_string(),
        step_id: step.id.as_str().to_string(),
        component_type: step.component_type.clone(),
        config,
        connection,
        window,
    };

    match step.kind {
        StepKind::Source => {
            let component = factory.build_source(&step.component_type)?;
            let packet = component.extract(&component_ctx).await?;
            outputs.insert(step.id.as_str().to_string(), packet);
        }
        StepKind::Processor => {
            let input = select_input(step, order, outputs)?;
            let component = factory.build_processor(&step.component_type)?;
            let packet = component.process(input, &component_ctx).await?;
            outputs.insert(step.id.as_str().to_string(), packet);
        }
        StepKind::Endpoint => {
            let input = select_input(step, order, outputs)?;
            let component = factory.build_endpoint(&step.component_type)?;
            let ok = component.load(input, &component_ctx).await?;
            if !ok {
                return Err(RunnerCause::EndpointRejected);
            }
        }
    }
    Ok(())
}

/// Pick the input packet for a step with one or more upstreams: the
/// dependency latest in the pipeline's topological order, ties (which
/// cannot occur against a fully linearized order) broken by position in
/// the step's own `depends_on` list.
fn select_input(
    step: &Step,
    order: &[String],
    outputs: &IndexMap<String, DataPacket>,
) -> Result<DataPacket, RunnerCause> {
    let chosen = step
        .depends_on
        .iter()
        .enumerate()
        .max_by_key(|(list_pos, dep)| {
            let order_pos = order.iter().position(|n| n == dep.as_str()).unwrap_or(0);
            (order_pos, std::cmp::Reverse(*list_pos))
        })
        .map(|(_, dep)| dep.as_str().to_string())
        .ok_or(RunnerCause::NoUpstreamPacket)?;

    outputs.get(&chosen).cloned().ok_or(RunnerCause::NoUpstreamPacket)
}

fn batch_vars(window: &BatchWindow) -> BatchVars {
    BatchVars {
        start: window.start,
        end: window.end,
        period: window.period.as_str().to_string(),
        event_time_column: window.event_time_column.clone(),
    }
}

fn render_json(
    map: &IndexMap<String, JsonValue>,
    ctx: &RenderContext,
) -> Result<IndexMap<String, JsonValue>, dft_template::TemplateError> {
    map.iter()
        .map(|(k, v)| render_value(v, ctx).map(|v| (k.clone(), v)))
        .collect()
}

fn render_value(value: &JsonValue, ctx: &RenderContext) -> Result<JsonValue, dft_template::TemplateError> {
    match value {
        JsonValue::String(s) => Ok(JsonValue::String(dft_template::render(s, ctx)?)),
        JsonValue::Array(items) => items
            .iter()
            .map(|v| render_value(v, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        JsonValue::Object(map) => map
            .iter()
            .map(|(k, v)| render_value(v, ctx).map(|v| (k.clone(), v)))
            .collect::<Result<serde_json::Map<_, _>, _>>()
            .map(JsonValue::Object),
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
