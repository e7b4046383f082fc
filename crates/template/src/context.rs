// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered variable context consulted by `var("name")`.

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use dft_core::Clock;

/// Batch variables injected for the duration of one microbatch window.
#[derive(Debug, Clone)]
pub struct BatchVars {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub period: String,
    pub event_time_column: String,
}

/// One named layer in the variable stack. Layers are searched from the
/// last pushed (highest precedence) to the first (lowest), mirroring the
/// spec's (project < pipeline < microbatch < CLI) precedence order.
#[derive(Debug, Clone)]
pub struct VariableLayer {
    pub name: &'static str,
    pub values: IndexMap<String, JsonValue>,
}

/// Everything an expression evaluation needs: the layered variable stack,
/// the current pipeline's persisted state (read-only snapshot), the
/// injected clock, and (when inside a microbatch window) the batch
/// variables.
#[derive(Clone)]
pub struct RenderContext {
    layers: Vec<VariableLayer>,
    state: IndexMap<String, JsonValue>,
    clock: Arc<dyn Clock>,
    batch: Option<BatchVars>,
}

impl RenderContext {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            layers: Vec::new(),
            state: IndexMap::new(),
            clock,
            batch: None,
        }
    }

    /// Push a new, highest-precedence layer.
    pub fn push_layer(mut self, name: &'static str, values: IndexMap<String, JsonValue>) -> Self {
        self.layers.push(VariableLayer { name, values });
        self
    }

    pub fn with_state(mut self, state: IndexMap<String, JsonValue>) -> Self {
        self.state = state;
        self
    }

    pub fn with_batch(mut self, batch: BatchVars) -> Self {
        self.batch = Some(batch);
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn batch(&self) -> Option<&BatchVars> {
        self.batch.as_ref()
    }

    pub fn state_get(&self, key: &str) -> Option<&JsonValue> {
        self.state.get(key)
    }

    /// Resolve `name` by searching layers from highest to lowest
    /// precedence. Returns `None` along with the ordered list of layer
    /// names searched, for error reporting.
    pub fn lookup(&self, name: &str) -> (Option<&JsonValue>, Vec<String>) {
        let mut searched = Vec::with_capacity(self.layers.len());
        for layer in self.layers.iter().rev() {
            searched.push(layer.name.to_string());
            if let Some(v) = layer.values.get(name) {
                return (Some(v), searched);
            }
        }
        (None, searched)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
