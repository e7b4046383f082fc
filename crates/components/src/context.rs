// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution context handed to a component on every call.

use dft_core::BatchWindow;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Everything a component needs for one `extract`/`process`/`load` call:
/// its fully-rendered config, the rendered connection fields (if the step
/// declared a `connection:`), the owning pipeline and step for error
/// context, and the active batch window, if any.
pub struct ComponentContext {
    pub pipeline: String,
    pub step_id: String,
    pub component_type: String,
    pub config: IndexMap<String, JsonValue>,
    pub connection: Option<IndexMap<String, JsonValue>>,
    pub window: Option<BatchWindow>,
}

impl ComponentContext {
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(JsonValue::as_str)
    }

    pub fn connection_str(&self, key: &str) -> Option<&str> {
        self.connection.as_ref()?.get(key)?.as_str()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
