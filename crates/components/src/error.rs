// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from component instantiation and execution.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("unknown {kind} component type `{component_type}`")]
    UnknownComponent { kind: String, component_type: String },

    #[error("pipeline `{pipeline}` step `{step_id}` ({component_type}) failed: {message}")]
    Failed {
        pipeline: String,
        step_id: String,
        component_type: String,
        message: String,
    },

    #[error("pipeline `{pipeline}` step `{step_id}`: {message}")]
    Config {
        pipeline: String,
        step_id: String,
        message: String,
    },
}
