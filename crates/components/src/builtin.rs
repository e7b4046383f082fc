// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory/file-backed test components. These ship so the factory,
//! runner, and CLI are exercisable end to end without a real database or
//! file connector; they are not meant for production pipelines.

use crate::context::ComponentContext;
use crate::error::ComponentError;
use crate::traits::{Endpoint, Processor, Source};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use dft_core::DataPacket;
use serde_json::Value as JsonValue;

fn config_error(ctx: &ComponentContext, message: impl Into<String>) -> ComponentError {
    ComponentError::Config {
        pipeline: ctx.pipeline.clone(),
        step_id: ctx.step_id.clone(),
        message: message.into(),
    }
}

fn failed(ctx: &ComponentContext, message: impl Into<String>) -> ComponentError {
    ComponentError::Failed {
        pipeline: ctx.pipeline.clone(),
        step_id: ctx.step_id.clone(),
        component_type: ctx.component_type.clone(),
        message: message.into(),
    }
}

/// Produces the rows declared in `config.rows` (a JSON array), or an empty
/// array if none are declared. When a batch window is active, each
/// emitted row gets `batch_start`/`batch_end` stamped into its metadata so
/// tests can assert which window produced which rows.
#[derive(Debug, Default)]
pub struct FakeSource;

#[async_trait]
impl Source for FakeSource {
    async fn extract(&self, ctx: &ComponentContext) -> Result<DataPacket, ComponentError> {
        let rows = ctx
            .config
            .get("rows")
            .cloned()
            .unwrap_or_else(|| JsonValue::Array(Vec::new()));
        let mut packet = DataPacket::new(rows);
        if let Some(window) = &ctx.window {
            packet
                .metadata
                .insert("batch_start".to_string(), window.start.to_rfc3339());
            packet
                .metadata
                .insert("batch_end".to_string(), window.end.to_rfc3339());
        }
        Ok(packet)
    }
}

/// Passes the packet through unchanged, recording that it ran.
#[derive(Debug, Default)]
pub struct NoopProcessor;

#[async_trait]
impl Processor for NoopProcessor {
    async fn process(
        &self,
        packet: DataPacket,
        _ctx: &ComponentContext,
    ) -> Result<DataPacket, ComponentError> {
        Ok(packet)
    }
}

/// Appends a `metadata.processed_by = component_type` tag, otherwise a
/// pass-through. Used by tests that verify each step in a DAG actually
/// ran, in order.
#[derive(Debug, Default)]
pub struct FakeProcessor;

#[async_trait]
impl Processor for FakeProcessor {
    async fn process(
        &self,
        mut packet: DataPacket,
        ctx: &ComponentContext,
    ) -> Result<DataPacket, ComponentError> {
        packet
            .metadata
            .insert("processed_by".to_string(), ctx.step_id.clone());
        Ok(packet)
    }
}

/// Discards the packet without writing anywhere.
#[derive(Debug, Default)]
pub struct NoopEndpoint;

#[async_trait]
impl Endpoint for NoopEndpoint {
    async fn load(&self, _packet: DataPacket, _ctx: &ComponentContext) -> Result<bool, ComponentError> {
        Ok(true)
    }
}

/// Appends rows to a JSON-array file named by `config.output_path`. When
/// the step declares `config.event_time_column` and a batch window is
/// active, existing rows whose column value falls in `[window.start,
/// window.end)` are deleted before the new rows are appended — the
/// window-replace contract that makes lookback idempotent.
#[derive(Debug, Default)]
pub struct FakeEndpoint;

#[async_trait]
impl Endpoint for FakeEndpoint {
    async fn load(&self, packet: DataPacket, ctx: &ComponentContext) -> Result<bool, ComponentError> {
        let output_path = ctx
            .config_str("output_path")
            .ok_or_else(|| config_error(ctx, "fake_endpoint requires config.output_path"))?;

        let mut existing: Vec<JsonValue> = match std::fs::read_to_string(output_path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| failed(ctx, format!("existing output is not a JSON array: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(failed(ctx, e.to_string())),
        };

        if let (Some(column), Some(window)) = (ctx.config_str("event_time_column"), &ctx.window) {
            existing.retain(|row| !row_in_window(row, column, window.start, window.end));
        }

        let new_rows = match packet.data {
            JsonValue::Array(rows) => rows,
            other => vec![other],
        };
        existing.extend(new_rows);

        let serialized = serde_json::to_string_pretty(&existing)
            .map_err(|e| failed(ctx, format!("failed to serialize output: {e}")))?;
        std::fs::write(output_path, serialized).map_err(|e| failed(ctx, e.to_string()))?;
        Ok(true)
    }
}

fn row_in_window(row: &JsonValue, column: &str, start: DateTime<Local>, end: DateTime<Local>) -> bool {
    let Some(raw) = row.get(column).and_then(JsonValue::as_str) else {
        return false;
    };
    let Ok(ts) = DateTime::parse_from_rfc3339(raw) else {
        return false;
    };
    let ts = ts.with_timezone(&Local);
    ts >= start && ts < end
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
