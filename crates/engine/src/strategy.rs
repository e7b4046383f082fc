// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution Strategy (C7): turns one pipeline's configuration into an
//! ordered list of `PlanEntry` values for this invocation — a single
//! `Full` run, or a sequence of microbatch `Window`s.
//!
//! `MicrobatchConfigError::MissingBegin` and `InvalidBatchSize` are part of
//! the documented error taxonomy but unreachable in practice here: `begin`
//! is a required field and `batch_size` a closed enum, so both are already
//! rejected by the project loader's `serde_yaml` parsing before a pipeline
//! ever reaches the engine. This module only has to guard the one
//! condition that can't be caught by shape validation alone.

use chrono::{DateTime, Duration, Local, TimeZone};
use dft_core::{BatchWindow, MicrobatchConfig, PlanEntry};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MicrobatchConfigError {
    #[error("microbatch config has neither a cursor nor a 'begin'")]
    MissingBegin,
    #[error("microbatch config has an invalid batch_size")]
    InvalidBatchSize,
    #[error("microbatch 'end' ({end}) precedes 'begin' ({begin})")]
    EndBeforeBegin { begin: String, end: String },
}

fn validate(cfg: &MicrobatchConfig) -> Result<(), MicrobatchConfigError> {
    if let Some(end) = cfg.end {
        if end < cfg.begin {
            return Err(MicrobatchConfigError::EndBeforeBegin {
                begin: cfg.begin.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
    }
    Ok(())
}

/// The full-refresh strategy: a single plan entry covering the whole
/// pipeline.
pub fn full_plan() -> Vec<PlanEntry> {
    vec![PlanEntry::Full]
}

/// The microbatch strategy's window computation (§4.7, steps 1-5).
///
/// `cursor` is the pipeline's `last_processed_timestamp` from state, if
/// any. `full_refresh` replaces it with `begin` before computing windows.
pub fn microbatch_plan(
    cfg: &MicrobatchConfig,
    cursor: Option<DateTime<Local>>,
    now: DateTime<Local>,
    full_refresh: bool,
) -> Result<Vec<PlanEntry>, MicrobatchConfigError> {
    validate(cfg)?;

    let effective_cursor = if full_refresh {
        cfg.begin
    } else {
        cursor.unwrap_or(cfg.begin)
    };

    let lookback_span = cfg.batch_size.duration() * i32::try_from(cfg.lookback).unwrap_or(i32::MAX);
    let start = (effective_cursor - lookback_span).max(cfg.begin);
    let end_bound = cfg.end.map_or(now, |e| e.min(now));
    let end = truncate_down(end_bound, cfg.batch_size.duration());

    let mut windows = Vec::new();
    let mut window_start = start;
    while window_start < end {
        let window_end = (window_start + cfg.batch_size.duration()).min(end);
        windows.push(PlanEntry::Window(BatchWindow {
            start: window_start,
            end: window_end,
            period: cfg.batch_size,
            event_time_column: cfg.event_time_column.clone(),
        }));
        window_start = window_end;
    }
    Ok(windows)
}

/// Truncate `ts` down to the nearest multiple of `step` measured from the
/// Unix epoch.
fn truncate_down(ts: DateTime<Local>, step: Duration) -> DateTime<Local> {
    let step_secs = step.num_seconds().max(1);
    let truncated_secs = ts.timestamp().div_euclid(step_secs) * step_secs;
    Local
        .timestamp_opt(truncated_secs, 0)
        .single()
        .unwrap_or(ts)
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
