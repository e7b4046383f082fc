// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft run` - execute selected pipelines (§4.9, §6).

use anyhow::Result;
use clap::Args;
use dft_components::ComponentFactory;
use dft_core::SystemClock;
use dft_engine::{run, PipelineStatus, RunOptions, RunSummary};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::path::Path;
use std::sync::Arc;

use super::parse_vars_list;

#[derive(Args)]
pub struct RunArgs {
    /// Pipelines (or `+x`/`x+`/`tag:t` selector expressions) to run; may be
    /// repeated. Omit to run every pipeline.
    #[arg(long = "select")]
    pub select: Vec<String>,

    /// Selector expressions to exclude from the selected set; may be
    /// repeated.
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,

    /// Override variables as `k=v[,k=v]…`; may be repeated. Takes
    /// precedence over every other variable layer.
    #[arg(long = "vars", value_parser = parse_vars_list)]
    pub vars: Vec<Vec<(String, String)>>,

    /// Re-run microbatch pipelines from `begin`, ignoring the persisted
    /// cursor.
    #[arg(long)]
    pub full_refresh: bool,
}

pub async fn handle(args: RunArgs, root: &Path) -> Result<i32> {
    let mut cli_vars: IndexMap<String, JsonValue> = IndexMap::new();
    for group in args.vars {
        for (k, v) in group {
            cli_vars.insert(k, JsonValue::String(v));
        }
    }

    let options = RunOptions {
        select: args.select,
        exclude: args.exclude,
        cli_vars,
        full_refresh: args.full_refresh,
    };

    let factory = ComponentFactory::with_builtins();
    let clock = Arc::new(SystemClock);

    let summary = match run(root, &options, &factory, clock).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(super::exit_code_for(&e));
        }
    };

    print_summary(&summary);
    Ok(summary.exit_code())
}

fn print_summary(summary: &RunSummary) {
    for outcome in &summary.outcomes {
        match outcome.status {
            PipelineStatus::Success => println!("{}: success", outcome.pipeline),
            PipelineStatus::Failure => {
                println!("{}: failure - {}", outcome.pipeline, outcome.detail.as_deref().unwrap_or(""))
            }
            PipelineStatus::Skipped => {
                println!("{}: skipped - {}", outcome.pipeline, outcome.detail.as_deref().unwrap_or(""))
            }
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
