// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft deps` - print the resolved pipeline graph (§6).

use anyhow::Result;
use clap::Args;
use dft_engine::plan;
use std::path::Path;

#[derive(Args)]
pub struct DepsArgs {
    /// Pipelines (or selector expressions) to include; may be repeated.
    /// Omit to print every pipeline.
    #[arg(long = "select")]
    pub select: Vec<String>,
}

pub async fn handle(args: DepsArgs, root: &Path) -> Result<i32> {
    match plan(root, &args.select, &[]).await {
        Ok((project, order)) => {
            for name in &order {
                let pipeline = project
                    .pipeline(name)
                    .expect("selector only returns names present in the graph");
                if pipeline.depends_on.is_empty() {
                    println!("{name}");
                } else {
                    let deps: Vec<&str> = pipeline.depends_on.iter().map(|d| d.as_str()).collect();
                    println!("{name} <- {}", deps.join(", "));
                }
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(super::exit_code_for(&e))
        }
    }
}

#[cfg(test)]
#[path = "deps_tests.rs"]
mod tests;
