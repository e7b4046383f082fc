// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft validate` - run the loader and graph validation without executing
//! anything (§4.9 steps 1-3, §6).

use anyhow::Result;
use clap::Args;
use dft_engine::plan;
use std::path::Path;

#[derive(Args)]
pub struct ValidateArgs {
    /// Pipelines (or selector expressions) to validate; may be repeated.
    /// Omit to validate every pipeline.
    #[arg(long = "select")]
    pub select: Vec<String>,
}

pub async fn handle(args: ValidateArgs, root: &Path) -> Result<i32> {
    match plan(root, &args.select, &[]).await {
        Ok((_, order)) => {
            println!("{} pipeline(s) valid", order.len());
            Ok(0)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(super::exit_code_for(&e))
        }
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
