// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! dft - a configuration-driven ETL pipeline orchestration CLI.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod dotenv;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{deps, init, run, update_gitignore, validate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dft", version, about = "Configuration-driven ETL pipeline orchestration")]
struct Cli {
    /// Change to <dir> before doing anything
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Tracing filter directive (overridden by RUST_LOG if set)
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new project directory
    Init(init::InitArgs),
    /// Execute selected pipelines
    Run(run::RunArgs),
    /// Validate the project and pipeline graph without executing anything
    Validate(validate::ValidateArgs),
    /// Print the resolved pipeline graph
    Deps(deps::DepsArgs),
    /// Reconcile the state-directory `.gitignore` entry
    UpdateGitignore(update_gitignore::UpdateGitignoreArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(ref dir) = cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("Error: cannot change to directory '{}': {e}", dir.display());
            std::process::exit(2);
        }
    }

    logging::init(cli.log_level.as_deref());

    let code = match run_command(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

async fn run_command(command: Commands) -> Result<i32> {
    if let Commands::Init(args) = command {
        init::handle(args)?;
        return Ok(0);
    }

    let root = find_project_root();
    tracing::debug!(root = %root.display(), "resolved project root");

    match command {
        Commands::Init(_) => unreachable!(),
        Commands::Run(args) => {
            dotenv::load(&root);
            run::handle(args, &root).await
        }
        Commands::Validate(args) => validate::handle(args, &root).await,
        Commands::Deps(args) => deps::handle(args, &root).await,
        Commands::UpdateGitignore(args) => update_gitignore::handle(args, &root).await,
    }
}

/// Walk up from the current directory looking for `dft_project.yml`.
/// Falls back to the current directory so load errors surface through the
/// normal project-loader error path rather than here.
fn find_project_root() -> PathBuf {
    let start = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut current = start.clone();
    loop {
        if current.join("dft_project.yml").is_file() {
            return current;
        }
        if !current.pop() {
            return start;
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
