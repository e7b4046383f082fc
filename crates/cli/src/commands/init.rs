// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft init <name>` - scaffold a new project directory.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct InitArgs {
    /// Name of the project directory to create
    pub name: String,

    /// Keep the state directory out of version control (default: true)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub ignore_state_in_git: bool,
}

const PROJECT_TEMPLATE: &str = "project_name: {name}\n\
state:\n  ignore_in_git: {ignore_in_git}\n\
connections: {}\n\
variables: {}\n\
logging:\n  level: info\n";

pub fn handle(args: InitArgs) -> Result<()> {
    let root = Path::new(&args.name);
    if root.exists() {
        bail!("'{}' already exists", args.name);
    }

    std::fs::create_dir_all(root).with_context(|| format!("creating {}", root.display()))?;
    std::fs::create_dir_all(root.join("pipelines"))?;
    std::fs::create_dir_all(root.join("components"))?;

    let project_yml = PROJECT_TEMPLATE
        .replace("{name}", &args.name)
        .replace("{ignore_in_git}", &args.ignore_state_in_git.to_string());
    std::fs::write(root.join("dft_project.yml"), project_yml)?;

    if args.ignore_state_in_git {
        dft_storage::reconcile_gitignore(root, true)?;
    }

    println!("Initialized project '{}' in {}", args.name, root.display());
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
