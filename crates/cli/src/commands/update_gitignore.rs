// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft update-gitignore` - reconcile the state-directory ignore entry
//! with the project's `state.ignore_in_git` option (§6).

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct UpdateGitignoreArgs {}

pub async fn handle(_args: UpdateGitignoreArgs, root: &Path) -> Result<i32> {
    let project = dft_project::load_project(root);
    let ignore_in_git = match project {
        Ok(loaded) => loaded.project.state.ignore_in_git,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(2);
        }
    };

    let changed = dft_storage::reconcile_gitignore(root, ignore_in_git)
        .with_context(|| format!("reconciling .gitignore under {}", root.display()))?;
    if changed {
        println!("updated .gitignore");
    } else {
        println!(".gitignore already up to date");
    }
    Ok(0)
}

#[cfg(test)]
#[path = "update_gitignore_tests.rs"]
mod tests;
