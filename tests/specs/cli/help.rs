// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft --help` / `dft --version` / subcommand help text.

use crate::prelude::Project;

#[test]
fn top_level_help_lists_every_subcommand() {
    let project = Project::empty();
    project
        .dft(&["--help"])
        .passes()
        .stdout_has("init")
        .stdout_has("run")
        .stdout_has("validate")
        .stdout_has("deps")
        .stdout_has("update-gitignore");
}

#[test]
fn version_flag_prints_a_version() {
    let project = Project::empty();
    project.dft(&["--version"]).passes().stdout_has("dft");
}

#[test]
fn run_help_documents_select_and_exclude() {
    let project = Project::empty();
    project
        .dft(&["run", "--help"])
        .passes()
        .stdout_has("--select")
        .stdout_has("--exclude")
        .stdout_has("--full-refresh");
}
