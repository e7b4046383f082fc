// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft update-gitignore`.

use crate::prelude::Project;

#[test]
fn adds_the_state_entry_when_ignore_in_git_is_true() {
    let project = Project::new();

    project.dft(&["update-gitignore"]).passes();
    assert!(project.read(".gitignore").contains(".dft/state/"));
}

#[test]
fn removes_the_state_entry_when_ignore_in_git_is_false() {
    let project = Project::empty();
    project.file(
        "dft_project.yml",
        "project_name: fixture\n\
         state:\n  ignore_in_git: false\n\
         connections: {}\n\
         variables: {}\n",
    );
    project.mkdir("pipelines");
    project.file(".gitignore", ".dft/state/\n");

    project.dft(&["update-gitignore"]).passes();
    assert!(!project.read(".gitignore").contains(".dft/state/"));
}

#[test]
fn running_it_twice_is_idempotent() {
    let project = Project::new();

    project.dft(&["update-gitignore"]).passes().stdout_has("updated .gitignore");
    project
        .dft(&["update-gitignore"])
        .passes()
        .stdout_has(".gitignore already up to date");
}
