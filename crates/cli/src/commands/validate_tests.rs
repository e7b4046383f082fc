// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn valid_project_reports_success() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dft_project.yml"), "project_name: acme\n").unwrap();
    fs::create_dir_all(dir.path().join("pipelines")).unwrap();
    fs::write(
        dir.path().join("pipelines/raw.yml"),
        "pipeline_name: raw\nsteps:\n  - id: extract\n    type: source\n    source_type: fake\n",
    )
    .unwrap();

    let code = handle(ValidateArgs { select: Vec::new() }, dir.path())
        .await
        .unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn a_dependency_cycle_reports_exit_code_two() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dft_project.yml"), "project_name: acme\n").unwrap();
    fs::create_dir_all(dir.path().join("pipelines")).unwrap();
    fs::write(
        dir.path().join("pipelines/a.yml"),
        "pipeline_name: a\ndepends_on: [b]\nsteps:\n  - id: extract\n    type: source\n    source_type: fake\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("pipelines/b.yml"),
        "pipeline_name: b\ndepends_on: [a]\nsteps:\n  - id: extract\n    type: source\n    source_type: fake\n",
    )
    .unwrap();

    let code = handle(ValidateArgs { select: Vec::new() }, dir.path())
        .await
        .unwrap();
    assert_eq!(code, 2);
}
