// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft run` over a linear dependency chain.

use crate::prelude::{fake_pipeline, Project};

#[test]
fn runs_every_pipeline_and_exits_zero() {
    let project = Project::new();
    project.file("pipelines/a.yml", &fake_pipeline("a", &[], &[]));
    project.file("pipelines/b.yml", &fake_pipeline("b", &[], &["a"]));
    project.file("pipelines/c.yml", &fake_pipeline("c", &[], &["b"]));

    let result = project.dft(&["run"]).passes();
    result
        .stdout_has("a: success")
        .stdout_has("b: success")
        .stdout_has("c: success");

    let stdout = &result.stdout;
    let pos_a = stdout.find("a: success").unwrap();
    let pos_b = stdout.find("b: success").unwrap();
    let pos_c = stdout.find("c: success").unwrap();
    assert!(pos_a < pos_b && pos_b < pos_c, "expected a, b, c in order:\n{stdout}");
}

#[test]
fn each_run_persists_a_state_file_per_pipeline() {
    let project = Project::new();
    project.file("pipelines/a.yml", &fake_pipeline("a", &[], &[]));

    project.dft(&["run"]).passes();

    assert!(project.exists(".dft/state/pipeline_a.json"));
    let state = project.read(".dft/state/pipeline_a.json");
    assert!(state.contains("\"last_status\""));
    assert!(state.contains("\"success\""));
}

#[test]
fn running_with_no_pipelines_declared_succeeds_trivially() {
    let project = Project::new();
    project.dft(&["run"]).passes();
}
