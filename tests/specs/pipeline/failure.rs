// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A pipeline failure skips every pipeline downstream of it, and `dft run`
//! exits `1`.

use crate::prelude::{fake_pipeline, Project};

/// A pipeline whose endpoint step is missing `config.output_path`, which
/// `fake_endpoint` requires — deterministically fails at run time.
fn broken_pipeline(name: &str, depends_on: &[&str]) -> String {
    let depends_yaml = if depends_on.is_empty() {
        String::new()
    } else {
        format!(
            "depends_on: [{}]\n",
            depends_on.iter().map(|d| format!("\"{d}\"")).collect::<Vec<_>>().join(", ")
        )
    };
    format!(
        "pipeline_name: {name}\n\
         {depends_yaml}\
         steps:\n\
         \x20\x20- id: extract\n\
         \x20\x20\x20\x20type: source\n\
         \x20\x20\x20\x20source_type: fake\n\
         \x20\x20- id: load\n\
         \x20\x20\x20\x20type: endpoint\n\
         \x20\x20\x20\x20endpoint_type: fake\n\
         \x20\x20\x20\x20depends_on: [extract]\n"
    )
}

#[test]
fn a_failed_pipeline_reports_failure_and_skips_its_descendants() {
    let project = Project::new();
    project.file("pipelines/upstream.yml", &fake_pipeline("upstream", &[], &[]));
    project.file("pipelines/bad.yml", &broken_pipeline("bad", &["upstream"]));
    project.file("pipelines/downstream.yml", &fake_pipeline("downstream", &[], &["bad"]));
    project.file(
        "pipelines/unrelated.yml",
        &fake_pipeline("unrelated", &[], &[]),
    );

    let result = project.dft(&["run"]).fails();
    result.assert_exit_code(1);
    result
        .stdout_has("upstream: success")
        .stdout_has("bad: failure")
        .stdout_has("downstream: skipped")
        .stdout_has("unrelated: success");
}

#[test]
fn validate_does_not_fail_on_a_pipeline_that_would_fail_at_run_time() {
    let project = Project::new();
    project.file("pipelines/bad.yml", &broken_pipeline("bad", &[]));

    project.dft(&["validate"]).passes().stdout_has("1 pipeline(s) valid");
}
