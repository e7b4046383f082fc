// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft validate` and `dft deps`.

use crate::prelude::{fake_pipeline, Project};

#[test]
fn validate_reports_the_number_of_pipelines_in_scope() {
    let project = Project::new();
    project.file("pipelines/a.yml", &fake_pipeline("a", &[], &[]));
    project.file("pipelines/b.yml", &fake_pipeline("b", &[], &["a"]));

    project.dft(&["validate"]).passes().stdout_has("2 pipeline(s) valid");
}

#[test]
fn validate_can_be_scoped_with_select() {
    let project = Project::new();
    project.file("pipelines/a.yml", &fake_pipeline("a", &[], &[]));
    project.file("pipelines/b.yml", &fake_pipeline("b", &[], &["a"]));

    project.dft(&["validate", "--select", "a"]).passes().stdout_has("1 pipeline(s) valid");
}

#[test]
fn a_dependency_cycle_fails_validation_with_exit_code_two() {
    let project = Project::new();
    project.file("pipelines/a.yml", &fake_pipeline("a", &[], &["b"]));
    project.file("pipelines/b.yml", &fake_pipeline("b", &[], &["a"]));

    project.dft(&["validate"]).fails().assert_exit_code(2);
}

#[test]
fn an_unknown_selector_name_fails_with_exit_code_three() {
    let project = Project::new();
    project.file("pipelines/a.yml", &fake_pipeline("a", &[], &[]));

    project
        .dft(&["validate", "--select", "does-not-exist"])
        .fails()
        .assert_exit_code(3);
}

#[test]
fn deps_prints_pipelines_in_topological_order_with_their_dependencies() {
    let project = Project::new();
    project.file("pipelines/a.yml", &fake_pipeline("a", &[], &[]));
    project.file("pipelines/b.yml", &fake_pipeline("b", &[], &["a"]));
    project.file("pipelines/c.yml", &fake_pipeline("c", &[], &["a", "b"]));

    let result = project.dft(&["deps"]).passes();
    similar_asserts::assert_eq!(result.stdout, "a\nb <- a\nc <- a, b\n");
}
