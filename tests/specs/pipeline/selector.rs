// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Selector grammar (`+x`, `x+`, `tag:t`, `--exclude`) exercised through
//! `dft run`.

use crate::prelude::{fake_pipeline, Project};

fn chain_project() -> Project {
    let project = Project::new();
    project.file("pipelines/a.yml", &fake_pipeline("a", &["core"], &[]));
    project.file("pipelines/b.yml", &fake_pipeline("b", &["core"], &["a"]));
    project.file("pipelines/c.yml", &fake_pipeline("c", &["reporting"], &["b"]));
    project.file("pipelines/d.yml", &fake_pipeline("d", &[], &["c"]));
    project
}

#[test]
fn bare_name_selects_exactly_that_pipeline() {
    let project = chain_project();
    let result = project.dft(&["run", "--select", "b"]).passes();
    result.stdout_has("b: success");
    assert!(!result.stdout.contains("a:"));
    assert!(!result.stdout.contains("c:"));
}

#[test]
fn leading_plus_pulls_in_the_upstream_closure() {
    let project = chain_project();
    let result = project.dft(&["run", "--select", "+c"]).passes();
    result.stdout_has("a: success").stdout_has("b: success").stdout_has("c: success");
    assert!(!result.stdout.contains("d:"));
}

#[test]
fn trailing_plus_pulls_in_the_downstream_closure() {
    let project = chain_project();
    let result = project.dft(&["run", "--select", "b+"]).passes();
    result.stdout_has("b: success").stdout_has("c: success").stdout_has("d: success");
    assert!(!result.stdout.contains("a:"));
}

#[test]
fn tag_selector_expands_to_every_pipeline_carrying_the_tag() {
    let project = chain_project();
    let result = project.dft(&["run", "--select", "tag:core"]).passes();
    result.stdout_has("a: success").stdout_has("b: success");
    assert!(!result.stdout.contains("c:"));
    assert!(!result.stdout.contains("d:"));
}

#[test]
fn exclude_subtracts_from_the_selected_set() {
    let project = chain_project();
    let result = project.dft(&["run", "--select", "+d", "--exclude", "b"]).passes();
    result.stdout_has("a: success").stdout_has("c: success").stdout_has("d: success");
    assert!(!result.stdout.contains("b:"));
}

#[test]
fn comma_joins_multiple_atoms_in_one_expression() {
    let project = chain_project();
    let result = project.dft(&["run", "--select", "a,c"]).passes();
    result.stdout_has("a: success").stdout_has("c: success");
    assert!(!result.stdout.contains("b:"));
    assert!(!result.stdout.contains("d:"));
}
