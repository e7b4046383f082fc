// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dft init` scaffolding.

use assert_cmd::Command;
use tempfile::TempDir;

#[test]
fn scaffolds_a_project_layout_in_a_fresh_directory() {
    let workdir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("dft").unwrap();
    cmd.current_dir(workdir.path());
    cmd.args(["init", "acme"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let root = workdir.path().join("acme");
    assert!(root.join("dft_project.yml").is_file());
    assert!(root.join("pipelines").is_dir());
    assert!(root.join("components").is_dir());

    let project_yml = std::fs::read_to_string(root.join("dft_project.yml")).unwrap();
    assert!(project_yml.contains("project_name: acme"));
}

#[test]
fn refuses_to_overwrite_an_existing_directory() {
    let workdir = TempDir::new().unwrap();
    std::fs::create_dir(workdir.path().join("acme")).unwrap();

    let mut cmd = Command::cargo_bin("dft").unwrap();
    cmd.current_dir(workdir.path());
    cmd.args(["init", "acme"]);
    let output = cmd.output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn an_initialized_project_validates_cleanly() {
    let workdir = TempDir::new().unwrap();

    let mut init = Command::cargo_bin("dft").unwrap();
    init.current_dir(workdir.path());
    init.args(["init", "acme"]);
    assert!(init.output().unwrap().status.success());

    let mut validate = Command::cargo_bin("dft").unwrap();
    validate.current_dir(workdir.path().join("acme"));
    validate.arg("validate");
    let output = validate.output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "0 pipeline(s) valid\n");
}
