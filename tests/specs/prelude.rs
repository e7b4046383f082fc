// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for black-box `dft` CLI specs.
//!
//! These tests are black-box: they invoke the `dft` binary and verify
//! stdout, stderr, and exit codes, rather than calling crate internals.

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// A scratch project directory. Holds the `TempDir` alive for the fixture's
/// lifetime and offers a small DSL for writing project files and invoking
/// the CLI against the directory.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// An empty scratch directory; no `dft_project.yml` written yet.
    pub fn empty() -> Self {
        Project { dir: TempDir::new().expect("create temp dir") }
    }

    /// A project with a minimal `dft_project.yml` and empty `pipelines/`
    /// and `components/` directories, matching what `dft init` scaffolds.
    pub fn new() -> Self {
        let project = Self::empty();
        project.file(
            "dft_project.yml",
            "project_name: fixture\n\
             state:\n  ignore_in_git: true\n\
             connections: {}\n\
             variables: {}\n",
        );
        project.mkdir("pipelines");
        project.mkdir("components");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `relative` under the project root, creating parent directories
    /// as needed.
    pub fn file(&self, relative: &str, contents: &str) -> &Self {
        let target = self.path().join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&target, contents).expect("write fixture file");
        self
    }

    pub fn mkdir(&self, relative: &str) -> &Self {
        std::fs::create_dir_all(self.path().join(relative)).expect("create dir");
        self
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path().join(relative)).expect("read fixture file")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path().join(relative).exists()
    }

    /// Build a `dft` invocation rooted at this project's directory via
    /// `-C <dir>`, so the working directory of the test process itself is
    /// never touched.
    pub fn dft(&self, args: &[&str]) -> CliBuilder {
        let mut cmd = Command::cargo_bin("dft").expect("locate dft binary");
        cmd.arg("-C").arg(self.path());
        cmd.args(args);
        CliBuilder { cmd }
    }
}

/// A single pending CLI invocation.
pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run the command and assert it exits with code 0.
    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().expect("spawn dft");
        let assert = RunAssert::from(output);
        assert.assert_exit_code(0);
        assert
    }

    /// Run the command and assert it exits with a non-zero code.
    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().expect("spawn dft");
        let assert = RunAssert::from(output);
        assert!(!assert.success, "expected a non-zero exit code, got 0");
        assert
    }

    /// Run the command and return the result regardless of exit code.
    pub fn run(mut self) -> RunAssert {
        let output = self.cmd.output().expect("spawn dft");
        RunAssert::from(output)
    }
}

pub struct RunAssert {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for RunAssert {
    fn from(output: std::process::Output) -> Self {
        RunAssert {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl RunAssert {
    pub fn assert_exit_code(&self, expected: i32) -> &Self {
        assert_eq!(
            self.code,
            Some(expected),
            "expected exit code {expected}, got {:?}\nstdout:\n{}\nstderr:\n{}",
            self.code,
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn stdout_has(&self, needle: &str) -> &Self {
        assert!(
            self.stdout.contains(needle),
            "expected stdout to contain {needle:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    pub fn stderr_has(&self, needle: &str) -> &Self {
        assert!(
            self.stderr.contains(needle),
            "expected stderr to contain {needle:?}\nstderr:\n{}",
            self.stderr
        );
        self
    }
}

/// A minimal two-step pipeline (`fake` source into a `noop` endpoint),
/// named so callers can pick the pipeline name, its tags, and its
/// inter-pipeline dependencies.
pub fn fake_pipeline(name: &str, tags: &[&str], depends_on: &[&str]) -> String {
    let tags_yaml = if tags.is_empty() {
        String::new()
    } else {
        format!(
            "tags: [{}]\n",
            tags.iter().map(|t| format!("\"{t}\"")).collect::<Vec<_>>().join(", ")
        )
    };
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
         {tags_yaml}{depends_yaml}\
         steps:\n\
         \x20\x20- id: extract\n\
         \x20\x20\x20\x20type: source\n\
         \x20\x20\x20\x20source_type: fake\n\
         \x20\x20- id: load\n\
         \x20\x20\x20\x20type: endpoint\n\
         \x20\x20\x20\x20endpoint_type: noop\n\
         \x20\x20\x20\x20depends_on: [extract]\n"
    )
}
