// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Microbatch execution: cold start, warm-restart cursor persistence across
//! separate invocations, and `--full-refresh` idempotency. `begin`/`end`
//! are both fixed in the past so the window set is independent of wall
//! clock time.

use crate::prelude::Project;
use serde_json::Value as JsonValue;

const BATCHED_PIPELINE: &str = r#"
pipeline_name: batched
variables:
  microbatch:
    event_time_column: ts
    batch_size: day
    begin: "2020-01-01T00:00:00+00:00"
    end: "2020-01-02T00:00:00+00:00"
    lookback: 0
steps:
  - id: extract
    type: source
    source_type: fake
    config:
      rows:
        - ts: "2020-01-01T12:00:00+00:00"
          value: 1
  - id: load
    type: endpoint
    endpoint_type: fake
    depends_on: [extract]
    config:
      output_path: output.json
      event_time_column: ts
"#;

fn output_rows(project: &Project) -> Vec<JsonValue> {
    serde_json::from_str(&project.read("output.json")).expect("output.json is a JSON array")
}

#[test]
fn cold_start_processes_exactly_the_configured_window() {
    let project = Project::new();
    project.file("pipelines/batched.yml", BATCHED_PIPELINE);

    project.dft(&["run"]).passes().stdout_has("batched: success");

    let rows = output_rows(&project);
    assert_eq!(rows.len(), 1);

    let state = project.read(".dft/state/pipeline_batched.json");
    assert!(state.contains("2020-01-02"));
}

#[test]
fn a_warm_restart_advances_no_further_once_the_window_is_exhausted() {
    let project = Project::new();
    project.file("pipelines/batched.yml", BATCHED_PIPELINE);

    project.dft(&["run"]).passes();
    assert_eq!(output_rows(&project).len(), 1);

    // Second invocation: the persisted cursor already covers [begin, end),
    // so no window remains to process and the output is untouched.
    project.dft(&["run"]).passes().stdout_has("batched: success");
    assert_eq!(output_rows(&project).len(), 1);
}

#[test]
fn full_refresh_reprocesses_the_window_idempotently() {
    let project = Project::new();
    project.file("pipelines/batched.yml", BATCHED_PIPELINE);

    project.dft(&["run"]).passes();
    assert_eq!(output_rows(&project).len(), 1);

    project.dft(&["run", "--full-refresh"]).passes();
    // fake_endpoint deletes existing rows inside the replayed window before
    // appending, so reprocessing the same window doesn't duplicate rows.
    assert_eq!(output_rows(&project).len(), 1);
}
