// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Datelike, Local, TimeZone};
use dft_core::FakeClock;
use std::fs;
use tempfile::TempDir;

const PROJECT_YML: &str = r#"
project_name: acme
state:
  ignore_in_git: true
variables:
  env: test
logging:
  level: info
"#;

fn scaffold() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dft_project.yml"), PROJECT_YML).unwrap();
    fs::create_dir_all(dir.path().join("pipelines")).unwrap();
    dir
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(FakeClock::new(Local.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()))
}

#[tokio::test]
async fn linear_dependency_runs_upstream_before_downstream() {
    let dir = scaffold();
    fs::write(
        dir.path().join("pipelines/raw.yml"),
        r#"
pipeline_name: raw
steps:
  - id: extract
    type: source
    source_type: fake
    config: { rows: [] }
  - id: load
    type: endpoint
    endpoint_type: noop
    depends_on: [extract]
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("pipelines/curated.yml"),
        r#"
pipeline_name: curated
depends_on: [raw]
steps:
  - id: extract
    type: source
    source_type: fake
    config: { rows: [] }
  - id: load
    type: endpoint
    endpoint_type: noop
    depends_on: [extract]
"#,
    )
    .unwrap();

    let factory = ComponentFactory::with_builtins();
    let summary = run(dir.path(), &RunOptions::default(), &factory, clock())
        .await
        .unwrap();

    assert_eq!(summary.exit_code(), 0);
    let names: Vec<&str> = summary.outcomes.iter().map(|o| o.pipeline.as_str()).collect();
    assert_eq!(names, vec!["raw", "curated"]);
    assert!(summary.outcomes.iter().all(|o| o.status == PipelineStatus::Success));
}

#[tokio::test]
async fn a_failed_pipeline_skips_its_dependents() {
    let dir = scaffold();
    fs::create_dir_all(dir.path().join("components")).unwrap();
    fs::write(
        dir.path().join("components/registry.yml"),
        "sources: [unimplemented]\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("pipelines/raw.yml"),
        r#"
pipeline_name: raw
steps:
  - id: extract
    type: source
    source_type: unimplemented
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("pipelines/curated.yml"),
        r#"
pipeline_name: curated
depends_on: [raw]
steps:
  - id: extract
    type: source
    source_type: fake
"#,
    )
    .unwrap();

    let factory = ComponentFactory::with_builtins();
    let summary = run(dir.path(), &RunOptions::default(), &factory, clock())
        .await
        .unwrap();

    assert_eq!(summary.exit_code(), 1);
    let raw = summary.outcomes.iter().find(|o| o.pipeline == "raw").unwrap();
    let curated = summary.outcomes.iter().find(|o| o.pipeline == "curated").unwrap();
    assert_eq!(raw.status, PipelineStatus::Failure);
    assert_eq!(curated.status, PipelineStatus::Skipped);
}

#[tokio::test]
async fn selector_narrows_which_pipelines_run() {
    let dir = scaffold();
    fs::write(
        dir.path().join("pipelines/raw.yml"),
        r#"
pipeline_name: raw
steps:
  - id: extract
    type: source
    source_type: fake
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("pipelines/other.yml"),
        r#"
pipeline_name: other
steps:
  - id: extract
    type: source
    source_type: fake
"#,
    )
    .unwrap();

    let factory = ComponentFactory::with_builtins();
    let options = RunOptions {
        select: vec!["raw".to_string()],
        ..Default::default()
    };
    let summary = run(dir.path(), &options, &factory, clock()).await.unwrap();

    assert_eq!(summary.outcomes.len(), 1);
    assert_eq!(summary.outcomes[0].pipeline, "raw");
}

#[tokio::test]
async fn a_cyclic_pipeline_graph_is_a_validation_error() {
    let dir = scaffold();
    fs::write(
        dir.path().join("pipelines/a.yml"),
        r#"
pipeline_name: a
depends_on: [b]
steps:
  - id: extract
    type: source
    source_type: fake
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("pipelines/b.yml"),
        r#"
pipeline_name: b
depends_on: [a]
steps:
  - id: extract
    type: source
    source_type: fake
"#,
    )
    .unwrap();

    let factory = ComponentFactory::with_builtins();
    let err = run(dir.path(), &RunOptions::default(), &factory, clock())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Validation(_)));
}

#[tokio::test]
async fn successful_microbatch_run_persists_the_cursor() {
    let dir = scaffold();
    fs::write(
        dir.path().join("pipelines/events.yml"),
        r#"
pipeline_name: events
variables:
  microbatch:
    event_time_column: created_at
    batch_size: day
    begin: "2024-01-01T00:00:00+00:00"
steps:
  - id: extract
    type: source
    source_type: fake
    config: { rows: [] }
  - id: load
    type: endpoint
    endpoint_type: noop
    depends_on: [extract]
"#,
    )
    .unwrap();

    let factory = ComponentFactory::with_builtins();
    let summary = run(dir.path(), &RunOptions::default(), &factory, clock())
        .await
        .unwrap();
    assert_eq!(summary.exit_code(), 0);

    let state = StateStore::new(dir.path().join(".dft").join("state"));
    let persisted = state.load("events").unwrap();
    let cursor = persisted
        .get(dft_core::state_keys::LAST_PROCESSED_TIMESTAMP)
        .and_then(JsonValue::as_str)
        .unwrap();
    assert!(cursor.starts_with("2024-01-10"));
}

#[tokio::test]
async fn a_full_strategy_success_stamps_last_processed_date() {
    let dir = scaffold();
    fs::write(
        dir.path().join("pipelines/raw.yml"),
        r#"
pipeline_name: raw
steps:
  - id: extract
    type: source
    source_type: fake
    config: { rows: [] }
  - id: load
    type: endpoint
    endpoint_type: noop
    depends_on: [extract]
"#,
    )
    .unwrap();

    let factory = ComponentFactory::with_builtins();
    let summary = run(dir.path(), &RunOptions::default(), &factory, clock())
        .await
        .unwrap();
    assert_eq!(summary.exit_code(), 0);

    let state = StateStore::new(dir.path().join(".dft").join("state"));
    let persisted = state.load("raw").unwrap();
    let date = persisted
        .get(dft_core::state_keys::LAST_PROCESSED_DATE)
        .and_then(JsonValue::as_str)
        .unwrap();
    assert_eq!(date, "2024-01-10");
}

/// An endpoint that fails once the active window's day-of-month matches
/// `fail_on_day`, so a pipeline can be made to succeed on some windows and
/// fail on a later one, deterministically.
struct FlakyEndpoint {
    fail_on_day: u32,
}

#[async_trait::async_trait]
impl dft_components::Endpoint for FlakyEndpoint {
    async fn load(
        &self,
        _packet: dft_core::DataPacket,
        ctx: &dft_components::ComponentContext,
    ) -> Result<bool, dft_components::ComponentError> {
        let day = ctx.window.as_ref().map(|w| w.start.day()).unwrap_or(0);
        if day == self.fail_on_day {
            return Err(dft_components::ComponentError::Failed {
                pipeline: ctx.pipeline.clone(),
                step_id: ctx.step_id.clone(),
                component_type: ctx.component_type.clone(),
                message: "boom".to_string(),
            });
        }
        Ok(true)
    }
}

#[tokio::test]
async fn a_window_failure_leaves_the_cursor_at_the_last_successful_window() {
    let dir = scaffold();
    fs::create_dir_all(dir.path().join("components")).unwrap();
    fs::write(dir.path().join("components/registry.yml"), "endpoints: [flaky]\n").unwrap();
    fs::write(
        dir.path().join("pipelines/events.yml"),
        r#"
pipeline_name: events
variables:
  microbatch:
    event_time_column: created_at
    batch_size: day
    begin: "2024-01-01T00:00:00+00:00"
steps:
  - id: extract
    type: source
    source_type: fake
    config: { rows: [] }
  - id: load
    type: endpoint
    endpoint_type: flaky
    depends_on: [extract]
"#,
    )
    .unwrap();

    let mut factory = ComponentFactory::new();
    factory.register_source("fake", || Box::new(dft_components::builtin::FakeSource));
    factory.register_endpoint("flaky", || Box::new(FlakyEndpoint { fail_on_day: 3 }));

    let summary = run(dir.path(), &RunOptions::default(), &factory, clock())
        .await
        .unwrap();
    assert_eq!(summary.exit_code(), 1);
    let events = summary.outcomes.iter().find(|o| o.pipeline == "events").unwrap();
    assert_eq!(events.status, PipelineStatus::Failure);

    // Windows for Jan 1 and Jan 2 succeeded before Jan 3 failed; the cursor
    // must sit at Jan 2's window end, not the pre-run cursor and not
    // discarded because the run as a whole failed.
    let state = StateStore::new(dir.path().join(".dft").join("state"));
    let persisted = state.load("events").unwrap();
    let cursor = persisted
        .get(dft_core::state_keys::LAST_PROCESSED_TIMESTAMP)
        .and_then(JsonValue::as_str)
        .unwrap();
    assert!(cursor.starts_with("2024-01-03"));
    // A failed run must not report a success-only key like last_processed_date.
    assert!(persisted.get(dft_core::state_keys::LAST_STATUS).is_none());
}
