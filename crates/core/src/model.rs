// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain model: Project, Connection, Pipeline, Step, and the values that
//! flow between them at run time.

use chrono::{DateTime, Duration, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

crate::define_id! {
    /// Identifier of a step, unique within its owning pipeline.
    pub struct StepId;
}

crate::define_id! {
    /// Identifier of a pipeline, unique within its project.
    pub struct PipelineName;
}

/// The three kinds of step a component can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Source,
    Processor,
    Endpoint,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Source => "source",
            StepKind::Processor => "processor",
            StepKind::Endpoint => "endpoint",
        }
    }
}

/// A reusable configuration record consumed by a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, JsonValue>,
}

/// Whether the state directory should be kept out of version control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateOptions {
    #[serde(default = "default_true")]
    pub ignore_in_git: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            ignore_in_git: true,
        }
    }
}

/// Output format for the tracing subscriber the CLI installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingOptions {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: Option<LogFormat>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

/// Project-wide configuration, loaded once per invocation and immutable
/// thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project_name: String,
    #[serde(default)]
    pub state: StateOptions,
    #[serde(default)]
    pub connections: IndexMap<String, Connection>,
    #[serde(default)]
    pub variables: IndexMap<String, JsonValue>,
    #[serde(default)]
    pub logging: LoggingOptions,
}

/// One of the six microbatch granularities. `month` and `year` are
/// deliberate fixed-length approximations (30 and 365 days), not
/// calendar-aware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchSize {
    #[serde(rename = "10min")]
    TenMin,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl BatchSize {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "10min" => Some(Self::TenMin),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TenMin => "10min",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Fixed duration of one window of this size.
    pub fn duration(&self) -> Duration {
        match self {
            Self::TenMin => Duration::minutes(10),
            Self::Hour => Duration::hours(1),
            Self::Day => Duration::days(1),
            Self::Week => Duration::weeks(1),
            Self::Month => Duration::days(30),
            Self::Year => Duration::days(365),
        }
    }
}

/// Microbatch parameters declared under a pipeline's `variables.microbatch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrobatchConfig {
    pub event_time_column: String,
    pub batch_size: BatchSize,
    #[serde(default)]
    pub lookback: u32,
    pub begin: DateTime<Local>,
    #[serde(default)]
    pub end: Option<DateTime<Local>>,
}

/// A half-open time interval `[start, end)` assigned to one invocation of a
/// microbatch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchWindow {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub period: BatchSize,
    pub event_time_column: String,
}

/// One node of a pipeline's step graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub kind: StepKind,
    pub component_type: String,
    #[serde(default)]
    pub connection: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<StepId>,
    #[serde(default)]
    pub config: IndexMap<String, JsonValue>,
}

/// One pipeline declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: PipelineName,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<PipelineName>,
    #[serde(default)]
    pub variables: IndexMap<String, JsonValue>,
    #[serde(default)]
    pub microbatch: Option<MicrobatchConfig>,
    pub steps: Vec<Step>,
}

impl Pipeline {
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == *id)
    }
}

/// The in-memory value flowing between steps within one invocation. Never
/// persisted; `data` is opaque to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPacket {
    pub data: JsonValue,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
}

impl DataPacket {
    pub fn new(data: JsonValue) -> Self {
        Self {
            data,
            metadata: IndexMap::new(),
        }
    }
}

/// Reserved keys in a pipeline's persisted state map.
pub mod state_keys {
    pub const LAST_PROCESSED_TIMESTAMP: &str = "last_processed_timestamp";
    pub const LAST_PROCESSED_DATE: &str = "last_processed_date";
    pub const LAST_STATUS: &str = "last_status";
    pub const LAST_RUN_AT: &str = "last_run_at";
}

/// A single plan entry: either the whole pipeline runs once (`Full`) or one
/// microbatch window is processed (`Window`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEntry {
    Full,
    Window(BatchWindow),
}

/// The ordered list of plan entries for one pipeline in this invocation.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub pipeline: PipelineName,
    pub entries: Vec<PlanEntry>,
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
