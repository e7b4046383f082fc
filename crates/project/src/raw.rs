// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-shape structs for `dft_project.yml` and `pipelines/**/*.yml`. These
//! mirror the file formats exactly; conversion into `dft_core::{Pipeline,
//! Step}` (and its validation) happens in `convert`. Template expression
//! text inside `config`/`variables` is kept verbatim — nothing here renders.

use dft_core::{StepId, StepKind};
use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use std::fmt;

/// One YAML document under `pipelines/**/*.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineRaw {
    #[serde(alias = "name")]
    pub pipeline_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub variables: IndexMap<String, JsonValue>,
    #[serde(default, deserialize_with = "deserialize_steps")]
    pub steps: Vec<StepRaw>,
}

/// One step record. `<kind>_type` is a trio of mutually-exclusive optional
/// fields rather than one polymorphic field, since YAML gives us no tagged
/// union for free here; exactly one matching `kind` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct StepRaw {
    #[serde(default = "default_step_id")]
    pub id: StepId,
    #[serde(rename = "type")]
    pub kind: StepKind,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub processor_type: Option<String>,
    #[serde(default)]
    pub endpoint_type: Option<String>,
    #[serde(default)]
    pub connection: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<StepId>,
    #[serde(default)]
    pub config: IndexMap<String, JsonValue>,
}

impl StepRaw {
    /// The `<kind>_type` value that applies to this step's declared `kind`.
    pub fn declared_component_type(&self) -> Option<&str> {
        match self.kind {
            StepKind::Source => self.source_type.as_deref(),
            StepKind::Processor => self.processor_type.as_deref(),
            StepKind::Endpoint => self.endpoint_type.as_deref(),
        }
    }
}

fn default_step_id() -> StepId {
    StepId::new(String::new())
}

/// Deserialize `steps` from either a YAML sequence or a mapping of
/// `id -> step body`; the mapping form preserves declaration order via
/// `IndexMap` and injects the map key as `id` when the body omits it.
fn deserialize_steps<'de, D>(deserializer: D) -> Result<Vec<StepRaw>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StepsVisitor;

    impl<'de> Visitor<'de> for StepsVisitor {
        type Value = Vec<StepRaw>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a sequence of steps or a map of id -> step body")
        }

        fn visit_seq<S>(self, seq: S) -> Result<Vec<StepRaw>, S::Error>
        where
            S: SeqAccess<'de>,
        {
            Vec::deserialize(de::value::SeqAccessDeserializer::new(seq))
        }

        fn visit_map<M>(self, map: M) -> Result<Vec<StepRaw>, M::Error>
        where
            M: MapAccess<'de>,
        {
            let index_map: IndexMap<String, StepRaw> =
                IndexMap::deserialize(de::value::MapAccessDeserializer::new(map))?;
            Ok(index_map
                .into_iter()
                .map(|(key, mut step)| {
                    if step.id.as_str().is_empty() {
                        step.id = StepId::new(key);
                    }
                    step
                })
                .collect())
        }
    }

    deserializer.deserialize_any(StepsVisitor)
}

#[cfg(test)]
#[path = "raw_tests.rs"]
mod tests;
