// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The component module registry: a typed manifest at `components/registry.yml`
//! naming the `component_type` tags available to this project, beyond the
//! built-ins every factory ships with. Dynamic plugin loading is out of
//! scope for a single-binary core, so this is metadata the loader uses to
//! validate `component_type` references at load time, not a mechanism that
//! instantiates anything itself.

use crate::error::ProjectError;
use dft_core::StepKind;
use serde::Deserialize;
use std::path::Path;

/// Tags the built-in components in `dft-components::builtin` register under.
/// Kept in sync with `ComponentFactory::with_builtins` by convention; there
/// is no dependency edge from this crate to `dft-components`.
const BUILTIN_SOURCE_TAGS: &[&str] = &["fake"];
const BUILTIN_PROCESSOR_TAGS: &[&str] = &["fake", "noop"];
const BUILTIN_ENDPOINT_TAGS: &[&str] = &["fake", "noop"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentRegistry {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub processors: Vec<String>,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

impl ComponentRegistry {
    /// Load `components/registry.yml` from a project's `components/`
    /// directory. Absent file is not an error: a project may rely solely
    /// on built-in component types.
    pub fn load(components_dir: &Path) -> Result<Self, ProjectError> {
        let path = components_dir.join("registry.yml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ProjectError::Io(path.clone(), e))?;
        serde_yaml::from_str(&content).map_err(|e| ProjectError::Yaml(path, e))
    }

    /// Whether `component_type` is known for `kind`, counting both this
    /// registry's declared tags and the built-ins.
    pub fn knows(&self, kind: StepKind, component_type: &str) -> bool {
        let (builtins, declared): (&[&str], &[String]) = match kind {
            StepKind::Source => (BUILTIN_SOURCE_TAGS, &self.sources),
            StepKind::Processor => (BUILTIN_PROCESSOR_TAGS, &self.processors),
            StepKind::Endpoint => (BUILTIN_ENDPOINT_TAGS, &self.endpoints),
        };
        builtins.contains(&component_type) || declared.iter().any(|t| t == component_type)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
