// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project state store: one JSON file per pipeline under
//! `.dft/state/pipeline_<name>.json`, replaced atomically on every write.

use crate::error::StateError;
use crate::writer::{FsStateWriter, StateWriter};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::path::PathBuf;

/// Durable per-pipeline key/value state, rooted at `.dft/state/`.
///
/// Single-writer per pipeline is a caller contract: the orchestrator must
/// never invoke `save`/`update` for the same pipeline from two concurrent
/// plan entries.
pub struct StateStore<W: StateWriter = FsStateWriter> {
    writer: W,
    root: PathBuf,
}

impl StateStore<FsStateWriter> {
    pub fn new(root: PathBuf) -> Self {
        Self::with_writer(FsStateWriter, root)
    }
}

impl<W: StateWriter> StateStore<W> {
    pub fn with_writer(writer: W, root: PathBuf) -> Self {
        Self { writer, root }
    }

    fn path_for(&self, pipeline: &str) -> PathBuf {
        self.root.join(format!("pipeline_{pipeline}.json"))
    }

    /// Returns the current state for `pipeline`. A missing file is not an
    /// error: it means the pipeline has never completed, and yields an
    /// empty map.
    pub fn load(&self, pipeline: &str) -> Result<IndexMap<String, JsonValue>, StateError> {
        let path = self.path_for(pipeline);
        let bytes = self
            .writer
            .read(&path)
            .map_err(|source| StateError::Io {
                pipeline: pipeline.to_string(),
                source,
            })?;
        match bytes {
            None => Ok(IndexMap::new()),
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|source| StateError::Deserialize {
                pipeline: pipeline.to_string(),
                source,
            }),
        }
    }

    /// Atomically replaces the state file for `pipeline`: write to a
    /// temporary file, fsync it, rename over the final path, fsync the
    /// directory. If any step fails, the existing file (if any) is left
    /// untouched.
    pub fn save(
        &self,
        pipeline: &str,
        state: &IndexMap<String, JsonValue>,
    ) -> Result<(), StateError> {
        let path = self.path_for(pipeline);
        let tmp_path = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(state).map_err(|source| StateError::Serialize {
            pipeline: pipeline.to_string(),
            source,
        })?;
        let io_err = |source: std::io::Error| StateError::Io {
            pipeline: pipeline.to_string(),
            source,
        };
        self.writer.write_tmp(&tmp_path, &data).map_err(io_err)?;
        self.writer.fsync_file(&tmp_path).map_err(io_err)?;
        self.writer.rename(&tmp_path, &path).map_err(io_err)?;
        if let Some(parent) = path.parent() {
            self.writer.fsync_dir(parent).map_err(io_err)?;
        }
        tracing::debug!(pipeline, path = %path.display(), "state saved");
        Ok(())
    }

    /// Read-modify-write: load current state, apply `kv` on top, save, and
    /// return the resulting map.
    pub fn update(
        &self,
        pipeline: &str,
        kv: impl IntoIterator<Item = (String, JsonValue)>,
    ) -> Result<IndexMap<String, JsonValue>, StateError> {
        let mut state = self.load(pipeline)?;
        for (k, v) in kv {
            state.insert(k, v);
        }
        self.save(pipeline, &state)?;
        Ok(state)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
