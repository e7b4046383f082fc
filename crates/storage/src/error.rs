// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from the state store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("I/O error reading or writing state for pipeline `{pipeline}`: {source}")]
    Io {
        pipeline: String,
        #[source]
        source: std::io::Error,
    },
    #[error("state file for pipeline `{pipeline}` is not valid JSON: {source}")]
    Deserialize {
        pipeline: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize state for pipeline `{pipeline}`: {source}")]
    Serialize {
        pipeline: String,
        #[source]
        source: serde_json::Error,
    },
}
