// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI subcommands (§6 External Interfaces).

pub mod deps;
pub mod init;
pub mod run;
pub mod update_gitignore;
pub mod validate;

use dft_engine::OrchestratorError;

/// Exit-code taxonomy from SPEC_FULL.md §6: `2` for load/validation
/// failures, `3` for a malformed selector.
pub fn exit_code_for(e: &OrchestratorError) -> i32 {
    match e {
        OrchestratorError::Load(_) | OrchestratorError::Validation(_) => 2,
        OrchestratorError::Selector(_) => 3,
    }
}

/// Parse a `key=value` pair, as used by `--vars` and similar flags.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// Parse a comma-separated list of `key=value` pairs, as named by
/// `--vars k=v[,k=v]…` (SPEC_FULL.md §6).
pub fn parse_vars_list(s: &str) -> Result<Vec<(String, String)>, String> {
    s.split(',').map(parse_key_value).collect()
}
