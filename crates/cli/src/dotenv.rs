// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal `.env` loader: `KEY=VALUE` lines, one per line, no interpolation
//! or export/quoting rules beyond stripping a single layer of matching
//! quotes. Loaded once, before selector resolution, per the contract in
//! SPEC_FULL.md §6.

use std::path::Path;

/// Parse `.env`-style content into `(key, value)` pairs. Blank lines and
/// lines starting with `#` are skipped. A line without `=` is ignored.
pub fn parse(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = unquote(value.trim());
        pairs.push((key.to_string(), value));
    }
    pairs
}

fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

/// Load `<project_root>/.env`, if present, into the process environment.
/// Existing environment variables are never overwritten. Absent file is
/// not an error.
pub fn load(project_root: &Path) {
    let path = project_root.join(".env");
    let Ok(content) = std::fs::read_to_string(&path) else {
        return;
    };
    for (key, value) in parse(&content) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(key, value);
        }
    }
}

#[cfg(test)]
#[path = "dotenv_tests.rs"]
mod tests;
