// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciles the `.dft/state/` ignore entry with a project's
//! `state.ignore_in_git` option.

use std::io;
use std::path::Path;

const IGNORE_ENTRY: &str = ".dft/state/";

/// Ensures `project_root/.gitignore` contains (or does not contain) the
/// state-directory ignore entry, matching `ignore_in_git`. Returns `true`
/// if the file was modified.
pub fn reconcile(project_root: &Path, ignore_in_git: bool) -> io::Result<bool> {
    let path = project_root.join(".gitignore");
    let existing = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    let has_entry = existing.lines().any(|line| line.trim() == IGNORE_ENTRY);

    if ignore_in_git == has_entry {
        return Ok(false);
    }

    let updated = if ignore_in_git {
        let mut contents = existing;
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        contents.push_str(IGNORE_ENTRY);
        contents.push('\n');
        contents
    } else {
        existing
            .lines()
            .filter(|line| line.trim() != IGNORE_ENTRY)
            .collect::<Vec<_>>()
            .join("\n")
    };

    std::fs::write(&path, updated)?;
    Ok(true)
}

#[cfg(test)]
#[path = "gitignore_tests.rs"]
mod tests;
