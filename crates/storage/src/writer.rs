// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic-write I/O, abstracted behind a trait for fault-injection tests.
//!
//! `StateStore::save` must leave the on-disk file unchanged if any step of
//! the write-tmp / fsync-tmp / rename / fsync-dir sequence fails (Testable
//! Property #10). `StateWriter` lets tests substitute a writer that fails
//! at a chosen step without touching the real filesystem.

use std::fs::File;
use std::io;
use std::path::Path;

/// Abstracts the filesystem operations `StateStore` needs, so tests can
/// inject failures at any step of the atomic-write sequence.
pub trait StateWriter: Send + Sync + 'static {
    fn write_tmp(&self, path: &Path, data: &[u8]) -> io::Result<()>;
    fn fsync_file(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn fsync_dir(&self, path: &Path) -> io::Result<()>;
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;
}

/// Production writer using real filesystem calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStateWriter;

impl StateWriter for FsStateWriter {
    fn write_tmp(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)
    }

    fn fsync_file(&self, path: &Path) -> io::Result<()> {
        File::open(path)?.sync_all()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn fsync_dir(&self, path: &Path) -> io::Result<()> {
        File::open(path)?.sync_all()
    }

    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
