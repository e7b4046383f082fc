// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Injectable clock for deterministic tests.
//!
//! The engine needs `now()` frozen across a whole invocation so that plan
//! generation and window enumeration are reproducible (see Testable
//! Property #2). Everything that reads the current time goes through this
//! trait instead of calling `chrono::Local::now()` directly.

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Fixed clock for tests. Cloning shares the same underlying instant, so
/// advancing one handle is visible through all its clones.
#[derive(Clone)]
pub struct FakeClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl FakeClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, delta: chrono::Duration) {
        *self.now.lock() = *self.now.lock() + delta;
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock() = now;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
