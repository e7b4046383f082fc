// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installs the `tracing-subscriber` filter for the CLI process.
//!
//! Precedence, highest first: `RUST_LOG`, `--log-level`, `info`. Output
//! always goes to stderr so stdout stays free for the `run`/`deps`
//! summaries a caller might pipe or diff.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init(log_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
