// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dft-storage: the durable per-pipeline state store (C2).

mod error;
mod gitignore;
mod store;
mod writer;

pub use error::StateError;
pub use gitignore::reconcile as reconcile_gitignore;
pub use store::StateStore;
pub use writer::{FsStateWriter, StateWriter};
