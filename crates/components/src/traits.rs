// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three component kinds the core consumes. Operations are `async fn`
//! so an async I/O backend can be plugged in without blocking a worker
//! thread, following the teacher's async-trait adapter contracts.

use crate::context::ComponentContext;
use crate::error::ComponentError;
use async_trait::async_trait;
use dft_core::DataPacket;

#[async_trait]
pub trait Source: Send + Sync {
    async fn extract(&self, ctx: &ComponentContext) -> Result<DataPacket, ComponentError>;

    /// Cheap reachability check; built-ins return `true` unconditionally.
    async fn test_connection(&self, _ctx: &ComponentContext) -> Result<bool, ComponentError> {
        Ok(true)
    }
}

#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(
        &self,
        packet: DataPacket,
        ctx: &ComponentContext,
    ) -> Result<DataPacket, ComponentError>;
}

#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Loads `packet`. Implementations that declare `event_time_column`
    /// in their config MUST delete existing rows in `ctx.window`'s range
    /// before writing (the window-replace contract) — built-ins model
    /// this against an in-memory table.
    async fn load(&self, packet: DataPacket, ctx: &ComponentContext) -> Result<bool, ComponentError>;
}
