// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Component Factory (C4): resolves a `component_type` tag to an instance
//! of the matching trait. Three independent registries, one per kind;
//! lookup is exact. The factory never caches instances across
//! invocations — each call to `build_*` returns a fresh `Box<dyn _>`.

use crate::builtin::{FakeEndpoint, FakeProcessor, FakeSource, NoopEndpoint, NoopProcessor};
use crate::error::ComponentError;
use crate::traits::{Endpoint, Processor, Source};
use std::collections::HashMap;
use std::sync::Arc;

type SourceCtor = Arc<dyn Fn() -> Box<dyn Source> + Send + Sync>;
type ProcessorCtor = Arc<dyn Fn() -> Box<dyn Processor> + Send + Sync>;
type EndpointCtor = Arc<dyn Fn() -> Box<dyn Endpoint> + Send + Sync>;

pub struct ComponentFactory {
    sources: HashMap<String, SourceCtor>,
    processors: HashMap<String, ProcessorCtor>,
    endpoints: HashMap<String, EndpointCtor>,
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ComponentFactory {
    /// An empty factory with no registrations.
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            processors: HashMap::new(),
            endpoints: HashMap::new(),
        }
    }

    /// A factory pre-populated with the in-memory test components that
    /// ship with this repository (`fake_source`, `fake_processor`,
    /// `fake_endpoint`, `noop_processor`, `noop_endpoint`).
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register_source("fake", || Box::new(FakeSource));
        factory.register_processor("fake", || Box::new(FakeProcessor));
        factory.register_processor("noop", || Box::new(NoopProcessor));
        factory.register_endpoint("fake", || Box::new(FakeEndpoint));
        factory.register_endpoint("noop", || Box::new(NoopEndpoint));
        factory
    }

    pub fn register_source(
        &mut self,
        component_type: impl Into<String>,
        ctor: impl Fn() -> Box<dyn Source> + Send + Sync + 'static,
    ) {
        let component_type = component_type.into();
        tracing::debug!(component_type = %component_type, kind = "source", "registering component");
        self.sources.insert(component_type, Arc::new(ctor));
    }

    pub fn register_processor(
        &mut self,
        component_type: impl Into<String>,
        ctor: impl Fn() -> Box<dyn Processor> + Send + Sync + 'static,
    ) {
        let component_type = component_type.into();
        tracing::debug!(component_type = %component_type, kind = "processor", "registering component");
        self.processors.insert(component_type, Arc::new(ctor));
    }

    pub fn register_endpoint(
        &mut self,
        component_type: impl Into<String>,
        ctor: impl Fn() -> Box<dyn Endpoint> + Send + Sync + 'static,
    ) {
        let component_type = component_type.into();
        tracing::debug!(component_type = %component_type, kind = "endpoint", "registering component");
        self.endpoints.insert(component_type, Arc::new(ctor));
    }

    pub fn build_source(&self, component_type: &str) -> Result<Box<dyn Source>, ComponentError> {
        self.sources
            .get(component_type)
            .map(|ctor| ctor())
            .ok_or_else(|| ComponentError::UnknownComponent {
                kind: "source".to_string(),
                component_type: component_type.to_string(),
            })
    }

    pub fn build_processor(&self, component_type: &str) -> Result<Box<dyn Processor>, ComponentError> {
        self.processors
            .get(component_type)
            .map(|ctor| ctor())
            .ok_or_else(|| ComponentError::UnknownComponent {
                kind: "processor".to_string(),
                component_type: component_type.to_string(),
            })
    }

    pub fn build_endpoint(&self, component_type: &str) -> Result<Box<dyn Endpoint>, ComponentError> {
        self.endpoints
            .get(component_type)
            .map(|ctor| ctor())
            .ok_or_else(|| ComponentError::UnknownComponent {
                kind: "endpoint".to_string(),
                component_type: component_type.to_string(),
            })
    }

    pub fn knows_source(&self, component_type: &str) -> bool {
        self.sources.contains_key(component_type)
    }

    pub fn knows_processor(&self, component_type: &str) -> bool {
        self.processors.contains_key(component_type)
    }

    pub fn knows_endpoint(&self, component_type: &str) -> bool {
        self.endpoints.contains_key(component_type)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
