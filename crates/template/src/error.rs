// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type for the template renderer.

use thiserror::Error;

/// Failure while evaluating one `{{ … }}` expression.
///
/// Carries the offending expression text and, for variable lookups, the
/// layered keys that were searched, so a user can see exactly why
/// resolution failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("template error in `{expression}`: {message}")]
pub struct TemplateError {
    pub expression: String,
    pub message: String,
    pub searched: Vec<String>,
}

impl TemplateError {
    pub fn new(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            message: message.into(),
            searched: Vec::new(),
        }
    }

    pub fn with_searched(mut self, searched: Vec<String>) -> Self {
        self.searched = searched;
        self
    }
}
