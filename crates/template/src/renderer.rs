// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level rendering entry point: scan literal text for `{{ … }}`
//! markers and substitute each with its evaluated string form.

use crate::context::RenderContext;
use crate::error::TemplateError;
use crate::expr::evaluate;

/// Render one string. Text with no `{{` markers is returned unchanged
/// (the common case for most config leaves). Rendering is pure: it reads
/// `ctx` and the process environment but never mutates either, so
/// `render(render(s, ctx), ctx) == render(s, ctx)`.
pub fn render(text: &str, ctx: &RenderContext) -> Result<String, TemplateError> {
    if !text.contains("{{") {
        return Ok(text.to_string());
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open.find("}}").ok_or_else(|| {
            TemplateError::new(text, "unterminated `{{` marker (missing closing `}}`)")
        })?;
        let expression = &after_open[..end];
        let value = evaluate(expression, ctx)?;
        out.push_str(&value.render());
        rest = &after_open[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
