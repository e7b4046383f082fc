// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime value produced while evaluating one expression.

use chrono::{DateTime, Local};

/// A value produced while evaluating an expression. Timestamps and
/// durations stay structured until the final string conversion so that
/// `.strftime(fmt)` / `.isoformat()` and `timestamp - timedelta(...)` work
/// without re-parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Timestamp(DateTime<Local>),
    Duration(chrono::Duration),
}

impl Value {
    /// String form used when substituting the value back into template text.
    pub fn render(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Value::Timestamp(ts) => ts.to_rfc3339(),
            Value::Duration(d) => format!("{}s", d.num_seconds()),
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Local>> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<chrono::Duration> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}
