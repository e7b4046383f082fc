// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser and evaluator for the small expression language inside
//! `{{ … }}` markers: `var("x")`, `env_var("X", default?)`,
//! `state.get("k", default?)`, `today()`/`yesterday()`/`now()`/
//! `days_ago(n)`, batch variables with `.strftime(fmt)`/`.isoformat()`,
//! `timedelta(hours|days|minutes=N)`, and `timestamp - timedelta(...)`.

use crate::context::RenderContext;
use crate::error::TemplateError;
use crate::value::Value;
use chrono::{Duration, Local, NaiveTime};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Num(f64),
    LParen,
    RParen,
    Comma,
    Dot,
    Eq,
    Minus,
}

fn lex(src: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            '=' => {
                tokens.push(Token::Eq);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '"' | '\'' => {
                let quote = c;
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != quote {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err("unterminated string literal".to_string());
                }
                let s: String = chars[start..i].iter().collect();
                tokens.push(Token::Str(s));
                i += 1;
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let s: String = chars[start..i].iter().collect();
                let n: f64 = s.parse().map_err(|_| format!("invalid number `{s}`"))?;
                tokens.push(Token::Num(n));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let s: String = chars[start..i].iter().collect();
                tokens.push(Token::Ident(s));
            }
            other => return Err(format!("unexpected character `{other}`")),
        }
    }
    Ok(tokens)
}

/// An argument passed to a function call: either positional or `name=value`.
enum Arg {
    Positional(Ast),
    Named(String, Ast),
}

enum Ast {
    Ident(String),
    Str(String),
    Num(f64),
    Call(String, Vec<Arg>),
    MethodCall(Box<Ast>, String, Vec<Arg>),
    Sub(Box<Ast>, Box<Ast>),
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        match self.advance() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(format!("expected {expected:?}, found {tok:?}")),
            None => Err(format!("expected {expected:?}, found end of expression")),
        }
    }

    fn parse_expr(&mut self) -> Result<Ast, String> {
        let mut lhs = self.parse_postfix()?;
        while matches!(self.peek(), Some(Token::Minus)) {
            self.advance();
            let rhs = self.parse_postfix()?;
            lhs = Ast::Sub(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_postfix(&mut self) -> Result<Ast, String> {
        let mut node = self.parse_primary()?;
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.advance();
                    let method = match self.advance() {
                        Some(Token::Ident(name)) => name.clone(),
                        other => return Err(format!("expected method name, found {other:?}")),
                    };
                    self.expect(&Token::LParen)?;
                    let args = self.parse_args()?;
                    node = Ast::MethodCall(Box::new(node), method, args);
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Ast, String> {
        match self.advance() {
            Some(Token::Str(s)) => Ok(Ast::Str(s.clone())),
            Some(Token::Num(n)) => Ok(Ast::Num(*n)),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                let name = name.clone();
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.advance();
                    let args = self.parse_args()?;
                    Ok(Ast::Call(name, args))
                } else {
                    Ok(Ast::Ident(name))
                }
            }
            other => Err(format!("unexpected token {other:?}")),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Arg>, String> {
        let mut args = Vec::new();
        if matches!(self.peek(), Some(Token::RParen)) {
            self.advance();
            return Ok(args);
        }
        loop {
            // name=value lookahead
            if let Some(Token::Ident(name)) = self.peek() {
                let name = name.clone();
                if self.tokens.get(self.pos + 1) == Some(&Token::Eq) {
                    self.advance();
                    self.advance();
                    let value = self.parse_expr()?;
                    args.push(Arg::Named(name, value));
                } else {
                    args.push(Arg::Positional(self.parse_expr()?));
                }
            } else {
                args.push(Arg::Positional(self.parse_expr()?));
            }
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => break,
                other => return Err(format!("expected `,` or `)`, found {other:?}")),
            }
        }
        Ok(args)
    }
}

fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::String(s) => Value::Str(s.clone()),
        JsonValue::Number(n) => Value::Num(n.as_f64().unwrap_or_default()),
        JsonValue::Bool(b) => Value::Str(b.to_string()),
        other => Value::Str(other.to_string()),
    }
}

fn eval_positional(args: &[Arg], idx: usize, ctx: &RenderContext) -> Result<Option<Value>, String> {
    let mut positional_seen = 0;
    for arg in args {
        if let Arg::Positional(ast) = arg {
            if positional_seen == idx {
                return Ok(Some(eval(ast, ctx)?));
            }
            positional_seen += 1;
        }
    }
    Ok(None)
}

fn eval_named(args: &[Arg], name: &str, ctx: &RenderContext) -> Result<Option<Value>, String> {
    for arg in args {
        if let Arg::Named(n, ast) = arg {
            if n == name {
                return Ok(Some(eval(ast, ctx)?));
            }
        }
    }
    Ok(None)
}

fn eval(ast: &Ast, ctx: &RenderContext) -> Result<Value, String> {
    match ast {
        Ast::Str(s) => Ok(Value::Str(s.clone())),
        Ast::Num(n) => Ok(Value::Num(*n)),
        Ast::Ident(name) => eval_ident(name, ctx),
        Ast::Call(name, args) => eval_call(name, args, ctx),
        Ast::MethodCall(recv, method, args) => eval_method_call(recv, method, args, ctx),
        Ast::Sub(lhs, rhs) => {
            let lhs = eval(lhs, ctx)?;
            let rhs = eval(rhs, ctx)?;
            match (lhs.as_timestamp(), rhs.as_duration()) {
                (Some(ts), Some(d)) => Ok(Value::Timestamp(ts - d)),
                _ => Err("`-` requires a timestamp minus a duration".to_string()),
            }
        }
    }
}

fn eval_ident(name: &str, ctx: &RenderContext) -> Result<Value, String> {
    match name {
        "batch_start" => ctx
            .batch()
            .map(|b| Value::Timestamp(b.start))
            .ok_or_else(|| "batch_start is only available inside a microbatch window".to_string()),
        "batch_end" => ctx
            .batch()
            .map(|b| Value::Timestamp(b.end))
            .ok_or_else(|| "batch_end is only available inside a microbatch window".to_string()),
        "batch_period" => ctx
            .batch()
            .map(|b| Value::Str(b.period.clone()))
            .ok_or_else(|| "batch_period is only available inside a microbatch window".to_string()),
        "event_time_column" => ctx
            .batch()
            .map(|b| Value::Str(b.event_time_column.clone()))
            .ok_or_else(|| {
                "event_time_column is only available inside a microbatch window".to_string()
            }),
        "state" => Err("`state` must be used as `state.get(...)`".to_string()),
        other => Err(format!("unknown identifier `{other}`")),
    }
}

fn eval_call(name: &str, args: &[Arg], ctx: &RenderContext) -> Result<Value, String> {
    match name {
        "var" => {
            let key = match eval_positional(args, 0, ctx)? {
                Some(Value::Str(s)) => s,
                _ => return Err("var() requires a string argument".to_string()),
            };
            let (found, searched) = ctx.lookup(&key);
            match found {
                Some(v) => Ok(json_to_value(v)),
                None => Err(format!(
                    "unknown variable `{key}` (searched layers: {})",
                    searched.join(", ")
                )),
            }
        }
        "env_var" => {
            let key = match eval_positional(args, 0, ctx)? {
                Some(Value::Str(s)) => s,
                _ => return Err("env_var() requires a string argument".to_string()),
            };
            match std::env::var(&key) {
                Ok(v) => Ok(Value::Str(v)),
                Err(_) => match eval_positional(args, 1, ctx)? {
                    Some(default) => Ok(default),
                    None => Err(format!("environment variable `{key}` is not set")),
                },
            }
        }
        "today" => {
            let midnight = ctx.clock().now().date_naive().and_time(NaiveTime::MIN);
            let today = midnight
                .and_local_timezone(Local)
                .single()
                .unwrap_or_else(|| ctx.clock().now());
            Ok(Value::Timestamp(today))
        }
        "yesterday" => {
            let midnight = ctx.clock().now().date_naive().and_time(NaiveTime::MIN);
            let yesterday = (midnight - Duration::days(1))
                .and_local_timezone(Local)
                .single()
                .unwrap_or_else(|| ctx.clock().now());
            Ok(Value::Timestamp(yesterday))
        }
        "now" => Ok(Value::Timestamp(ctx.clock().now())),
        "days_ago" => {
            let n = match eval_positional(args, 0, ctx)? {
                Some(v) => v.as_num().ok_or("days_ago() requires a number")?,
                None => return Err("days_ago() requires one argument".to_string()),
            };
            Ok(Value::Timestamp(ctx.clock().now() - Duration::days(n as i64)))
        }
        "timedelta" => {
            let mut total = Duration::zero();
            if let Some(v) = eval_named(args, "hours", ctx)? {
                total = total + Duration::hours(v.as_num().unwrap_or_default() as i64);
            }
            if let Some(v) = eval_named(args, "days", ctx)? {
                total = total + Duration::days(v.as_num().unwrap_or_default() as i64);
            }
            if let Some(v) = eval_named(args, "minutes", ctx)? {
                total = total + Duration::minutes(v.as_num().unwrap_or_default() as i64);
            }
            Ok(Value::Duration(total))
        }
        other => Err(format!("unknown function `{other}`")),
    }
}

fn eval_method_call(
    recv: &Ast,
    method: &str,
    args: &[Arg],
    ctx: &RenderContext,
) -> Result<Value, String> {
    // `state.get("key", default?)` is special-cased: `state` alone is not a
    // valid value, only `state.get(...)` is.
    if matches!(recv, Ast::Ident(name) if name == "state") && method == "get" {
        let key = match eval_positional(args, 0, ctx)? {
            Some(Value::Str(s)) => s,
            _ => return Err("state.get() requires a string key".to_string()),
        };
        return match ctx.state_get(&key) {
            Some(v) => Ok(json_to_value(v)),
            None => match eval_positional(args, 1, ctx)? {
                Some(default) => Ok(default),
                None => Err(format!("no state value for key `{key}`")),
            },
        };
    }

    let value = eval(recv, ctx)?;
    match method {
        "strftime" => {
            let fmt = match eval_positional(args, 0, ctx)? {
                Some(Value::Str(s)) => s,
                _ => return Err("strftime() requires a format string".to_string()),
            };
            let ts = value
                .as_timestamp()
                .ok_or("strftime() can only be called on a timestamp")?;
            Ok(Value::Str(ts.format(&fmt).to_string()))
        }
        "isoformat" => {
            let ts = value
                .as_timestamp()
                .ok_or("isoformat() can only be called on a timestamp")?;
            Ok(Value::Str(ts.to_rfc3339()))
        }
        other => Err(format!("unknown method `.{other}()`")),
    }
}

/// Parse and evaluate one expression (the text between `{{` and `}}`,
/// trimmed).
pub fn evaluate(expression: &str, ctx: &RenderContext) -> Result<Value, TemplateError> {
    let trimmed = expression.trim();
    let tokens = lex(trimmed).map_err(|e| TemplateError::new(trimmed, e))?;
    let mut parser = Parser::new(&tokens);
    let ast = parser
        .parse_expr()
        .map_err(|e| TemplateError::new(trimmed, e))?;
    if parser.pos != tokens.len() {
        return Err(TemplateError::new(trimmed, "trailing tokens after expression"));
    }
    eval(&ast, ctx).map_err(|e| TemplateError::new(trimmed, e))
}

#[cfg(test)]
#[path = "expr_tests.rs"]
mod tests;
