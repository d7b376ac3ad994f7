//! Indentation and brace reflow
//!
//! The last structural stage. Indentation is recomputed from nesting depth alone,
//! then braces are placed according to [`BraceStyle`]:
//!
//! - `own-line`: a trailing `{` and a leading `}` are split onto lines of their own
//! - `cuddled`: a standalone `{` joins the line before it and a `}` directly
//!   followed by `else {` fuses into `} else {`
//! - `stripped`: like `own-line`, then brace-only lines are dropped
//!
//! A line opens a block when its trimmed text ends with `{` and closes one when it
//! starts with `}`; `} else {` does both. Depth must never drop below zero and
//! must be zero again at the end of the buffer. Neither condition is repaired.
//!
//! Every line is first emitted as one space followed by `depth * INDENT_WIDTH`
//! spaces, and a single leading space is then removed from any line whose leading
//! run of spaces has odd length. The net effect is a clean multiple of
//! `INDENT_WIDTH`, and running the reflow on its own output changes nothing.

use crate::transpiler::pipeline::config::BraceStyle;
use crate::transpiler::pipeline::mapper::{Stage, TextMapper, TransformationError};
use crate::transpiler::pipeline::mappers::normalize_lines::normalize_lines;
use thiserror::Error;

/// Columns per nesting level.
pub const INDENT_WIDTH: usize = 4;

const OPEN: &str = "{";
const CLOSE: &str = "}";
const ELSE_OPEN: &str = "else {";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflowError {
    #[error("unbalanced blocks: unexpected close on line {line} of generated code")]
    UnexpectedClose { line: usize },

    #[error("unbalanced blocks: {depth} block(s) still open at end of input")]
    Unclosed { depth: usize },
}

pub struct ReflowMapper {
    style: BraceStyle,
}

impl ReflowMapper {
    pub fn new(style: BraceStyle) -> Self {
        Self { style }
    }
}

impl Default for ReflowMapper {
    fn default() -> Self {
        Self::new(BraceStyle::default())
    }
}

impl TextMapper for ReflowMapper {
    fn stage(&self) -> Stage {
        Stage::Reflow
    }

    fn map_text(&mut self, text: String) -> Result<String, TransformationError> {
        Ok(reflow(&text, self.style)?)
    }
}

/// Re-indent `text` and place its braces in `style`.
pub fn reflow(text: &str, style: BraceStyle) -> Result<String, ReflowError> {
    let normalized = normalize_lines(text);

    let lines = match style {
        BraceStyle::Cuddled => {
            let cuddled = cuddle_open_braces(&normalized);
            let indented = indent_lines(cuddled.lines())?;
            fuse_else(indented)
        }
        BraceStyle::OwnLine => indent_lines(split_braces_off(&normalized).iter().map(String::as_str))?,
        BraceStyle::Stripped => {
            let indented =
                indent_lines(split_braces_off(&normalized).iter().map(String::as_str))?;
            indented
                .into_iter()
                .filter(|line| !matches!(line.trim(), OPEN | CLOSE))
                .collect()
        }
    };

    Ok(lines
        .iter()
        .map(|line| drop_odd_leading_space(line))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Append every standalone `{` line to the line before it.
///
/// A `{` on the very first line has nothing to join and is left alone.
pub fn cuddle_open_braces(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        let mut line = line.trim_end().to_string();
        if lines.peek().map(|next| next.trim()) == Some(OPEN) {
            lines.next();
            line.push(' ');
            line.push_str(OPEN);
        }
        out.push(line);
    }

    out.join("\n")
}

/// Indent trimmed lines by nesting depth, checking balance on the way.
fn indent_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>, ReflowError> {
    let mut out = Vec::new();
    let mut depth: usize = 0;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.trim();
        if line.starts_with(CLOSE) {
            depth = depth
                .checked_sub(1)
                .ok_or(ReflowError::UnexpectedClose { line: index + 1 })?;
        }
        out.push(format!(" {}{}", " ".repeat(depth * INDENT_WIDTH), line));
        if line.ends_with(OPEN) {
            depth += 1;
        }
    }

    if depth != 0 {
        return Err(ReflowError::Unclosed { depth });
    }
    Ok(out)
}

/// Turn `}` followed by `else {` into a single `} else {` line.
fn fuse_else(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut lines = lines.into_iter().peekable();

    while let Some(line) = lines.next() {
        if line.trim() == CLOSE && lines.peek().map(|next| next.trim()) == Some(ELSE_OPEN) {
            lines.next();
            let indent = &line[..line.len() - line.trim_start().len()];
            out.push(format!("{indent}{CLOSE} {ELSE_OPEN}"));
            continue;
        }
        out.push(line);
    }

    out
}

/// Give every brace a line of its own.
fn split_braces_off(text: &str) -> Vec<String> {
    let mut out = Vec::new();

    for line in text.lines() {
        let mut rest = line.trim();
        if rest == OPEN || rest == CLOSE {
            out.push(rest.to_string());
            continue;
        }

        let closes = match rest.strip_prefix(CLOSE) {
            Some(after) => {
                rest = after.trim_start();
                true
            }
            None => false,
        };
        let opens = match rest.strip_suffix(OPEN) {
            Some(before) => {
                rest = before.trim_end();
                true
            }
            None => false,
        };

        if closes {
            out.push(CLOSE.to_string());
        }
        if !rest.is_empty() {
            out.push(rest.to_string());
        }
        if opens {
            out.push(OPEN.to_string());
        }
    }

    out
}

/// Remove one space from a line whose leading space run has odd length.
pub fn drop_odd_leading_space(line: &str) -> &str {
    let leading = line.len() - line.trim_start_matches(' ').len();
    if leading % 2 == 1 {
        &line[1..]
    } else {
        line
    }
}
