//! Sigil rewriting
//!
//! Structural sigils become newline-delimited markers the classifier can match on
//! a per-line basis:
//!
//! | Sigil | Becomes |
//! |---|---|
//! | `]`, `\` | line break |
//! | `$` | `A_Index` |
//! | `???` | line break + `-???` (else-if) |
//! | `??` | line break + `--??` (else) |
//! | `?` | line break + `---?` (if) |
//! | `.` | `.` on a line of its own (block end) |
//!
//! The source is scanned once with logos. Longest match means `???` is never read
//! as `??` followed by `?`, and the markers written for one sigil are output only,
//! so they can never be rewritten again by a later rule.

use crate::transpiler::classify::{BLOCK_END, ELSE_IF_MARKER, ELSE_MARKER, IF_MARKER};
use crate::transpiler::pipeline::mapper::{Stage, TextMapper, TransformationError};
use crate::transpiler::pipeline::mappers::normalize_lines::normalize_lines;
use logos::Logos;
use tracing::trace;

/// Loop counter identifier of the target language.
pub const LOOP_INDEX: &str = "A_Index";

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum Sigil {
    #[token("]")]
    #[token("\\")]
    Break,
    #[token("$")]
    LoopIndex,
    #[token("???")]
    ElseIf,
    #[token("??")]
    Else,
    #[token("?")]
    If,
    #[token(".")]
    BlockEnd,
    #[regex(r"[^\]\\$?.]+")]
    Text,
}

/// Rewrite every sigil in `text`, then renormalize lines.
pub fn rewrite_sigils(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut lexer = Sigil::lexer(text);

    while let Some(token) = lexer.next() {
        match token {
            Ok(Sigil::Break) => out.push('\n'),
            Ok(Sigil::LoopIndex) => out.push_str(LOOP_INDEX),
            Ok(Sigil::ElseIf) => push_marker(&mut out, ELSE_IF_MARKER),
            Ok(Sigil::Else) => push_marker(&mut out, ELSE_MARKER),
            Ok(Sigil::If) => push_marker(&mut out, IF_MARKER),
            Ok(Sigil::BlockEnd) => {
                out.push('\n');
                out.push_str(BLOCK_END);
                out.push('\n');
            }
            Ok(Sigil::Text) | Err(()) => out.push_str(lexer.slice()),
        }
    }

    trace!(bytes = out.len(), "sigils rewritten");
    normalize_lines(&out)
}

fn push_marker(out: &mut String, marker: &str) {
    out.push('\n');
    out.push_str(marker);
}

pub struct RewriteSigilsMapper;

impl RewriteSigilsMapper {
    pub fn new() -> Self {
        RewriteSigilsMapper
    }
}

impl Default for RewriteSigilsMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMapper for RewriteSigilsMapper {
    fn stage(&self) -> Stage {
        Stage::RewriteSigils
    }

    fn map_text(&mut self, text: String) -> Result<String, TransformationError> {
        Ok(rewrite_sigils(&text))
    }
}
