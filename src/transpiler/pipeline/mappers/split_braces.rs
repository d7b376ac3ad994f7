//! Brace splitting mapper
//!
//! Puts every block brace on a line of its own so later stages can treat braces
//! as whole lines. Alternative source spellings are normalized to `{` and `}`.

use crate::transpiler::pipeline::mapper::{Stage, TextMapper, TransformationError};
use crate::transpiler::pipeline::mappers::normalize_lines::normalize_lines;

pub struct SplitBracesMapper {
    open: String,
    close: String,
}

impl SplitBracesMapper {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for SplitBracesMapper {
    fn default() -> Self {
        Self::new("{", "}")
    }
}

/// Force `open` / `close` onto their own lines as `{` / `}`.
pub fn split_braces(text: &str, open: &str, close: &str) -> String {
    let split = text
        .replace(open, "\n{\n")
        .replace(close, "\n}\n");
    normalize_lines(&split)
}

impl TextMapper for SplitBracesMapper {
    fn stage(&self) -> Stage {
        Stage::SplitBraces
    }

    fn map_text(&mut self, text: String) -> Result<String, TransformationError> {
        Ok(split_braces(&text, &self.open, &self.close))
    }
}
