//! Brace layout before classification
//!
//! After brace splitting every `{` sits alone on its line. The classifier
//! recognizes a loop header by the `{` on the same line, so this stage cuddles
//! each standalone `{` back onto the line above it. Depth is not checked here:
//! `.` and the conditional markers only become real braces during translation.

use crate::transpiler::pipeline::mapper::{Stage, TextMapper, TransformationError};
use crate::transpiler::pipeline::mappers::normalize_lines::normalize_lines;
use crate::transpiler::pipeline::mappers::reflow::cuddle_open_braces;

pub struct BraceLayoutMapper;

impl BraceLayoutMapper {
    pub fn new() -> Self {
        BraceLayoutMapper
    }
}

impl Default for BraceLayoutMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMapper for BraceLayoutMapper {
    fn stage(&self) -> Stage {
        Stage::Layout
    }

    fn map_text(&mut self, text: String) -> Result<String, TransformationError> {
        Ok(normalize_lines(&cuddle_open_braces(&text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_header_gets_its_brace_back() {
        let mut mapper = BraceLayoutMapper::new();
        let out = mapper
            .map_text("x < 3\n{\n^x\n}".to_string())
            .unwrap();
        assert_eq!(out, "x < 3 {\n^x\n}");
    }

    #[test]
    fn test_unbalanced_text_is_not_rejected() {
        let mut mapper = BraceLayoutMapper::new();
        assert_eq!(mapper.map_text("}\n}".to_string()).unwrap(), "}\n}");
    }
}
