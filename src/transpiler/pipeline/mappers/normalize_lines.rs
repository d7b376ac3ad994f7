//! Line normalization mapper
//!
//! Treats `\r`, `\r\n` and `\n` alike as line breaks, trims every line and drops
//! lines left empty. Other stages call [`normalize_lines`] directly after they
//! introduce line breaks.

use crate::transpiler::pipeline::mapper::{Stage, TextMapper, TransformationError};

/// Split on `\r` and `\n`, trim each line, drop blank lines.
pub fn normalize_lines(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct NormalizeLinesMapper;

impl NormalizeLinesMapper {
    pub fn new() -> Self {
        NormalizeLinesMapper
    }
}

impl Default for NormalizeLinesMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMapper for NormalizeLinesMapper {
    fn stage(&self) -> Stage {
        Stage::Normalize
    }

    fn map_text(&mut self, text: String) -> Result<String, TransformationError> {
        Ok(normalize_lines(&text))
    }
}
