//! Comment stripping mapper
//!
//! Truncates every line at the first occurrence of the comment marker. The
//! marker is matched blindly, which is only safe because literals have already
//! been replaced by placeholders when this runs.

use crate::transpiler::pipeline::mapper::{Stage, TextMapper, TransformationError};

/// Drop `marker` and the rest of its line, keeping the line terminator.
pub fn strip_comments(text: &str, marker: &str) -> String {
    if marker.is_empty() {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| match line.find(marker) {
            Some(at) => &line[..at],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct StripCommentsMapper {
    marker: String,
}

impl StripCommentsMapper {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl TextMapper for StripCommentsMapper {
    fn stage(&self) -> Stage {
        Stage::StripComments
    }

    fn map_text(&mut self, text: String) -> Result<String, TransformationError> {
        Ok(strip_comments(&text, &self.marker))
    }
}
