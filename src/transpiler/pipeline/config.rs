//! Transpile options
//!
//! Options are fixed for the duration of one run. They deserialize with serde so
//! the configuration layer can build them from TOML and CLI overrides.

use crate::transpiler::literals::DEFAULT_ESCAPE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the final reflow places braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BraceStyle {
    /// Every brace on a line of its own.
    OwnLine,
    /// K&R: `{` ends the header line, `} else {` shares one line.
    #[default]
    Cuddled,
    /// Brace-only lines are dropped; indentation carries the structure.
    Stripped,
}

impl BraceStyle {
    pub const ALL: [BraceStyle; 3] = [BraceStyle::OwnLine, BraceStyle::Cuddled, BraceStyle::Stripped];

    pub fn name(self) -> &'static str {
        match self {
            BraceStyle::OwnLine => "own-line",
            BraceStyle::Cuddled => "cuddled",
            BraceStyle::Stripped => "stripped",
        }
    }
}

impl fmt::Display for BraceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BraceStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BraceStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| {
                format!("unknown brace style '{s}' (expected own-line, cuddled or stripped)")
            })
    }
}

/// Knobs for a single transpile run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspileOptions {
    /// Escape character inside string literals. `\` selects backslash mode.
    pub escape_char: char,
    /// Everything from this marker to the end of the line is dropped. Empty disables.
    pub comment_marker: String,
    /// Source spelling of a block open; emitted as `{`.
    pub open_brace: String,
    /// Source spelling of a block close; emitted as `}`.
    pub close_brace: String,
    pub brace_style: BraceStyle,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            escape_char: DEFAULT_ESCAPE,
            comment_marker: ";".to_string(),
            open_brace: "{".to_string(),
            close_brace: "}".to_string(),
            brace_style: BraceStyle::default(),
        }
    }
}

impl TranspileOptions {
    /// Reject option combinations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.escape_char == '"' || self.escape_char.is_whitespace() {
            return Err(format!(
                "escape character {:?} cannot be a quote or whitespace",
                self.escape_char
            ));
        }
        // Quotes and digits occur in literal placeholders
        if self.comment_marker.contains('"') || has_digit(&self.comment_marker) {
            return Err(format!(
                "comment marker '{}' cannot contain quotes or digits",
                self.comment_marker
            ));
        }
        for (what, brace) in [("open", &self.open_brace), ("close", &self.close_brace)] {
            if brace.is_empty() {
                return Err(format!("{what} brace cannot be empty"));
            }
            if brace.contains('"') || has_digit(brace) || brace.chars().any(char::is_whitespace) {
                return Err(format!(
                    "{what} brace '{brace}' cannot contain quotes, digits or whitespace"
                ));
            }
        }
        if self.open_brace == self.close_brace {
            return Err("open and close braces must differ".to_string());
        }
        Ok(())
    }
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}
