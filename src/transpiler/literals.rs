//! String literal guard and restorer
//!
//! Every later stage of the pipeline rewrites text blindly: sigils become line
//! breaks, operators get padded, comment markers truncate lines. Literal contents
//! must survive all of that untouched, so the guard runs before anything else.
//!
//! # Design
//!
//! Guarding is a two step affair:
//!
//! 1. [`LiteralGuard::tokenize`] splits the source into [`Span::Code`] and
//!    [`Span::Literal`] spans, normalizing escape sequences inside literals.
//! 2. [`LiteralGuard::guard`] renders the spans back into text, replacing every
//!    literal with a quoted placeholder `"<SENTINEL><index><SENTINEL>"` and
//!    recording its body in a [`LiteralTable`].
//!
//! The sentinel is picked per run from a fixed list of uppercase candidates and
//! rejected when it occurs in any code span, so a placeholder can never be forged
//! by user content. Indices start at 1; the Nth placeholder emitted decodes to
//! the Nth table entry.
//!
//! # Escape modes
//!
//! With the default backslash escape, `\"` inside a literal is an escaped quote
//! and is kept verbatim; all other backslashes are kept as they are. With a
//! custom escape character `e`:
//!
//! - `ee` collapses to a single literal `e`
//! - `e` followed by any other character becomes `\`
//! - `e"` terminates the literal and the `e` is dropped
//! - a bare `\` is emitted as `\\`
//!
//! In both modes an escape character directly before a quote *outside* a literal
//! is a marker meaning "this quote does not open a literal": the marker and the
//! quote are both deleted from the stream.

use regex::Regex;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;
use tracing::debug;

/// The escape character that selects [`EscapeMode::Backslash`].
pub const DEFAULT_ESCAPE: char = '\\';

const QUOTE: char = '"';

const SENTINEL_CANDIDATES: &[&str] = &["HSLIT", "QZSTR", "XKQUOTE", "JWLITERAL"];
const SENTINEL_REPEATS: usize = 4;

/// Errors raised while guarding or restoring literals
#[derive(Debug, Error)]
pub enum LiteralError {
    #[error("unterminated string literal starting on line {line}")]
    Unterminated { line: usize },

    #[error("no placeholder sentinel avoids both the source text and the reserved markers")]
    NoSentinel,

    #[error("placeholder {placeholder} has no recorded literal")]
    UnknownPlaceholder { placeholder: String },

    #[error("a placeholder using sentinel {sentinel} was broken apart before restoration")]
    BrokenPlaceholder { sentinel: String },

    #[error("invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A run of source text, either plain code or the body of a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Code(String),
    Literal(String),
}

/// The two literal scanning algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeMode {
    Backslash,
    Custom(char),
}

impl EscapeMode {
    pub fn for_char(escape: char) -> Self {
        if escape == DEFAULT_ESCAPE {
            EscapeMode::Backslash
        } else {
            EscapeMode::Custom(escape)
        }
    }

    pub fn escape_char(self) -> char {
        match self {
            EscapeMode::Backslash => DEFAULT_ESCAPE,
            EscapeMode::Custom(c) => c,
        }
    }
}

/// Guarded text together with the literals it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedSource {
    pub text: String,
    pub table: LiteralTable,
}

/// Replaces literal bodies with placeholders.
#[derive(Debug, Clone)]
pub struct LiteralGuard {
    mode: EscapeMode,
    reserved: Vec<String>,
}

impl LiteralGuard {
    pub fn new(escape: char) -> Self {
        Self {
            mode: EscapeMode::for_char(escape),
            reserved: Vec::new(),
        }
    }

    /// Forbid the sentinel from containing `marker`.
    ///
    /// Used for markers later stages act on (comment markers, brace strings), so a
    /// placeholder can never be truncated or split by them.
    pub fn reserve(mut self, marker: impl Into<String>) -> Self {
        self.reserved.push(marker.into());
        self
    }

    pub fn mode(&self) -> EscapeMode {
        self.mode
    }

    /// Split `source` into code and literal spans.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Span>, LiteralError> {
        let escape = self.mode.escape_char();
        let mut spans = Vec::new();
        let mut code = String::new();
        let mut chars = source.chars().peekable();
        let mut line = 1;

        while let Some(c) = chars.next() {
            if c == '\n' {
                line += 1;
            }

            if c == escape && chars.peek() == Some(&QUOTE) {
                // Marker and quote both vanish
                chars.next();
                continue;
            }

            if c == QUOTE {
                let body = self.read_literal(&mut chars, &mut line)?;
                if !code.is_empty() {
                    spans.push(Span::Code(std::mem::take(&mut code)));
                }
                spans.push(Span::Literal(body));
                continue;
            }

            code.push(c);
        }

        if !code.is_empty() {
            spans.push(Span::Code(code));
        }

        Ok(spans)
    }

    /// Read a literal body up to and including its closing quote.
    fn read_literal(
        &self,
        chars: &mut Peekable<Chars<'_>>,
        line: &mut usize,
    ) -> Result<String, LiteralError> {
        let start = *line;
        let mut body = String::new();

        loop {
            let c = chars
                .next()
                .ok_or(LiteralError::Unterminated { line: start })?;
            if c == '\n' {
                *line += 1;
            }

            match self.mode {
                EscapeMode::Backslash => {
                    if c == DEFAULT_ESCAPE && chars.peek() == Some(&QUOTE) {
                        chars.next();
                        body.push(DEFAULT_ESCAPE);
                        body.push(QUOTE);
                    } else if c == QUOTE {
                        return Ok(body);
                    } else {
                        body.push(c);
                    }
                }
                EscapeMode::Custom(escape) => {
                    if c == escape {
                        match chars.peek() {
                            Some(&next) if next == escape => {
                                chars.next();
                                body.push(escape);
                            }
                            Some(&QUOTE) => {
                                chars.next();
                                return Ok(body);
                            }
                            _ => body.push(DEFAULT_ESCAPE),
                        }
                    } else if c == QUOTE {
                        return Ok(body);
                    } else if c == DEFAULT_ESCAPE {
                        body.push(DEFAULT_ESCAPE);
                        body.push(DEFAULT_ESCAPE);
                    } else {
                        body.push(c);
                    }
                }
            }
        }
    }

    /// Replace every literal in `source` with a placeholder.
    pub fn guard(&self, source: &str) -> Result<GuardedSource, LiteralError> {
        let spans = self.tokenize(source)?;
        let count = spans
            .iter()
            .filter(|span| matches!(span, Span::Literal(_)))
            .count();
        let sentinel = choose_sentinel(&spans, &self.reserved, count)?;

        let mut text = String::with_capacity(source.len());
        let mut literals = Vec::new();
        for span in spans {
            match span {
                Span::Code(code) => text.push_str(&code),
                Span::Literal(body) => {
                    literals.push(body);
                    text.push_str(&placeholder(&sentinel, literals.len()));
                }
            }
        }

        debug!(
            literals = literals.len(),
            sentinel = %sentinel,
            "guarded string literals"
        );

        Ok(GuardedSource {
            text,
            table: LiteralTable { sentinel, literals },
        })
    }
}

impl Default for LiteralGuard {
    fn default() -> Self {
        Self::new(DEFAULT_ESCAPE)
    }
}

fn placeholder(sentinel: &str, index: usize) -> String {
    format!("{QUOTE}{sentinel}{index}{sentinel}{QUOTE}")
}

/// Pick the first sentinel that occurs in no code span and whose placeholders,
/// indices included, contain no reserved marker.
fn choose_sentinel(
    spans: &[Span],
    reserved: &[String],
    count: usize,
) -> Result<String, LiteralError> {
    for base in SENTINEL_CANDIDATES {
        let mut candidate = String::new();
        for _ in 0..SENTINEL_REPEATS {
            candidate.push_str(base);

            let in_code = spans
                .iter()
                .any(|span| matches!(span, Span::Code(code) if code.contains(candidate.as_str())));
            let hits_reserved = reserved.iter().filter(|marker| !marker.is_empty()).any(|marker| {
                candidate.contains(marker.as_str())
                    || (1..=count).any(|index| placeholder(&candidate, index).contains(marker.as_str()))
            });

            if !in_code && !hits_reserved {
                return Ok(candidate);
            }
        }
    }

    Err(LiteralError::NoSentinel)
}

/// Ordered literal bodies captured by a guard run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralTable {
    sentinel: String,
    literals: Vec<String>,
}

impl LiteralTable {
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Body recorded for placeholder `index` (1-based).
    pub fn get(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.literals.get(i))
            .map(String::as_str)
    }

    /// Put every literal back in place of its placeholder.
    pub fn restore(&self, text: &str) -> Result<String, LiteralError> {
        if self.literals.is_empty() {
            return Ok(text.to_string());
        }

        let sentinel = regex::escape(&self.sentinel);
        let pattern = Regex::new(&format!("{QUOTE}{sentinel}([0-9]+){sentinel}{QUOTE}"))?;

        let mut restored = String::with_capacity(text.len());
        let mut last = 0;
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let body = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.get(index))
                .ok_or_else(|| LiteralError::UnknownPlaceholder {
                    placeholder: whole.as_str().to_string(),
                })?;

            restored.push_str(self.intact(&text[last..whole.start()])?);
            restored.push(QUOTE);
            restored.push_str(body);
            restored.push(QUOTE);
            last = whole.end();
        }
        restored.push_str(self.intact(&text[last..])?);

        Ok(restored)
    }

    /// Text between placeholders must not hold a stray sentinel.
    fn intact<'t>(&self, gap: &'t str) -> Result<&'t str, LiteralError> {
        if gap.contains(self.sentinel.as_str()) {
            return Err(LiteralError::BrokenPlaceholder {
                sentinel: self.sentinel.clone(),
            });
        }
        Ok(gap)
    }
}
