//! Expression rewriting
//!
//! Two independent passes applied to any expression the translator emits:
//!
//! 1. Operator canonicalization. Comparators and logical operators are lexed with
//!    logos, which always takes the longest match, so `<=`, `>=` and `!=` are never
//!    split into a single-character operator followed by `=`. Every operator is
//!    emitted with exactly one space on each side; `&` and `|` become `and` / `or`.
//!
//! 2. Call recognition. The expression is split on `/`. A segment whose first word
//!    is a registered function becomes `name(` followed by its remaining words
//!    joined with single spaces, and consumes the `/` in front of it. Any other
//!    segment is kept as written, `/` included.
//!
//! Calls are left open. The caller knows the syntactic context and closes them,
//! which is what [`RewrittenExpr::closed`] is for.

use crate::transpiler::registry::FunctionRegistry;
use logos::Logos;

/// Separator between call segments in an expression.
pub const CALL_SEPARATOR: char = '/';

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum OperatorToken {
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("!=")]
    NotEqual,
    #[token("=")]
    Equal,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("&")]
    And,
    #[token("|")]
    Or,
    // A lone `!` is not an operator on its own
    #[token("!")]
    Bang,
    #[regex(r"[ \t]+")]
    Space,
    #[regex(r"[^<>=!&| \t]+")]
    Text,
}

impl OperatorToken {
    fn canonical(self) -> Option<&'static str> {
        match self {
            OperatorToken::LessEqual => Some("<="),
            OperatorToken::GreaterEqual => Some(">="),
            OperatorToken::NotEqual => Some("!="),
            OperatorToken::Equal => Some("="),
            OperatorToken::Less => Some("<"),
            OperatorToken::Greater => Some(">"),
            OperatorToken::And => Some("and"),
            OperatorToken::Or => Some("or"),
            OperatorToken::Bang | OperatorToken::Space | OperatorToken::Text => None,
        }
    }
}

/// An expression after rewriting, with the number of calls it left open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenExpr {
    text: String,
    open_calls: usize,
}

impl RewrittenExpr {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls
    }

    /// The expression with every open call closed, trimmed.
    pub fn closed(&self) -> String {
        let mut closed = self.text.trim().to_string();
        closed.push_str(&")".repeat(self.open_calls));
        closed
    }
}

/// Canonicalize operators, then rewrite calls to registered functions.
pub fn rewrite_expression(expr: &str, registry: &FunctionRegistry) -> RewrittenExpr {
    rewrite_calls(&canonicalize_operators(expr), registry)
}

/// Normalize comparator and logical operators.
pub fn canonicalize_operators(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len() + 8);
    let mut after_operator = false;
    let mut lexer = OperatorToken::lexer(expr);

    while let Some(token) = lexer.next() {
        let slice = lexer.slice();
        match token {
            Ok(OperatorToken::Space) => {
                if !after_operator {
                    out.push_str(slice);
                }
            }
            Ok(op) => match op.canonical() {
                Some(canonical) => {
                    out.truncate(out.trim_end().len());
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(canonical);
                    after_operator = true;
                }
                None => {
                    if after_operator {
                        out.push(' ');
                        after_operator = false;
                    }
                    out.push_str(slice);
                }
            },
            Err(()) => {
                if after_operator {
                    out.push(' ');
                    after_operator = false;
                }
                out.push_str(slice);
            }
        }
    }

    out
}

/// Turn `/`-separated segments led by a registered name into open calls.
pub fn rewrite_calls(expr: &str, registry: &FunctionRegistry) -> RewrittenExpr {
    let mut text = String::with_capacity(expr.len() + 4);
    let mut open_calls = 0;

    for (i, segment) in expr.split(CALL_SEPARATOR).enumerate() {
        let mut words = segment.split_whitespace();
        match words.next() {
            Some(name) if registry.contains(name) => {
                if !text.is_empty() && !text.ends_with('(') && !text.ends_with(' ') {
                    text.push(' ');
                }
                text.push_str(name);
                text.push('(');
                text.push_str(&words.collect::<Vec<_>>().join(" "));
                open_calls += 1;
            }
            _ => {
                if i > 0 {
                    text.push(CALL_SEPARATOR);
                }
                text.push_str(segment);
            }
        }
    }

    RewrittenExpr { text, open_calls }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(names: &[&str]) -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        for name in names {
            registry.register(name);
        }
        registry
    }

    #[test]
    fn test_two_character_operators_survive() {
        assert_eq!(canonicalize_operators("a<=b"), "a <= b");
        assert_eq!(canonicalize_operators("a>=b"), "a >= b");
        assert_eq!(canonicalize_operators("a!=b"), "a != b");
    }

    #[test]
    fn test_single_character_operators() {
        assert_eq!(canonicalize_operators("a=b"), "a = b");
        assert_eq!(canonicalize_operators("a<b"), "a < b");
        assert_eq!(canonicalize_operators("a>b"), "a > b");
    }

    #[test]
    fn test_logical_operators_become_keywords() {
        assert_eq!(canonicalize_operators("a&b|c"), "a and b or c");
    }

    #[test]
    fn test_existing_spacing_is_collapsed_around_operators() {
        assert_eq!(canonicalize_operators("a   <=   b"), "a <= b");
        assert_eq!(canonicalize_operators("a >= b & c"), "a >= b and c");
    }

    #[test]
    fn test_non_operator_text_is_untouched() {
        assert_eq!(canonicalize_operators("a + b * 2"), "a + b * 2");
        assert_eq!(canonicalize_operators("!done"), "!done");
    }

    #[test]
    fn test_registered_call_is_opened() {
        let registry = registry_with(&["add"]);
        let rewritten = rewrite_calls("add 2 3", &registry);
        assert_eq!(rewritten.text(), "add(2 3");
        assert_eq!(rewritten.open_calls(), 1);
        assert_eq!(rewritten.closed(), "add(2 3)");
    }

    #[test]
    fn test_unregistered_call_passes_through() {
        let registry = registry_with(&["add"]);
        let rewritten = rewrite_calls("sub 2 3", &registry);
        assert_eq!(rewritten.closed(), "sub 2 3");
        assert_eq!(rewritten.open_calls(), 0);
    }

    #[test]
    fn test_nested_call_consumes_separator() {
        let registry = registry_with(&["add", "mul"]);
        let rewritten = rewrite_calls("add 1 /mul 2 3", &registry);
        assert_eq!(rewritten.closed(), "add(1 mul(2 3))");
    }

    #[test]
    fn test_division_is_kept_between_plain_segments() {
        let registry = registry_with(&["add"]);
        assert_eq!(rewrite_calls("x / y", &registry).closed(), "x / y");
        assert_eq!(rewrite_calls("add x/2", &registry).closed(), "add(x/2)");
    }

    #[test]
    fn test_leading_separator_before_call() {
        let registry = registry_with(&["f"]);
        assert_eq!(rewrite_calls("/f 1", &registry).closed(), "f(1)");
    }

    #[test]
    fn test_call_without_arguments() {
        let registry = registry_with(&["tick"]);
        assert_eq!(rewrite_calls("tick", &registry).closed(), "tick()");
    }

    #[test]
    fn test_full_rewrite() {
        let registry = registry_with(&["max"]);
        let rewritten = rewrite_expression("max a<=b", &registry);
        assert_eq!(rewritten.closed(), "max(a <= b)");
    }
}
