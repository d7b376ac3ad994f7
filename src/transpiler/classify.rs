//! Line Classification
//!
//! Every line reaching the translator is tagged with exactly one [`LineKind`].
//! Classification is pure: it looks at one trimmed line and nothing else.
//!
//! Rules are tried in this order and the first match wins:
//! 1. Line contains `{` -> Loop
//! 2. Starts with `<` -> Return
//! 3. Starts with `^` -> Print
//! 4. Is exactly `.` -> BlockEnd
//! 5. Starts with the else-if marker -> ElseIf
//! 6. Starts with the if marker -> If
//! 7. Starts with the else marker -> Else
//! 8. Starts with `#` -> FunctionDef
//! 9. Contains `:` -> Assignment
//! 10. Starts with `/` -> Expression
//! 11. Anything else -> Passthrough

/// Marker the sigil rewriter puts in front of an `???` condition.
pub const ELSE_IF_MARKER: &str = "-???";
/// Marker the sigil rewriter puts in front of a `?` condition.
pub const IF_MARKER: &str = "---?";
/// Marker the sigil rewriter emits for `??`.
pub const ELSE_MARKER: &str = "--??";
/// A line holding only this closes the innermost block.
pub const BLOCK_END: &str = ".";

/// The shape of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `condition` is empty when `{` opens the line.
    Loop { condition: &'a str },
    Return { value: &'a str },
    Print { args: &'a str },
    BlockEnd,
    ElseIf { condition: &'a str },
    If { condition: &'a str },
    Else,
    FunctionDef { name: &'a str, params: Vec<&'a str> },
    Assignment { target: &'a str, value: &'a str },
    Expression { expr: &'a str },
    Passthrough(&'a str),
}

/// Determine the kind of a line.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim();

    if line.contains('{') {
        let condition = line.split('{').next().unwrap_or_default().trim();
        return LineKind::Loop { condition };
    }
    if let Some(value) = line.strip_prefix('<') {
        return LineKind::Return { value };
    }
    if let Some(args) = line.strip_prefix('^') {
        return LineKind::Print { args };
    }
    if line == BLOCK_END {
        return LineKind::BlockEnd;
    }
    if let Some(condition) = line.strip_prefix(ELSE_IF_MARKER) {
        return LineKind::ElseIf { condition };
    }
    if let Some(condition) = line.strip_prefix(IF_MARKER) {
        return LineKind::If { condition };
    }
    if line.starts_with(ELSE_MARKER) {
        return LineKind::Else;
    }
    if let Some(signature) = line.strip_prefix('#') {
        let mut words = signature.split_whitespace();
        let name = words.next().unwrap_or_default();
        return LineKind::FunctionDef {
            name,
            params: words.collect(),
        };
    }
    if let Some((target, value)) = line.split_once(':') {
        return LineKind::Assignment {
            target: target.trim(),
            value,
        };
    }
    if let Some(expr) = line.strip_prefix('/') {
        return LineKind::Expression { expr };
    }

    LineKind::Passthrough(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_loop() {
        assert_eq!(
            classify_line("x < 3 {"),
            LineKind::Loop { condition: "x < 3" }
        );
    }

    #[test]
    fn test_classify_bare_loop() {
        assert_eq!(classify_line("{"), LineKind::Loop { condition: "" });
    }

    #[test]
    fn test_loop_wins_over_every_other_rule() {
        assert!(matches!(classify_line("<x {"), LineKind::Loop { .. }));
        assert!(matches!(classify_line("#f {"), LineKind::Loop { .. }));
        assert!(matches!(classify_line("a: b {"), LineKind::Loop { .. }));
    }

    #[test]
    fn test_classify_return_and_print() {
        assert_eq!(classify_line("< a + b"), LineKind::Return { value: " a + b" });
        assert_eq!(classify_line("^add 2 3"), LineKind::Print { args: "add 2 3" });
    }

    #[test]
    fn test_classify_block_end() {
        assert_eq!(classify_line("  .  "), LineKind::BlockEnd);
        assert!(matches!(classify_line(".x"), LineKind::Passthrough(_)));
    }

    #[test]
    fn test_classify_conditionals() {
        assert_eq!(
            classify_line("-???x < 0"),
            LineKind::ElseIf { condition: "x < 0" }
        );
        assert_eq!(
            classify_line("---?x > 1"),
            LineKind::If { condition: "x > 1" }
        );
        assert_eq!(classify_line("--??"), LineKind::Else);
    }

    #[test]
    fn test_classify_function_def() {
        assert_eq!(
            classify_line("#add a b:1"),
            LineKind::FunctionDef {
                name: "add",
                params: vec!["a", "b:1"]
            }
        );
        assert_eq!(
            classify_line("#tick"),
            LineKind::FunctionDef {
                name: "tick",
                params: vec![]
            }
        );
    }

    #[test]
    fn test_function_def_wins_over_assignment() {
        assert!(matches!(
            classify_line("#f a:1"),
            LineKind::FunctionDef { .. }
        ));
    }

    #[test]
    fn test_classify_assignment_splits_at_first_colon() {
        assert_eq!(
            classify_line("x : a:b"),
            LineKind::Assignment {
                target: "x",
                value: " a:b"
            }
        );
    }

    #[test]
    fn test_classify_expression_and_passthrough() {
        assert_eq!(classify_line("/f 1"), LineKind::Expression { expr: "f 1" });
        assert_eq!(classify_line("}"), LineKind::Passthrough("}"));
        assert_eq!(classify_line("  plain words "), LineKind::Passthrough("plain words"));
    }
}
