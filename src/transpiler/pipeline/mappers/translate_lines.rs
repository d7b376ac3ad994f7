//! Line translation
//!
//! Classifies every line with [`classify_line`] and emits the matching htvm
//! construct. Expressions go through [`rewrite_expression`] and every call the
//! rewrite leaves open is closed at the end of its construct.
//!
//! Function definitions register their name before the line is emitted, so
//! recursive calls inside the body and calls further down are recognized. Calls
//! that appear above the definition are not.

use crate::transpiler::classify::{classify_line, LineKind};
use crate::transpiler::expression::rewrite_expression;
use crate::transpiler::pipeline::mapper::{Stage, TextMapper, TransformationError};
use crate::transpiler::registry::FunctionRegistry;
use tracing::trace;

pub struct TranslateLinesMapper<'r> {
    registry: &'r mut FunctionRegistry,
}

impl<'r> TranslateLinesMapper<'r> {
    pub fn new(registry: &'r mut FunctionRegistry) -> Self {
        Self { registry }
    }

    /// Translate a single line.
    pub fn translate_line(&mut self, line: &str) -> String {
        let kind = classify_line(line);
        trace!(line, kind = ?kind, "classified line");

        match kind {
            LineKind::Loop { condition } => {
                // A `{` with nothing before it is an unconditional loop
                let condition = self.expr(condition);
                if condition.is_empty() {
                    "Loop {".to_string()
                } else {
                    format!("Loop, {condition} {{")
                }
            }
            LineKind::Return { value } => {
                let value = self.expr(value);
                if value.is_empty() {
                    "return".to_string()
                } else {
                    format!("return {value}")
                }
            }
            LineKind::Print { args } => format!("print({})", self.expr(args)),
            LineKind::BlockEnd => "}".to_string(),
            LineKind::ElseIf { condition } => format!("else if ({}) {{", self.expr(condition)),
            LineKind::If { condition } => format!("if ({}) {{", self.expr(condition)),
            LineKind::Else => "else {".to_string(),
            LineKind::FunctionDef { name, params } => {
                self.registry.register(name);
                let params = params
                    .iter()
                    .map(|param| param.replacen(':', " := ", 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("func {name}({params}) {{")
            }
            LineKind::Assignment { target, value } => {
                format!("{target} := {}", self.expr(value))
            }
            LineKind::Expression { expr } => self.expr(expr),
            LineKind::Passthrough(line) => line.to_string(),
        }
    }

    fn expr(&self, expr: &str) -> String {
        rewrite_expression(expr, self.registry).closed()
    }
}

impl TextMapper for TranslateLinesMapper<'_> {
    fn stage(&self) -> Stage {
        Stage::Translate
    }

    fn map_text(&mut self, text: String) -> Result<String, TransformationError> {
        let translated = text
            .lines()
            .map(|line| self.translate_line(line))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(text: &str) -> (String, FunctionRegistry) {
        let mut registry = FunctionRegistry::new();
        let out = TranslateLinesMapper::new(&mut registry)
            .map_text(text.to_string())
            .unwrap();
        (out, registry)
    }

    #[test]
    fn test_function_definition_and_call() {
        let (out, registry) = translate("#add a b\n< a + b\n.\n^add 2 3");
        assert_eq!(out, "func add(a, b) {\nreturn a + b\n}\nprint(add(2 3))");
        assert_eq!(registry.names(), &["add"]);
    }

    #[test]
    fn test_default_parameter() {
        let (out, _) = translate("#greet name:1");
        assert_eq!(out, "func greet(name := 1) {");
    }

    #[test]
    fn test_function_without_parameters() {
        let (out, _) = translate("#tick\n.\n/tick");
        assert_eq!(out, "func tick() {\n}\ntick()");
    }

    #[test]
    fn test_assignment() {
        let (out, _) = translate("x: 5\ny : a>=b&c");
        assert_eq!(out, "x := 5\ny := a >= b and c");
    }

    #[test]
    fn test_conditionals() {
        let (out, _) = translate("---?x > 1\n-???x < 0\n--??");
        assert_eq!(out, "if (x > 1) {\nelse if (x < 0) {\nelse {");
    }

    #[test]
    fn test_loop() {
        let (out, _) = translate("x < 3 {");
        assert_eq!(out, "Loop, x < 3 {");
    }

    #[test]
    fn test_loop_without_condition() {
        let (out, _) = translate("{\n^x\n}");
        assert_eq!(out, "Loop {\nprint(x)\n}");
    }

    #[test]
    fn test_empty_return() {
        let (out, _) = translate("<");
        assert_eq!(out, "return");
    }

    #[test]
    fn test_bare_expression_and_passthrough() {
        let (out, _) = translate("/a >= b & c\nsomething else\n}");
        assert_eq!(out, "a >= b and c\nsomething else\n}");
    }

    #[test]
    fn test_call_before_definition_is_not_rewritten() {
        let (out, _) = translate("^g 1\n#g x\n<x\n.\n^g 2");
        assert_eq!(out, "print(g 1)\nfunc g(x) {\nreturn x\n}\nprint(g(2))");
    }

    #[test]
    fn test_recursive_call_in_body() {
        let (out, _) = translate("#fib n\n< fib n - 1\n.");
        assert_eq!(out, "func fib(n) {\nreturn fib(n - 1)\n}");
    }
}
