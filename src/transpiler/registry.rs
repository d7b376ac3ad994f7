//! Function-name registry
//!
//! Names are registered as function definition lines are translated and consulted
//! by the expression rewriter on every later line. The registry only grows during
//! a run; a call to a function defined further down the file is therefore not
//! recognized (single forward pass, define-before-use).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Set of function names known at the current point of a run.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    names: HashSet<String>,
    order: Vec<String>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`. Returns false if it was already known or is empty.
    pub fn register(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.names.contains(name) {
            return false;
        }
        if !IDENTIFIER.is_match(name) {
            warn!(name, "function name is not a plain identifier");
        }
        self.names.insert(name.to_string());
        self.order.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }
}
