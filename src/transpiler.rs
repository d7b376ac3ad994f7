//! Main module for h_sharp transpilation
//!
//! The transpiler is a strictly sequential chain of whole-buffer text transforms.
//! Nothing here builds a token tree or an AST: every stage consumes the full text
//! produced by the previous one and hands a new full text to the next.
//!
//! Structure:
//!     literals   - string literal guard and restorer (runs first and last)
//!     pipeline   - the stage driver and the individual text mappers
//!     classify   - per-line classification into `LineKind`s
//!     expression - operator canonicalization and call rewriting
//!     registry   - function names seen so far during a run
//!     files      - reading sources, deriving output paths, writing results

pub mod classify;
pub mod expression;
pub mod files;
pub mod literals;
pub mod pipeline;
pub mod registry;
