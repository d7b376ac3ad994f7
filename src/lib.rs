//! # h_sharp
//!
//! A source-to-source transpiler from the terse, sigil-based h_sharp notation
//! into the curly-brace htvm intermediate language.
//!
//! The heavy lifting lives in [`transpiler`]; see [`transpiler::pipeline`] for
//! the stage ordering and [`transpiler::pipeline::Transpiler`] for the entry point.

pub mod transpiler;

pub use transpiler::pipeline::{
    transpile, BraceStyle, TranspileError, TranspileOptions, TranspileOutput, Transpiler,
};
