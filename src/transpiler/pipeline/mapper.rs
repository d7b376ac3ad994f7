//! Text mapper trait
//!
//! Every stage of the pipeline is a whole-buffer transform: it receives the full
//! text produced by the previous stage and returns a new full text. The
//! `TextMapper` trait is that contract; [`apply_mapper`] runs one mapper and tags
//! any failure with the stage it came from.
//!
//! # Examples
//!
//! ```ignore
//! struct Upper;
//!
//! impl TextMapper for Upper {
//!     fn stage(&self) -> Stage {
//!         Stage::Normalize
//!     }
//!
//!     fn map_text(&mut self, text: String) -> Result<String, TransformationError> {
//!         Ok(text.to_uppercase())
//!     }
//! }
//! ```

use crate::transpiler::literals::LiteralError;
use crate::transpiler::pipeline::mappers::reflow::ReflowError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Names of the pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Normalize,
    GuardLiterals,
    StripComments,
    SplitBraces,
    RewriteSigils,
    Layout,
    Translate,
    Reflow,
    RestoreLiterals,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::Normalize,
        Stage::GuardLiterals,
        Stage::StripComments,
        Stage::SplitBraces,
        Stage::RewriteSigils,
        Stage::Layout,
        Stage::Translate,
        Stage::Reflow,
        Stage::RestoreLiterals,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Normalize => "normalize",
            Stage::GuardLiterals => "guard-literals",
            Stage::StripComments => "strip-comments",
            Stage::SplitBraces => "split-braces",
            Stage::RewriteSigils => "rewrite-sigils",
            Stage::Layout => "layout",
            Stage::Translate => "translate",
            Stage::Reflow => "reflow",
            Stage::RestoreLiterals => "restore-literals",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors a stage can raise
#[derive(Debug, Error)]
pub enum TransformationError {
    #[error(transparent)]
    Literal(#[from] LiteralError),

    #[error(transparent)]
    Reflow(#[from] ReflowError),
}

/// A single whole-buffer stage.
pub trait TextMapper {
    /// The stage this mapper implements.
    fn stage(&self) -> Stage;

    /// Transform the full text.
    fn map_text(&mut self, text: String) -> Result<String, TransformationError>;
}

/// Run `mapper` over `text`, returning the stage alongside any error.
pub fn apply_mapper(
    mapper: &mut dyn TextMapper,
    text: String,
) -> Result<String, (Stage, TransformationError)> {
    let stage = mapper.stage();
    mapper.map_text(text).map_err(|e| (stage, e))
}
