//! Stage pipeline for h_sharp transpilation
//!
//! This module provides:
//! - The driver (`Transpiler`) that owns per-run state and runs every stage in order
//! - The stage interface (`TextMapper`) and the stage names (`Stage`)
//! - The concrete mappers, one per whole-buffer transform
//! - Options controlling escapes, comments, brace characters and brace style
//!
//! Stage order (fixed, no backtracking):
//!
//! | # | Stage | Mapper |
//! |---|---|---|
//! | 1 | normalize | `NormalizeLinesMapper` |
//! | 2 | guard-literals | `LiteralGuard` (driver) |
//! | 3 | strip-comments | `StripCommentsMapper` |
//! | 4 | split-braces | `SplitBracesMapper` |
//! | 5 | rewrite-sigils | `RewriteSigilsMapper` |
//! | 6 | layout | `BraceLayoutMapper` |
//! | 7 | translate | `TranslateLinesMapper` |
//! | 8 | reflow | `ReflowMapper` |
//! | 9 | restore-literals | `LiteralTable::restore` (driver) |

pub mod config;
pub mod executor;
pub mod mapper;
pub mod mappers;

pub use config::{BraceStyle, TranspileOptions};
pub use executor::{transpile, StageSnapshot, TranspileError, TranspileOutput, Transpiler};
pub use mapper::{Stage, TextMapper, TransformationError};

pub use mappers::{
    BraceLayoutMapper, NormalizeLinesMapper, ReflowMapper, RewriteSigilsMapper,
    SplitBracesMapper, StripCommentsMapper, TranslateLinesMapper,
};
