//! Pipeline driver
//!
//! [`Transpiler`] owns everything a run needs: the options, the literal table
//! produced by the guard and the function registry filled during translation.
//! Both tables are created fresh for every call to [`Transpiler::transpile`], so
//! one `Transpiler` can process any number of sources without state leaking
//! between them.

use crate::transpiler::literals::{LiteralError, LiteralGuard};
use crate::transpiler::pipeline::config::TranspileOptions;
use crate::transpiler::pipeline::mapper::{apply_mapper, Stage, TextMapper, TransformationError};
use crate::transpiler::pipeline::mappers::{
    BraceLayoutMapper, NormalizeLinesMapper, ReflowMapper, RewriteSigilsMapper,
    SplitBracesMapper, StripCommentsMapper, TranslateLinesMapper,
};
use crate::transpiler::registry::FunctionRegistry;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that abort a transpile run
#[derive(Debug, Error)]
pub enum TranspileError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        source: TransformationError,
    },
}

impl TranspileError {
    fn at(stage: Stage, error: impl Into<TransformationError>) -> Self {
        TranspileError::Stage {
            stage,
            source: error.into(),
        }
    }

    /// The stage that failed, if the error came from one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            TranspileError::InvalidOptions(_) => None,
            TranspileError::Stage { stage, .. } => Some(*stage),
        }
    }
}

/// Buffer contents right after a stage ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSnapshot {
    pub stage: Stage,
    pub text: String,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspileOutput {
    /// Generated htvm code, trimmed.
    pub code: String,
    /// Functions defined in the source, in definition order.
    pub functions: Vec<String>,
    /// Number of string literals guarded and restored.
    pub literal_count: usize,
    /// Per-stage snapshots; empty unless recording was enabled.
    pub stages: Vec<StageSnapshot>,
}

/// Runs the full stage sequence over a source text.
#[derive(Debug, Clone, Default)]
pub struct Transpiler {
    options: TranspileOptions,
    record_stages: bool,
}

impl Transpiler {
    pub fn new(options: TranspileOptions) -> Self {
        Self {
            options,
            record_stages: false,
        }
    }

    /// Keep a snapshot of the buffer after every stage.
    pub fn record_stages(mut self, record: bool) -> Self {
        self.record_stages = record;
        self
    }

    pub fn options(&self) -> &TranspileOptions {
        &self.options
    }

    /// Transpile one h_sharp source into htvm.
    pub fn transpile(&self, source: &str) -> Result<TranspileOutput, TranspileError> {
        self.options
            .validate()
            .map_err(TranspileError::InvalidOptions)?;

        let mut snapshots = Snapshots::new(self.record_stages);
        let mut registry = FunctionRegistry::new();

        let text = snapshots.run(&mut NormalizeLinesMapper::new(), source.to_string())?;

        let guard = LiteralGuard::new(self.options.escape_char)
            .reserve(self.options.comment_marker.as_str())
            .reserve(self.options.open_brace.as_str())
            .reserve(self.options.close_brace.as_str());
        let guarded = guard
            .guard(&text)
            .map_err(|e| TranspileError::at(Stage::GuardLiterals, e))?;
        let table = guarded.table;
        let text = snapshots.record(Stage::GuardLiterals, guarded.text);

        let text = snapshots.run(
            &mut StripCommentsMapper::new(self.options.comment_marker.as_str()),
            text,
        )?;
        let text = snapshots.run(
            &mut SplitBracesMapper::new(
                self.options.open_brace.as_str(),
                self.options.close_brace.as_str(),
            ),
            text,
        )?;
        let text = snapshots.run(&mut RewriteSigilsMapper::new(), text)?;
        let text = snapshots.run(&mut BraceLayoutMapper::new(), text)?;
        let text = snapshots.run(&mut TranslateLinesMapper::new(&mut registry), text)?;
        let text = snapshots.run(&mut ReflowMapper::new(self.options.brace_style), text)?;

        let restored = table
            .restore(&text)
            .map_err(|e: LiteralError| TranspileError::at(Stage::RestoreLiterals, e))?;
        let restored = snapshots.record(Stage::RestoreLiterals, restored);

        Ok(TranspileOutput {
            code: restored.trim().to_string(),
            functions: registry.names().to_vec(),
            literal_count: table.len(),
            stages: snapshots.into_inner(),
        })
    }
}

/// Transpile `source` with default options, returning only the code.
pub fn transpile(source: &str) -> Result<String, TranspileError> {
    Transpiler::default()
        .transpile(source)
        .map(|output| output.code)
}

struct Snapshots {
    enabled: bool,
    taken: Vec<StageSnapshot>,
}

impl Snapshots {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            taken: Vec::new(),
        }
    }

    fn run(&mut self, mapper: &mut dyn TextMapper, text: String) -> Result<String, TranspileError> {
        let text = apply_mapper(mapper, text)
            .map_err(|(stage, error)| TranspileError::Stage { stage, source: error })?;
        Ok(self.record(mapper.stage(), text))
    }

    fn record(&mut self, stage: Stage, text: String) -> String {
        debug!(stage = %stage, bytes = text.len(), "stage finished");
        trace!(stage = %stage, text = %text, "stage output");
        if self.enabled {
            self.taken.push(StageSnapshot {
                stage,
                text: text.clone(),
            });
        }
        text
    }

    fn into_inner(self) -> Vec<StageSnapshot> {
        self.taken
    }
}
