//src/errors.rs

use std::path::PathBuf;
use thiserror::Error;

use crate::normalize::ToolKind;

/// Result type alias for scoring operations
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Everything that can stop a scoring run.
///
/// A missing or empty result file is deliberately absent here: it means the
/// tool aligned nothing and is scored as all-unaligned.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// Read identifier does not follow the simulated-read naming grammar
    #[error("Cannot decode read name '{read_name}': {reason}")]
    Decode {
        read_name: String,
        reason: String,
    },

    /// Result file does not have the columns its tool adapter expects
    #[error("Unexpected {tool} result schema in '{source_name}': {reason}")]
    SchemaMismatch {
        tool: ToolKind,
        source_name: String,
        reason: String,
    },

    /// Simulated reads file is not well-formed FASTQ
    #[error("Invalid FASTQ file '{}': {reason}", .path.display())]
    FastqFormat {
        path: PathBuf,
        reason: String,
    },

    /// Manifest table is missing required columns or values
    #[error("Invalid manifest '{}': {reason}", .path.display())]
    Manifest {
        path: PathBuf,
        reason: String,
    },

    /// Reads and decoded ground truths of a dataset are not parallel
    #[error("{reads} simulated reads but {truths} ground-truth records")]
    TruthCountMismatch {
        reads: usize,
        truths: usize,
    },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wraps a failure with the dataset (and tool, if any) it happened in
    #[error("Dataset '{dataset}'{}: {source}", .tool.as_ref().map(|t| format!(" ({t})")).unwrap_or_default())]
    Dataset {
        dataset: String,
        tool: Option<ToolKind>,
        #[source]
        source: Box<ScoreError>,
    },
}

impl ScoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScoreError::Io { path: path.into(), source }
    }

    pub(crate) fn in_dataset(self, dataset: &str, tool: Option<ToolKind>) -> Self {
        ScoreError::Dataset {
            dataset: dataset.to_string(),
            tool,
            source: Box::new(self),
        }
    }
}
