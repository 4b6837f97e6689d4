use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for one minification run. There is no partial-success
/// mode: every variant aborts the run before any output is written.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load C grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("failed to parse input")]
    Parse,
    #[error("overlapping edits at byte {offset}")]
    EditConflict { offset: usize },
    #[error("unterminated comment")]
    UnterminatedComment,
}

impl Error {
    /// Process exit status for this failure. Configuration problems
    /// (unusable input or output target) exit 1; everything discovered
    /// mid-pipeline exits 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Input { .. } | Error::Output { .. } => 1,
            Error::Language(_)
            | Error::Parse
            | Error::EditConflict { .. }
            | Error::UnterminatedComment => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
