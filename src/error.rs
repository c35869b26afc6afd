use std::path::PathBuf;

use thiserror::Error;

/// Main error type for quizdex operations
#[derive(Error, Debug)]
pub enum QuizdexError {
    /// Malformed clue or corpus input
    #[error("Format error in {}:{line}: {message}", .source_path.display())]
    Format {
        source_path: PathBuf,
        line: usize,
        message: String,
    },

    /// Document rejected at indexing time
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the index's current lifecycle state
    #[error("Index state error: {0}")]
    IndexState(String),

    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for quizdex operations
pub type Result<T> = std::result::Result<T, QuizdexError>;

impl QuizdexError {
    /// Build a format error pointing at a 1-based line of an input file
    pub fn format(source_path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        QuizdexError::Format {
            source_path: source_path.into(),
            line,
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the index itself
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            QuizdexError::Format { .. } | QuizdexError::Validation(_)
        )
    }
}
