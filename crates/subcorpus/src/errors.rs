//! # Error Types

use std::path::PathBuf;

/// Errors from subcorpus operations.
#[derive(Debug, thiserror::Error)]
pub enum SubcorpusError {
    /// Vocab size is below the minimum (256, the u8 space).
    #[error("vocab size ({size}) must be >= 256")]
    VocabSizeTooSmall {
        /// The vocab size that was too small.
        size: usize,
    },

    /// Vocab size exceeds the capacity of the target token type.
    #[error("vocab size ({size}) exceeds token type capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },

    /// Vocabulary data is inconsistent.
    #[error("{0}")]
    VocabConflict(String),

    /// Special token table is inconsistent, or collides with the vocab.
    #[error("special token conflict: {0}")]
    SpecialTokenConflict(String),

    /// Training was asked to learn from no text at all.
    #[error("training text is empty")]
    EmptyTrainingText,

    /// A token with no vocab or special entry.
    #[error("unknown token: {0}")]
    UnknownToken(u64),

    /// No ancestor of the start directory looks like a project root.
    #[error("no project root found above {start:?}")]
    ProjectRootNotFound {
        /// Where the upward search started.
        start: PathBuf,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parse error (model files, integers, etc.)
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration could not be decoded.
    #[error(transparent)]
    Config(#[from] serde_json::Error),

    /// Error from an external component.
    #[error("{0}")]
    External(String),
}

/// Result type for subcorpus operations.
pub type SCResult<T> = Result<T, SubcorpusError>;

/// Terminal failures of the tokenizer lifecycle.
///
/// Each variant names the stage which failed; none of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Training is required, but the corpus file is absent.
    #[error("corpus file not found: {path:?}")]
    MissingInputFile {
        /// The expected corpus path.
        path: PathBuf,
    },

    /// An existing model artifact could not be loaded.
    #[error("failed to load tokenizer model {path:?}: {source}")]
    LoadFailed {
        /// The model artifact path.
        path: PathBuf,
        /// The underlying cause.
        source: SubcorpusError,
    },

    /// Reading the corpus, or training on it, failed.
    #[error("failed to train tokenizer: {source}")]
    TrainingFailed {
        /// The underlying cause.
        source: SubcorpusError,
    },

    /// The reserved special tokens could not be attached.
    #[error("failed to assign special tokens: {source}")]
    SpecialTokensFailed {
        /// The underlying cause.
        source: SubcorpusError,
    },

    /// Writing the trained artifacts failed.
    #[error("failed to save tokenizer to {prefix:?}: {source}")]
    PersistenceFailed {
        /// The artifact file prefix.
        prefix: PathBuf,
        /// The underlying cause.
        source: SubcorpusError,
    },
}
