//! Crate-wide error type.
//!
//! Every fallible operation in this crate aborts the smallest enclosing
//! call (one generation, one checkpoint save) and propagates upward with
//! `?`. There are no retries and no partial results.

use std::path::PathBuf;

/// Errors produced by vocabulary handling, generation, and checkpointing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The vocabulary file could not be read at startup.
    #[error("failed to load vocabulary from {path:?}: {source}")]
    VocabularyLoad {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A token id has no corresponding vocabulary entry. This can happen
    /// when a sampled id points past a vocabulary shorter than the model's
    /// configured vocabulary size.
    #[error("token id {id} out of range for vocabulary of {len} entries")]
    OutOfRange {
        /// The offending id.
        id: usize,
        /// Number of entries in the vocabulary.
        len: usize,
    },

    /// A corpus file or directory could not be read while building the
    /// training dataset.
    #[error("failed to read corpus at {path:?}: {source}")]
    Dataset {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A failure inside a model invocation (malformed window, bad output
    /// shape, backend failure).
    #[error("model invocation failed: {0}")]
    Model(String),

    /// Checkpoint persistence or load failure.
    #[error("checkpoint I/O failed at {path:?}: {source}")]
    Checkpoint {
        /// Checkpoint directory or file involved.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Checkpoint payload could not be encoded or decoded.
    #[error("checkpoint serialization failed: {0}")]
    CheckpointEncoding(#[from] bincode::Error),

    /// The constrained sampler could not draw a token (empty score vector,
    /// degenerate weights).
    #[error("sampling failed: {0}")]
    Sampling(String),

    /// An invalid configuration value caught before any work starts.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
