//! Model capability traits.
//!
//! The generation engine has zero knowledge of the network that produces
//! next-token scores. It only requires a [`LanguageModel`]: something that
//! maps a fixed-length context window to one score row per position. This
//! keeps the engine unit-testable with stub models returning deterministic
//! scores, and keeps any real architecture behind a seam.

use crate::error::Result;

/// Output of one model invocation over a single context window.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// One score row of length `vocab_size` per window position.
    pub scores: Vec<Vec<f32>>,
    /// Auxiliary attention output emitted alongside the scores. The
    /// generation loop carries it but never consumes it.
    pub attention: Vec<f32>,
}

/// A next-token scoring capability over fixed-length integer windows.
pub trait LanguageModel {
    /// Scores a single context window.
    ///
    /// The window is one sequence of token ids of the model's context
    /// length; the result holds a score row for every position in it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Model`] on any invocation failure, such as a
    /// window whose length the model does not accept.
    fn predict(&self, window: &[usize]) -> Result<Prediction>;
}

/// A model that can additionally learn from supervised batches.
///
/// Each batch pairs input sequences with targets shifted one position
/// ahead, the usual next-token objective.
pub trait TrainableModel: LanguageModel {
    /// Updates the model from one batch of `(input, target)` sequences.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Model`] if the batch shapes are
    /// inconsistent.
    fn fit_batch(&mut self, inputs: &[Vec<usize>], targets: &[Vec<usize>]) -> Result<()>;
}
