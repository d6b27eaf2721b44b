//! Whitespace word tokenizer and detokenizer.
//!
//! Text is split on whitespace and mapped through the vocabulary; unknown
//! words become the reserved out-of-vocabulary id. Lower-casing is the
//! caller's responsibility and happens once at the CLI boundary, not here.

use crate::error::Result;
use crate::vocab::Vocabulary;

/// Converts free text to and from integer token sequences.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    vocab: Vocabulary,
}

impl WordTokenizer {
    /// Wraps a vocabulary in a tokenizer.
    #[must_use]
    pub fn new(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    /// The underlying vocabulary.
    #[must_use]
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Splits `text` on whitespace and maps each word to its id.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<usize> {
        text.split_whitespace().map(|word| self.vocab.id_of(word)).collect()
    }

    /// Maps each id back to its word and joins with single spaces.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfRange`] if any id has no vocabulary
    /// entry, which can happen when the model's configured vocabulary size
    /// exceeds the loaded vocabulary.
    pub fn detokenize(&self, ids: &[usize]) -> Result<String> {
        let words = ids
            .iter()
            .map(|&id| self.vocab.word_of(id))
            .collect::<Result<Vec<_>>>()?;
        Ok(words.join(" "))
    }
}
