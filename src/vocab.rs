//! Vocabulary index: a bidirectional mapping between token strings and
//! integer ids.
//!
//! The forward direction is an ordered list whose index *is* the id. The
//! reverse direction is built once by enumerating the forward list; when a
//! word appears twice, the later occurrence wins. Ids 0 and 1 are reserved
//! for padding and out-of-vocabulary words by convention of the tokenizer.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Reserved id used to right-pad context windows.
pub const PAD_ID: usize = 0;

/// Reserved id assigned to words not present in the vocabulary.
pub const OOV_ID: usize = 1;

/// An ordered list of distinct token strings plus its derived reverse index.
///
/// Built once before training and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
    indices: HashMap<String, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary from an ordered word list.
    ///
    /// The reverse index is populated in forward order, so duplicate words
    /// keep their last index (last-write-wins).
    pub fn new(words: Vec<String>) -> Self {
        let mut indices = HashMap::with_capacity(words.len());
        for (index, word) in words.iter().enumerate() {
            indices.insert(word.clone(), index);
        }
        Self { words, indices }
    }

    /// Loads a vocabulary from a line-delimited file: one token per line,
    /// line order defining the id space.
    ///
    /// Exactly one trailing line separator is stripped per line; blank
    /// lines are preserved as empty-string tokens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VocabularyLoad`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::VocabularyLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let mut lines: Vec<&str> = contents.split('\n').collect();
        // A final newline produces one empty trailing piece, not a token.
        if contents.ends_with('\n') {
            lines.pop();
        }
        let words = lines
            .into_iter()
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Ok(Self::new(words))
    }

    /// Writes the vocabulary as newline-joined tokens, order preserved,
    /// with one terminating separator so every line round-trips.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Checkpoint`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut contents = self.words.join("\n");
        contents.push('\n');
        fs::write(path, contents).map_err(|source| Error::Checkpoint {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the id of `word`, or [`OOV_ID`] if it is unknown.
    #[must_use]
    pub fn id_of(&self, word: &str) -> usize {
        self.indices.get(word).copied().unwrap_or(OOV_ID)
    }

    /// Returns the word stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `id` is past the end of the
    /// vocabulary.
    pub fn word_of(&self, id: usize) -> Result<&str> {
        self.words.get(id).map(String::as_str).ok_or(Error::OutOfRange {
            id,
            len: self.words.len(),
        })
    }

    /// Number of entries in the vocabulary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
