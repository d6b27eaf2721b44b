//! A count-based bigram language model.
//!
//! This is the crate's stand-in for a real network behind the
//! [`LanguageModel`] seam: it tallies which token follows which during
//! training and scores candidates by log successor counts. Even this
//! simple statistic produces usable sample text, and it keeps the train
//! and generate commands runnable end to end with no gradient machinery.

use crate::checkpoint::{self, Checkpoint};
use crate::error::{Error, Result};
use crate::model::{LanguageModel, Prediction, TrainableModel};
use crate::vocab::PAD_ID;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Word-level bigram model over a fixed vocabulary.
///
/// `counts[t]` maps each observed successor of token `t` to its frequency.
/// Score rows are `ln(1 + count)`, so unseen successors score 0 and the
/// sampler's softmax turns the rest into a proper distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigramModel {
    vocab_size: usize,
    counts: Vec<HashMap<usize, u32>>,
}

impl BigramModel {
    /// Creates an untrained model over `vocab_size` token ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `vocab_size` is below the two reserved
    /// ids.
    pub fn new(vocab_size: usize) -> Result<Self> {
        if vocab_size < 2 {
            return Err(Error::Config(
                "vocabulary size must cover the two reserved ids".into(),
            ));
        }
        Ok(Self {
            vocab_size,
            counts: vec![HashMap::new(); vocab_size],
        })
    }

    /// Number of token ids this model scores.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Total number of observed bigram occurrences.
    #[must_use]
    pub fn observations(&self) -> u64 {
        self.counts
            .iter()
            .flat_map(HashMap::values)
            .map(|&c| u64::from(c))
            .sum()
    }

    fn check_id(&self, id: usize) -> Result<()> {
        if id >= self.vocab_size {
            return Err(Error::Model(format!(
                "token id {id} outside model vocabulary of {}",
                self.vocab_size
            )));
        }
        Ok(())
    }
}

impl LanguageModel for BigramModel {
    fn predict(&self, window: &[usize]) -> Result<Prediction> {
        let mut scores = Vec::with_capacity(window.len());
        for &token in window {
            self.check_id(token)?;
            let mut row = vec![0.0f32; self.vocab_size];
            for (&next, &count) in &self.counts[token] {
                row[next] = (1.0 + count as f32).ln();
            }
            scores.push(row);
        }
        Ok(Prediction { scores, attention: Vec::new() })
    }
}

impl TrainableModel for BigramModel {
    fn fit_batch(&mut self, inputs: &[Vec<usize>], targets: &[Vec<usize>]) -> Result<()> {
        if inputs.len() != targets.len() {
            return Err(Error::Model(format!(
                "batch has {} inputs but {} targets",
                inputs.len(),
                targets.len()
            )));
        }
        for (input, target) in inputs.iter().zip(targets) {
            if input.len() != target.len() {
                return Err(Error::Model(
                    "input and target sequences differ in length".into(),
                ));
            }
            for (&token, &next) in input.iter().zip(target) {
                self.check_id(token)?;
                self.check_id(next)?;
                // Padding carries no signal in either slot.
                if token == PAD_ID || next == PAD_ID {
                    continue;
                }
                *self.counts[token].entry(next).or_insert(0) += 1;
            }
        }
        Ok(())
    }
}

impl Checkpoint for BigramModel {
    fn save(&self, dir: &Path) -> Result<()> {
        checkpoint::save_state(self, dir)
    }

    fn load(dir: &Path) -> Result<Self> {
        checkpoint::load_state(dir)
    }
}
