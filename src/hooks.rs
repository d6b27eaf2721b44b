//! Periodic training-time side effects.
//!
//! Hooks are plain values holding their own state, invoked by the fit loop
//! at batch and epoch boundaries through a two-method capability trait.
//! Both hooks here run on the single training thread, so a save or a
//! sample emission always completes before the loop continues and no two
//! side effects ever overlap.

use crate::checkpoint::Checkpoint;
use crate::error::{Error, Result};
use crate::generate::TextGenerator;
use crate::model::LanguageModel;
use rand::thread_rng;
use std::path::{Path, PathBuf};

/// Boundary-event observer invoked by the fit loop.
///
/// `batch` and `epoch` are zero-based indices; hooks that fire "every N"
/// test `(index + 1) % N`.
pub trait TrainingHook<M> {
    /// Called after each training batch of the current epoch.
    ///
    /// # Errors
    ///
    /// A returned error aborts training.
    fn on_batch_end(&mut self, batch: usize, model: &M) -> Result<()> {
        let _ = (batch, model);
        Ok(())
    }

    /// Called after each epoch.
    ///
    /// # Errors
    ///
    /// A returned error aborts training.
    fn on_epoch_end(&mut self, epoch: usize, model: &M) -> Result<()> {
        let _ = (epoch, model);
        Ok(())
    }
}

/// Persists the model on a batch cadence during the first epoch and on an
/// epoch cadence thereafter.
///
/// Early-batch saves exist to demonstrate training progress before the
/// first epoch completes; once an epoch boundary has been crossed they
/// stop for good.
#[derive(Debug)]
pub struct CheckpointHook {
    checkpoints_dir: PathBuf,
    save_early_batches: bool,
    batch_interval: usize,
    epoch_interval: usize,
    hit_first_epoch: bool,
}

impl CheckpointHook {
    /// Creates a hook saving under `checkpoints_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either interval is zero.
    pub fn new(
        checkpoints_dir: &Path,
        save_early_batches: bool,
        batch_interval: usize,
        epoch_interval: usize,
    ) -> Result<Self> {
        if batch_interval == 0 || epoch_interval == 0 {
            return Err(Error::Config("checkpoint intervals must be at least 1".into()));
        }
        Ok(Self {
            checkpoints_dir: checkpoints_dir.to_path_buf(),
            save_early_batches,
            batch_interval,
            epoch_interval,
            hit_first_epoch: false,
        })
    }
}

impl<M: Checkpoint> TrainingHook<M> for CheckpointHook {
    fn on_batch_end(&mut self, batch: usize, model: &M) -> Result<()> {
        if !self.save_early_batches || self.hit_first_epoch {
            return Ok(());
        }
        if (batch + 1) % self.batch_interval != 0 {
            return Ok(());
        }
        model.save(&self.checkpoints_dir.join(format!("ckpt-batch-{}", batch + 1)))
    }

    fn on_epoch_end(&mut self, epoch: usize, model: &M) -> Result<()> {
        self.hit_first_epoch = true;
        if (epoch + 1) % self.epoch_interval != 0 {
            return Ok(());
        }
        model.save(&self.checkpoints_dir.join(format!("ckpt-epoch-{}", epoch + 1)))
    }
}

/// Emits a generated text sample every `print_every` epochs.
///
/// Bound at construction to one prompt, token budget and sampler width
/// (inside the generator). A generation failure is reported to stderr and
/// does not abort training.
#[derive(Debug)]
pub struct SampleHook {
    generator: TextGenerator,
    prompt: String,
    max_tokens: usize,
    print_every: usize,
}

impl SampleHook {
    /// Creates a sample-emission hook.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `print_every` is zero.
    pub fn new(
        generator: TextGenerator,
        prompt: &str,
        max_tokens: usize,
        print_every: usize,
    ) -> Result<Self> {
        if print_every == 0 {
            return Err(Error::Config("print interval must be at least 1".into()));
        }
        Ok(Self {
            generator,
            prompt: prompt.to_string(),
            max_tokens,
            print_every,
        })
    }
}

impl<M: LanguageModel> TrainingHook<M> for SampleHook {
    fn on_epoch_end(&mut self, epoch: usize, model: &M) -> Result<()> {
        if (epoch + 1) % self.print_every != 0 {
            return Ok(());
        }
        let mut rng = thread_rng();
        match self.generator.generate_text(&mut rng, model, &self.prompt, self.max_tokens) {
            Ok(text) => println!("generated text:\n{text}\n"),
            Err(e) => eprintln!("Warning: sample generation failed after epoch {}: {e}", epoch + 1),
        }
        Ok(())
    }
}
