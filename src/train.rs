//! The supervised fit loop.
//!
//! A plain epoch-over-batches loop: every batch goes through the model's
//! `fit_batch`, then the batch hooks fire; at each epoch boundary the
//! epoch hooks fire. Everything runs sequentially on the calling thread,
//! which is what guarantees the hooks' at-most-one-in-flight side effects.

use crate::dataset::Batch;
use crate::error::Result;
use crate::hooks::TrainingHook;
use crate::model::TrainableModel;
use std::time::Instant;

/// Trains `model` for `epochs` passes over `batches`, firing `hooks` at
/// batch and epoch boundaries.
///
/// Hook indices are zero-based. A hook error aborts training; the sample
/// hook downgrades its own failures internally, so only checkpoint and
/// model errors surface here.
///
/// # Errors
///
/// Propagates the first model or hook failure.
pub fn fit<M: TrainableModel>(
    model: &mut M,
    batches: &[Batch],
    epochs: usize,
    hooks: &mut [Box<dyn TrainingHook<M> + '_>],
) -> Result<()> {
    println!(
        "Starting training: {} epochs over {} batches",
        epochs,
        batches.len()
    );

    for epoch in 0..epochs {
        let epoch_timer = Instant::now();

        for (batch_index, batch) in batches.iter().enumerate() {
            model.fit_batch(&batch.inputs, &batch.targets)?;
            for hook in hooks.iter_mut() {
                hook.on_batch_end(batch_index, model)?;
            }
        }

        println!(
            "Epoch {}/{} finished in {:.2}s",
            epoch + 1,
            epochs,
            epoch_timer.elapsed().as_secs_f32()
        );

        for hook in hooks.iter_mut() {
            hook.on_epoch_end(epoch, model)?;
        }
    }

    println!("Training finished.");
    Ok(())
}
