#![warn(missing_docs)]

//! # word-gpt
//!
//! `word-gpt` is a minimal Rust library for training word-level language
//! models on a text corpus and generating text from them by iterative
//! constrained sampling.
//!
//! The heart of the crate is the generation engine: it tokenizes a prompt,
//! windows the growing token buffer to a fixed context length, asks an
//! opaque [`LanguageModel`] for per-position next-token scores, draws one
//! id from the top-K candidates, and repeats until the token budget is
//! spent. Around it sit periodic training hooks that checkpoint the model
//! and emit sample text on a schedule while a fit loop runs.
//!
//! ## Key components
//!
//! * [`TextGenerator`]: the autoregressive generation engine.
//! * [`TopKSampler`]: constrained sampling over the K highest-scoring ids.
//! * [`Vocabulary`] / [`WordTokenizer`]: the id space and the whitespace
//!   word tokenizer over it.
//! * [`LanguageModel`] / [`TrainableModel`]: capability seams behind which
//!   any scoring model can sit; [`BigramModel`] is the shipped count-based
//!   implementation.
//! * [`CheckpointHook`] / [`SampleHook`]: scheduled side effects observed
//!   at training batch and epoch boundaries.
//!
//! ## Example
//!
//! ```no_run
//! use word_gpt::{BigramModel, Checkpoint, TextGenerator, Vocabulary, WordTokenizer};
//! use rand::thread_rng;
//! use std::path::Path;
//!
//! # fn main() -> word_gpt::Result<()> {
//! let vocab = Vocabulary::load(Path::new("checkpoints/vocab.txt"))?;
//! let model = BigramModel::load(Path::new("checkpoints/ckpt-epoch-1"))?;
//!
//! let generator = TextGenerator::new(WordTokenizer::new(vocab), 80, 10)?;
//! let mut rng = thread_rng();
//! let text = generator.generate_text(&mut rng, &model, "this movie is", 40)?;
//! println!("Generated text: {text}");
//! # Ok(())
//! # }
//! ```

/// Concrete count-based bigram language model.
pub mod bigram;
/// Checkpoint persistence: the `Checkpoint` trait and bincode helpers.
pub mod checkpoint;
/// Corpus ingestion, vocabulary building, and batch windowing.
pub mod dataset;
/// The crate-wide error type.
pub mod error;
/// The autoregressive generation engine.
pub mod generate;
/// Periodic training hooks (checkpointing, sample emission).
pub mod hooks;
/// Model capability traits.
pub mod model;
/// Constrained top-K sampling.
pub mod sampler;
/// Whitespace word tokenization.
pub mod tokenizer;
/// The epoch/batch fit loop.
pub mod train;
/// The vocabulary index and its file format.
pub mod vocab;

pub use bigram::BigramModel;
pub use checkpoint::Checkpoint;
pub use dataset::{build_corpus, Batch, Corpus};
pub use error::{Error, Result};
pub use generate::TextGenerator;
pub use hooks::{CheckpointHook, SampleHook, TrainingHook};
pub use model::{LanguageModel, Prediction, TrainableModel};
pub use sampler::TopKSampler;
pub use tokenizer::WordTokenizer;
pub use train::fit;
pub use vocab::{Vocabulary, OOV_ID, PAD_ID};
