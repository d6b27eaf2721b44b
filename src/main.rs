//! Command-line surface: train a model over a text corpus, or generate
//! text from a checkpointed one.

use word_gpt::{
    build_corpus, fit, BigramModel, Checkpoint, CheckpointHook, Error, SampleHook, TextGenerator,
    TrainingHook, Vocabulary, WordTokenizer,
};

use clap::Parser;
use rand::thread_rng;
use std::path::PathBuf;

// --- Configuration Structs ---

#[derive(Parser, Debug, Clone)]
struct GenerateConfig {
    #[clap(required = true, help = "Starting prompt words for the generative model")]
    prompt: Vec<String>,
    #[clap(long, required = true, help = "Checkpoint directory to load")]
    checkpoint: PathBuf,
    #[clap(long, required = true, help = "Vocabulary file to load")]
    vocab: PathBuf,
    #[clap(long, default_value = "80", help = "Number of tokens to generate after the prompt")]
    count: usize,
    #[clap(long, default_value = "10", help = "Sample from the top-k token predictions")]
    top_k: usize,
    #[clap(long, default_value = "80", help = "Context window size (max sequence length)")]
    maxlen: usize,
}

#[derive(Parser, Debug, Clone)]
struct TrainConfig {
    #[clap(long, required = true, num_args = 1.., help = "Directories of .txt corpus files")]
    data: Vec<PathBuf>,
    #[clap(long, default_value = "./checkpoints", help = "Directory for checkpoints and vocab.txt")]
    checkpoints_dir: PathBuf,
    #[clap(long, default_value = "30000", help = "Only consider the top N words")]
    vocab_size: usize,
    #[clap(long, default_value = "80", help = "Context window size (max sequence length)")]
    maxlen: usize,
    #[clap(long, default_value = "50", help = "Number of training epochs")]
    epochs: usize,
    #[clap(long, default_value = "64", help = "Sequences per training batch")]
    batch_size: usize,
    #[clap(long, default_value = "20", help = "Save every N batches during the first epoch")]
    batch_save_interval: usize,
    #[clap(long, default_value = "1", help = "Save every N epochs")]
    epoch_save_interval: usize,
    #[clap(long, default_value = "this movie is", help = "Prompt for periodic sample emission")]
    start_prompt: String,
    #[clap(long, default_value = "40", help = "Token budget for periodic sample emission")]
    sample_tokens: usize,
    #[clap(long, default_value = "1", help = "Emit a text sample every N epochs")]
    print_every: usize,
    #[clap(long, default_value = "10", help = "Sample from the top-k token predictions")]
    top_k: usize,
}

// --- CLI Commands ---

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
enum Cli {
    /// Train a model on a text corpus, checkpointing periodically
    Train {
        #[clap(flatten)]
        config: TrainConfig,
    },
    /// Generate text using a checkpointed model
    Generate {
        #[clap(flatten)]
        config: GenerateConfig,
    },
}

fn main() -> Result<(), Error> {
    match Cli::parse() {
        Cli::Generate { config } => run_generation(&config),
        Cli::Train { config } => run_training(&config),
    }
}

// --- Generation ---

fn run_generation(config: &GenerateConfig) -> Result<(), Error> {
    let prompt = config.prompt.join(" ").to_lowercase();

    println!("Loading vocabulary from: {:?}", config.vocab);
    let vocab = Vocabulary::load(&config.vocab)?;
    println!("Vocabulary loaded: {} tokens", vocab.len());

    println!("Loading model from: {:?}", config.checkpoint);
    let model = BigramModel::load(&config.checkpoint)?;

    let generator = TextGenerator::new(WordTokenizer::new(vocab), config.maxlen, config.top_k)?;
    let mut rng = thread_rng();
    let text = generator.generate_text(&mut rng, &model, &prompt, config.count)?;

    println!("Generated text: {text}");
    Ok(())
}

// --- Training ---

fn run_training(config: &TrainConfig) -> Result<(), Error> {
    println!("Building corpus from: {:?}", config.data);
    let corpus = build_corpus(&config.data, config.vocab_size, config.maxlen, config.batch_size)?;
    println!(
        "Corpus ready: {} batches, {} vocabulary entries",
        corpus.batches.len(),
        corpus.vocab.len()
    );

    std::fs::create_dir_all(&config.checkpoints_dir).map_err(|source| Error::Checkpoint {
        path: config.checkpoints_dir.clone(),
        source,
    })?;
    let vocab_file = config.checkpoints_dir.join("vocab.txt");
    corpus.vocab.save(&vocab_file)?;
    println!("Vocabulary written to: {vocab_file:?}");

    let mut model = BigramModel::new(corpus.vocab.len())?;

    let start_prompt = config.start_prompt.to_lowercase();
    let generator = TextGenerator::new(
        WordTokenizer::new(corpus.vocab.clone()),
        config.maxlen,
        config.top_k,
    )?;
    let mut hooks: Vec<Box<dyn TrainingHook<BigramModel>>> = vec![
        Box::new(CheckpointHook::new(
            &config.checkpoints_dir,
            true,
            config.batch_save_interval,
            config.epoch_save_interval,
        )?),
        Box::new(SampleHook::new(
            generator,
            &start_prompt,
            config.sample_tokens,
            config.print_every,
        )?),
    ];

    fit(&mut model, &corpus.batches, config.epochs, &mut hooks)?;

    println!("Observed {} bigrams.", model.observations());
    Ok(())
}
