//! Autoregressive text generation.
//!
//! The engine owns a tokenizer and a top-K sampler, and drives an opaque
//! [`LanguageModel`] through repeated constrained sampling:
//!
//! 1. Tokenize the starting prompt.
//! 2. Window the growing token buffer to the fixed context length.
//! 3. Ask the model for per-position score rows over that window.
//! 4. Sample the next id from the row at the last real token's position.
//! 5. Append and repeat until the token budget is spent.
//!
//! The buffer only grows; the window is recomputed fresh each step. Any
//! step failure aborts the whole call without producing partial output.

use crate::error::{Error, Result};
use crate::model::LanguageModel;
use crate::sampler::TopKSampler;
use crate::tokenizer::WordTokenizer;
use crate::vocab::PAD_ID;
use rand::Rng;

/// Generates text from a trained next-token model by iterative top-K
/// sampling.
#[derive(Debug, Clone)]
pub struct TextGenerator {
    tokenizer: WordTokenizer,
    maxlen: usize,
    sampler: TopKSampler,
}

impl TextGenerator {
    /// Creates a generator with a fixed context length and sampling width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `maxlen` is zero or `top_k` is zero.
    pub fn new(tokenizer: WordTokenizer, maxlen: usize, top_k: usize) -> Result<Self> {
        if maxlen == 0 {
            return Err(Error::Config("context length must be at least 1".into()));
        }
        Ok(Self {
            tokenizer,
            maxlen,
            sampler: TopKSampler::new(top_k)?,
        })
    }

    /// The tokenizer this generator decodes with.
    #[must_use]
    pub fn tokenizer(&self) -> &WordTokenizer {
        &self.tokenizer
    }

    /// Generates text starting from `prompt`.
    ///
    /// The loop runs while the generated count is `<= max_tokens`, so it
    /// appends exactly `max_tokens + 1` new tokens after the prompt. That
    /// off-by-one is a deliberate part of the contract and is pinned by a
    /// test.
    ///
    /// An empty or fully-unknown-free prompt still works: an empty buffer
    /// would have no sample position, so generation requires at least one
    /// prompt token.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Model`] from the model, [`Error::Sampling`] from
    /// the sampler, and [`Error::OutOfRange`] from detokenization. No
    /// partial text is returned.
    pub fn generate_text<M: LanguageModel, R: Rng>(
        &self,
        rng: &mut R,
        model: &M,
        prompt: &str,
        max_tokens: usize,
    ) -> Result<String> {
        let initial_tokens = self.tokenizer.tokenize(prompt);
        if initial_tokens.is_empty() {
            return Err(Error::Config("prompt produced no tokens".into()));
        }

        let mut buffer = initial_tokens.clone();
        let mut generated = Vec::new();

        while generated.len() <= max_tokens {
            let (window, sample_position) = context_window(&buffer, self.maxlen);

            let prediction = model.predict(&window)?;
            let row = prediction.scores.get(sample_position).ok_or_else(|| {
                Error::Model(format!(
                    "model returned {} score rows, need position {sample_position}",
                    prediction.scores.len()
                ))
            })?;

            let next_id = self.sampler.sample(rng, row)?;
            generated.push(next_id);
            buffer.push(next_id);
        }

        let mut sequence = initial_tokens;
        sequence.extend_from_slice(&generated);
        self.tokenizer.detokenize(&sequence)
    }
}

/// Derives the fixed-length model input from the token buffer.
///
/// Returns the window (always exactly `maxlen` ids: the most recent
/// `maxlen` when the buffer is longer, right-padded with [`PAD_ID`] when
/// shorter) and the sample position `min(len, maxlen) - 1`, the index of
/// the last real token within the window.
fn context_window(buffer: &[usize], maxlen: usize) -> (Vec<usize>, usize) {
    let len = buffer.len();
    let mut window = if len > maxlen {
        buffer[len - maxlen..].to_vec()
    } else {
        buffer.to_vec()
    };
    window.resize(maxlen, PAD_ID);
    (window, len.min(maxlen) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Prediction;
    use crate::vocab::Vocabulary;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tokenizer() -> WordTokenizer {
        WordTokenizer::new(Vocabulary::new(
            ["<pad>", "<oov>", "the", "movie", "is", "great"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        ))
    }

    /// Always scores one fixed id far above the rest, at every position.
    struct ConstantModel {
        vocab_size: usize,
        favourite: usize,
    }

    impl LanguageModel for ConstantModel {
        fn predict(&self, window: &[usize]) -> Result<Prediction> {
            let mut row = vec![0.0; self.vocab_size];
            row[self.favourite] = 10.0;
            Ok(Prediction {
                scores: vec![row; window.len()],
                attention: Vec::new(),
            })
        }
    }

    /// Records every window and sample position it is asked about.
    struct RecordingModel {
        vocab_size: usize,
        windows: std::cell::RefCell<Vec<Vec<usize>>>,
    }

    impl LanguageModel for RecordingModel {
        fn predict(&self, window: &[usize]) -> Result<Prediction> {
            self.windows.borrow_mut().push(window.to_vec());
            Ok(Prediction {
                scores: vec![vec![1.0; self.vocab_size]; window.len()],
                attention: Vec::new(),
            })
        }
    }

    #[test]
    fn window_is_padded_when_buffer_is_short() {
        let (window, pos) = context_window(&[2, 3, 4], 6);
        assert_eq!(window, vec![2, 3, 4, 0, 0, 0]);
        assert_eq!(pos, 2);
    }

    #[test]
    fn window_equals_buffer_at_exact_length() {
        let (window, pos) = context_window(&[2, 3, 4, 5], 4);
        assert_eq!(window, vec![2, 3, 4, 5]);
        assert_eq!(pos, 3);
    }

    #[test]
    fn window_keeps_the_most_recent_tokens_when_long() {
        let (window, pos) = context_window(&[9, 8, 7, 6, 5], 3);
        assert_eq!(window, vec![7, 6, 5]);
        assert_eq!(pos, 2);
    }

    #[test]
    fn window_always_has_exactly_maxlen_entries() {
        for len in 1..12 {
            let buffer: Vec<usize> = (1..=len).collect();
            let (window, pos) = context_window(&buffer, 5);
            assert_eq!(window.len(), 5);
            assert_eq!(pos, len.min(5) - 1);
        }
    }

    #[test]
    fn generates_exactly_max_tokens_plus_one() {
        let generator = TextGenerator::new(tokenizer(), 6, 1).unwrap();
        let model = ConstantModel { vocab_size: 6, favourite: 5 };
        let mut rng = StdRng::seed_from_u64(1);

        let text = generator.generate_text(&mut rng, &model, "the movie is", 4).unwrap();
        // 3 prompt words plus 4 + 1 generated words.
        assert_eq!(text.split(' ').count(), 8);
        assert_eq!(text, "the movie is great great great great great");
    }

    #[test]
    fn sampling_reads_the_last_real_position_not_the_window_end() {
        let generator = TextGenerator::new(tokenizer(), 6, 6).unwrap();
        let model = RecordingModel { vocab_size: 6, windows: std::cell::RefCell::new(Vec::new()) };
        let mut rng = StdRng::seed_from_u64(1);

        generator.generate_text(&mut rng, &model, "the movie is", 0).unwrap();
        let windows = model.windows.borrow();
        assert_eq!(windows[0], vec![2, 3, 4, 0, 0, 0]);
    }

    #[test]
    fn long_prompts_slide_the_window() {
        let generator = TextGenerator::new(tokenizer(), 2, 1).unwrap();
        let model = RecordingModel { vocab_size: 6, windows: std::cell::RefCell::new(Vec::new()) };
        let mut rng = StdRng::seed_from_u64(1);

        generator.generate_text(&mut rng, &model, "the movie is great", 1).unwrap();
        let windows = model.windows.borrow();
        // Prompt ids [2,3,4,5], maxlen 2: first window is the two newest.
        assert_eq!(windows[0], vec![4, 5]);
        assert_eq!(windows[0].len(), 2);
        assert_eq!(windows[1].len(), 2);
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let generator = TextGenerator::new(tokenizer(), 6, 2).unwrap();
        let model = ConstantModel { vocab_size: 6, favourite: 5 };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generator.generate_text(&mut rng, &model, "   ", 3),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn model_failure_aborts_without_partial_output() {
        struct FailingModel;
        impl LanguageModel for FailingModel {
            fn predict(&self, _window: &[usize]) -> Result<Prediction> {
                Err(Error::Model("shape mismatch".into()))
            }
        }
        let generator = TextGenerator::new(tokenizer(), 6, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generator.generate_text(&mut rng, &FailingModel, "the movie is", 3),
            Err(Error::Model(_))
        ));
    }
}
