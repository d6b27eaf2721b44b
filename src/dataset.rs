//! Corpus ingestion and vocabulary construction.
//!
//! Reads plain-text files, builds a frequency-ranked vocabulary behind the
//! two reserved ids, and cuts the token stream into fixed-length
//! `(input, target)` windows shifted by one position, grouped into
//! batches. Files are read and word-counted in parallel; the resulting
//! stream keeps file order so runs over the same corpus are stable.

use crate::error::{Error, Result};
use crate::vocab::Vocabulary;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Token string stored at the reserved padding id 0.
pub const PAD_TOKEN: &str = "";

/// Token string stored at the reserved out-of-vocabulary id 1.
pub const OOV_TOKEN: &str = "[UNK]";

/// One training batch of shifted sequence pairs.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Input sequences, each exactly `maxlen` ids.
    pub inputs: Vec<Vec<usize>>,
    /// Targets: the same sequences shifted one position ahead.
    pub targets: Vec<Vec<usize>>,
}

/// A batched token stream plus the vocabulary it was encoded with.
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Batches in corpus order.
    pub batches: Vec<Batch>,
    /// Frequency-ranked vocabulary, reserved ids first.
    pub vocab: Vocabulary,
}

/// Builds a corpus from the `.txt` files directly under `dirs`.
///
/// The vocabulary keeps the `vocab_size - 2` most frequent lower-cased
/// words behind the reserved padding and out-of-vocabulary entries, ties
/// broken alphabetically. Windows of `maxlen + 1` tokens yield one
/// `(input, target)` pair each; the final partial batch is kept.
///
/// # Errors
///
/// Returns [`Error::Config`] for degenerate parameters or a corpus too
/// small for a single window, and [`Error::Dataset`] for unreadable files.
pub fn build_corpus(
    dirs: &[PathBuf],
    vocab_size: usize,
    maxlen: usize,
    batch_size: usize,
) -> Result<Corpus> {
    if vocab_size < 3 {
        return Err(Error::Config(
            "vocabulary size must leave room past the two reserved ids".into(),
        ));
    }
    if maxlen == 0 || batch_size == 0 {
        return Err(Error::Config(
            "sequence length and batch size must be at least 1".into(),
        ));
    }

    let files = list_text_files(dirs)?;
    if files.is_empty() {
        return Err(Error::Config("no .txt files found under the corpus directories".into()));
    }

    // Read and split in parallel, then flatten in file order.
    let per_file: Vec<Vec<String>> = files
        .par_iter()
        .map(|path| {
            let text = fs::read_to_string(path).map_err(|source| Error::Dataset {
                path: path.clone(),
                source,
            })?;
            Ok(text
                .to_lowercase()
                .split_whitespace()
                .map(ToString::to_string)
                .collect())
        })
        .collect::<Result<_>>()?;
    let words: Vec<String> = per_file.into_iter().flatten().collect();

    let vocab = rank_vocabulary(&words, vocab_size);
    let tokens: Vec<usize> = words.iter().map(|w| vocab.id_of(w)).collect();
    if tokens.len() < maxlen + 1 {
        return Err(Error::Config(format!(
            "corpus has {} tokens, need at least {} for one window",
            tokens.len(),
            maxlen + 1
        )));
    }

    let mut pairs: Vec<(Vec<usize>, Vec<usize>)> = Vec::new();
    for chunk in tokens.chunks(maxlen + 1) {
        if chunk.len() == maxlen + 1 {
            pairs.push((chunk[..maxlen].to_vec(), chunk[1..].to_vec()));
        }
    }

    let batches = pairs
        .chunks(batch_size)
        .map(|group| Batch {
            inputs: group.iter().map(|(i, _)| i.clone()).collect(),
            targets: group.iter().map(|(_, t)| t.clone()).collect(),
        })
        .collect();

    Ok(Corpus { batches, vocab })
}

/// Ranks words by frequency (ties alphabetical) and prepends the reserved
/// tokens.
fn rank_vocabulary(words: &[String], vocab_size: usize) -> Vocabulary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in words {
        *counts.entry(word).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut entries = vec![PAD_TOKEN.to_string(), OOV_TOKEN.to_string()];
    entries.extend(ranked.into_iter().take(vocab_size - 2).map(|(w, _)| w.to_string()));
    Vocabulary::new(entries)
}

fn list_text_files(dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir in dirs {
        let entries = fs::read_dir(dir).map_err(|source| Error::Dataset {
            path: dir.clone(),
            source,
        })?;
        let mut in_dir = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Dataset {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                in_dir.push(path);
            }
        }
        in_dir.sort();
        files.extend(in_dir);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{OOV_ID, PAD_ID};

    fn write_corpus(name: &str, contents: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("word-gpt-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for (file, text) in contents {
            fs::write(dir.join(file), text).unwrap();
        }
        dir
    }

    #[test]
    fn vocabulary_is_frequency_ranked_behind_reserved_ids() {
        let dir = write_corpus("rank", &[("a.txt", "The movie the Movie the is great")]);
        let corpus = build_corpus(&[dir.clone()], 10, 3, 2).unwrap();
        fs::remove_dir_all(&dir).ok();

        let vocab = &corpus.vocab;
        assert_eq!(vocab.word_of(PAD_ID).unwrap(), PAD_TOKEN);
        assert_eq!(vocab.word_of(OOV_ID).unwrap(), OOV_TOKEN);
        // "the" x3, "movie" x2 (case folded), then alphabetical ties.
        assert_eq!(vocab.word_of(2).unwrap(), "the");
        assert_eq!(vocab.word_of(3).unwrap(), "movie");
    }

    #[test]
    fn rare_words_fall_back_to_oov() {
        let dir = write_corpus("oov", &[("a.txt", "the the the movie movie rare one two")]);
        // Room for only the two most frequent words.
        let corpus = build_corpus(&[dir.clone()], 4, 3, 2).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(corpus.vocab.len(), 4);
        assert_eq!(corpus.vocab.id_of("rare"), OOV_ID);
    }

    #[test]
    fn targets_are_inputs_shifted_by_one() {
        let dir = write_corpus("shift", &[("a.txt", "a b c d e f g h i")]);
        let corpus = build_corpus(&[dir.clone()], 20, 3, 8).unwrap();
        fs::remove_dir_all(&dir).ok();

        let batch = &corpus.batches[0];
        for (input, target) in batch.inputs.iter().zip(&batch.targets) {
            assert_eq!(input.len(), 3);
            assert_eq!(target.len(), 3);
            assert_eq!(input[1..], target[..2]);
        }
    }

    #[test]
    fn a_corpus_smaller_than_one_window_is_rejected() {
        let dir = write_corpus("tiny", &[("a.txt", "just two")]);
        let result = build_corpus(&[dir.clone()], 10, 5, 2);
        fs::remove_dir_all(&dir).ok();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn missing_directory_is_a_dataset_error() {
        let missing = PathBuf::from("/definitely/not/here");
        assert!(matches!(
            build_corpus(&[missing], 10, 3, 2),
            Err(Error::Dataset { .. })
        ));
    }
}
