//! Constrained top-K sampling.
//!
//! Given one raw score vector, restrict the candidates to the K
//! highest-scoring token ids, softmax over exactly those K scores, and draw
//! one id from the renormalized distribution. Randomness comes from an
//! explicit `Rng` handle supplied by the caller, so seeding and
//! reproducibility are the caller's contract rather than hidden global
//! state.

use crate::error::{Error, Result};
use rand::distributions::WeightedIndex;
use rand::prelude::*;

/// Samples token ids from the top K entries of a score vector.
#[derive(Debug, Clone, Copy)]
pub struct TopKSampler {
    k: usize,
}

impl TopKSampler {
    /// Creates a sampler restricted to the `k` highest-scoring candidates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `k` is zero.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::Config("top-k width must be at least 1".into()));
        }
        Ok(Self { k })
    }

    /// The configured candidate width.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Draws one token id from the top `k` entries of `scores`.
    ///
    /// `k` larger than the score vector is clamped to its length. Each call
    /// draws independently; the returned id is always one of the original
    /// indices of the top `k` scores.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sampling`] if `scores` is empty or the renormalized
    /// weights cannot form a distribution.
    pub fn sample<R: Rng>(&self, rng: &mut R, scores: &[f32]) -> Result<usize> {
        if scores.is_empty() {
            return Err(Error::Sampling("empty score vector".into()));
        }
        let candidates = top_k(scores, self.k);
        let weights = softmax(&candidates.iter().map(|&(_, s)| s).collect::<Vec<_>>());
        let dist = WeightedIndex::new(&weights)
            .map_err(|e| Error::Sampling(format!("failed to build distribution: {e}")))?;
        Ok(candidates[dist.sample(rng)].0)
    }
}

/// Returns the `k` highest-scoring `(index, score)` pairs, highest first.
/// Ties keep the lower original index first (stable sort).
fn top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut indexed: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(k.min(scores.len()));
    indexed
}

/// Softmax over a small score slice, max-subtracted for stability.
fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn zero_width_is_rejected() {
        assert!(matches!(TopKSampler::new(0), Err(Error::Config(_))));
    }

    #[test]
    fn top_k_returns_original_indices_highest_first() {
        let scores = [0.1, 3.0, -1.0, 2.5, 0.9];
        let picked = top_k(&scores, 3);
        assert_eq!(picked.len(), 3);
        assert_eq!(picked[0].0, 1);
        assert_eq!(picked[1].0, 3);
        assert_eq!(picked[2].0, 4);
    }

    #[test]
    fn softmax_over_candidates_sums_to_one() {
        let probs = softmax(&[2.0, 1.0, 0.5]);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn sampled_id_is_always_one_of_the_top_k() {
        let sampler = TopKSampler::new(2).unwrap();
        let scores = [0.0, 5.0, 1.0, 4.0];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let id = sampler.sample(&mut rng, &scores).unwrap();
            assert!(id == 1 || id == 3, "id {id} escaped the top-2 set");
        }
    }

    #[test]
    fn width_larger_than_vocabulary_is_clamped() {
        let sampler = TopKSampler::new(100).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let id = sampler.sample(&mut rng, &[1.0, 2.0]).unwrap();
        assert!(id < 2);
    }

    #[test]
    fn empty_scores_fail() {
        let sampler = TopKSampler::new(3).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            sampler.sample(&mut rng, &[]),
            Err(Error::Sampling(_))
        ));
    }
}
