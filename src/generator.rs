//! Near-orthogonal codebook generation.
//!
//! The network only needs *some* set of well-separated bipolar codes for
//! its states. [`CodebookGenerator`] is that contract; [`RejectionSampler`]
//! is the plain implementation: draw random vectors, keep one only if it
//! stays within the dot-product bound against everything kept so far.

use rand::Rng;
use tracing::{debug, info};

use crate::model::BipolarVector;
use crate::{Error, Result};

/// Source of `count` bipolar vectors of dimension `dim` whose pairwise
/// dot products satisfy `|a · b| <= threshold`.
pub trait CodebookGenerator {
    fn generate(&mut self, dim: usize, count: usize, threshold: f64) -> Result<Vec<BipolarVector>>;
}

/// `true` if every pair in `vectors` has `|dot| <= threshold`.
pub fn are_almost_orthogonal(vectors: &[BipolarVector], threshold: f64) -> bool {
    vectors.iter().enumerate().all(|(i, a)| {
        vectors[i + 1..]
            .iter()
            .all(|b| (a.dot(b) as f64).abs() <= threshold)
    })
}

/// Rejection sampling over uniformly random bipolar vectors.
///
/// Unbounded by default: an infeasible `(dim, count, threshold)` loops
/// forever. Keep `dim` generous relative to `count` (roughly `dim >= 7 * count`
/// for threshold 0) or set [`max_attempts`](Self::with_max_attempts).
pub struct RejectionSampler<R: Rng> {
    rng: R,
    max_attempts: Option<u64>,
}

impl<R: Rng> RejectionSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, max_attempts: None }
    }

    /// Give up with `GenerationExhausted` after this many draws in total.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

impl<R: Rng> CodebookGenerator for RejectionSampler<R> {
    fn generate(&mut self, dim: usize, count: usize, threshold: f64) -> Result<Vec<BipolarVector>> {
        if dim == 0 || count == 0 {
            return Err(Error::InvalidConfig("dimension and count must be positive".into()));
        }
        if threshold.is_nan() || threshold < 0.0 {
            return Err(Error::InvalidConfig(format!("threshold must be non-negative, got {threshold}")));
        }

        info!(dim, count, threshold, "searching for near-orthogonal bipolar codes");

        let mut vectors: Vec<BipolarVector> = Vec::with_capacity(count);
        let mut attempts: u64 = 0;

        while vectors.len() < count {
            if self.max_attempts.is_some_and(|cap| attempts >= cap) {
                return Err(Error::GenerationExhausted { attempts });
            }
            attempts += 1;

            let candidate = BipolarVector::random(dim, &mut self.rng);
            let fits = vectors
                .iter()
                .all(|kept| (kept.dot(&candidate) as f64).abs() <= threshold);
            if fits {
                vectors.push(candidate);
                debug!(found = vectors.len(), attempts, "accepted code");
            }
        }

        info!(count, attempts, "codebook generated");
        Ok(vectors)
    }
}
