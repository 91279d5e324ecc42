//! Hopfield attractor memory.
//!
//! Holds the named pattern store of an attractor layer and the Hebbian
//! weight matrix derived from it:
//!
//! ```text
//! W = (1/P) · Σ_p p pᵀ,   diag(W) = 0
//! ```
//!
//! Every mutation of the store recomputes `W` from scratch. Pattern
//! counts are small, so there is no incremental update path.
//!
//! Relaxation is fully synchronous: `next = sign(W · current)` until a
//! fixed point or the iteration cap. Hitting the cap is not an error; the
//! last state is returned with `converged == false`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RelaxConfig;
use crate::model::{BipolarVector, Codebook, Matrix};
use crate::{Error, Result};

/// Label reported when no stored pattern is close enough.
pub const UNRECOGNIZED: &str = "Unknown pattern";

/// Hopfield capacity estimate: about `0.14 · N` patterns for `N` units.
pub const HOPFIELD_CAPACITY_FACTOR: f64 = 0.14;

// ============================================================================
// Recall
// ============================================================================

/// Outcome of matching a vector against the pattern store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Recall {
    /// Best match with `similarity >= threshold`.
    Match { label: String, similarity: f64 },
    /// Nothing reached the threshold.
    Unrecognized { best_similarity: f64 },
}

impl Recall {
    /// The matched label, or `None` for the sentinel.
    pub fn label(&self) -> Option<&str> {
        match self {
            Recall::Match { label, .. } => Some(label),
            Recall::Unrecognized { .. } => None,
        }
    }

    pub fn similarity(&self) -> f64 {
        match *self {
            Recall::Match { similarity, .. } => similarity,
            Recall::Unrecognized { best_similarity } => best_similarity,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Recall::Match { .. })
    }
}

impl std::fmt::Display for Recall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label().unwrap_or(UNRECOGNIZED))
    }
}

/// Result of a relaxation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    /// Fixed point, or the last state computed before the cap.
    pub state: BipolarVector,
    /// Synchronous updates performed, including the one that confirmed the fixed point.
    pub iterations: usize,
    pub converged: bool,
    pub recall: Recall,
}

/// Store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub num_patterns: usize,
    pub dimension: usize,
    /// `num_patterns / (0.14 · dimension)`. Above 1.0 spurious attractors dominate.
    pub capacity_ratio: f64,
}

// ============================================================================
// AttractorMemory
// ============================================================================

/// Pattern store and Hebbian weights for one attractor layer.
#[derive(Debug, Clone)]
pub struct AttractorMemory {
    dim: usize,
    patterns: Codebook,
    weights: Option<Matrix>,
}

impl AttractorMemory {
    pub fn new(dim: usize) -> Self {
        Self { dim, patterns: Codebook::new(), weights: None }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn check_dim(&self, label: &str, v: &BipolarVector) -> Result<()> {
        if v.dim() != self.dim {
            return Err(Error::Dimension {
                context: format!("pattern '{label}'"),
                expected: self.dim,
                got: v.dim(),
            });
        }
        Ok(())
    }

    /// Insert labeled patterns, then recompute weights once.
    ///
    /// All dimensions are checked before anything is stored.
    pub fn add_states<I, L>(&mut self, states: I) -> Result<()>
    where
        I: IntoIterator<Item = (L, BipolarVector)>,
        L: Into<String>,
    {
        let states: Vec<(String, BipolarVector)> =
            states.into_iter().map(|(l, v)| (l.into(), v)).collect();
        for (label, v) in &states {
            self.check_dim(label, v)?;
        }
        for (label, v) in states {
            self.patterns.insert(label, v)?;
        }
        self.compute_weights()
    }

    /// Insert patterns labeled `pattern_<n>` with `n` counting up from the store size.
    pub fn add_unlabeled(&mut self, states: Vec<BipolarVector>) -> Result<Vec<String>> {
        for v in &states {
            self.check_dim("unlabeled", v)?;
        }
        let mut labels = Vec::with_capacity(states.len());
        for v in states {
            let mut n = self.patterns.len();
            let mut label = format!("pattern_{n}");
            while self.patterns.contains(&label) {
                n += 1;
                label = format!("pattern_{n}");
            }
            self.patterns.insert(label.clone(), v)?;
            labels.push(label);
        }
        self.compute_weights()?;
        Ok(labels)
    }

    pub fn add_single_state(&mut self, label: impl Into<String>, v: BipolarVector) -> Result<()> {
        let label = label.into();
        self.check_dim(&label, &v)?;
        self.patterns.insert(label, v)?;
        self.compute_weights()
    }

    /// Remove a pattern and recompute the weights.
    ///
    /// Removing the last pattern still empties the store and clears the
    /// weights, then fails with `EmptyStore`.
    pub fn remove_state(&mut self, label: &str) -> Result<BipolarVector> {
        let removed = self.patterns.remove(label)?;
        if self.patterns.is_empty() {
            self.weights = None;
        }
        self.compute_weights()?;
        Ok(removed)
    }

    pub fn get_state(&self, label: &str) -> Result<BipolarVector> {
        self.patterns.require(label).cloned()
    }

    pub fn list_states(&self) -> Vec<String> {
        self.patterns.labels()
    }

    pub fn patterns(&self) -> &Codebook {
        &self.patterns
    }

    pub fn weights(&self) -> Option<&Matrix> {
        self.weights.as_ref()
    }

    /// Hebbian rule over the current store.
    pub fn compute_weights(&mut self) -> Result<()> {
        if self.patterns.is_empty() {
            return Err(Error::EmptyStore);
        }
        let scale = 1.0 / self.patterns.len() as f64;
        let mut w = Matrix::zeros(self.dim, self.dim);
        for p in self.patterns.vectors() {
            w.add_outer(p, scale);
        }
        w.zero_diagonal();
        self.weights = Some(w);

        let info = self.info();
        if info.capacity_ratio > 1.0 {
            warn!(
                patterns = info.num_patterns,
                dimension = info.dimension,
                capacity_ratio = info.capacity_ratio,
                "pattern store exceeds Hopfield capacity estimate"
            );
        }
        Ok(())
    }

    /// Iterate `sign(W · s)` from `start` until it stops changing.
    pub fn settle(&self, start: &BipolarVector, config: &RelaxConfig) -> Result<Relaxation> {
        let weights = self.weights.as_ref().ok_or(Error::EmptyStore)?;
        self.check_dim("relaxation start", start)?;

        let mut current = start.clone();
        for iteration in 1..=config.max_iterations {
            let next = BipolarVector::from_signs(&weights.mul_bipolar(&current));
            if next == current {
                debug!(iterations = iteration, "relaxation converged");
                let recall = self.closest_pattern(&current, config.recall_threshold)?;
                return Ok(Relaxation { state: current, iterations: iteration, converged: true, recall });
            }
            current = next;
        }

        warn!(max_iterations = config.max_iterations, "relaxation did not converge");
        let recall = self.closest_pattern(&current, config.recall_threshold)?;
        Ok(Relaxation {
            state: current,
            iterations: config.max_iterations,
            converged: false,
            recall,
        })
    }

    /// Best stored match by `dot / N`, or `Unrecognized` below `threshold`.
    ///
    /// Ties go to the pattern inserted first.
    pub fn closest_pattern(&self, v: &BipolarVector, threshold: f64) -> Result<Recall> {
        if self.patterns.is_empty() {
            return Err(Error::EmptyStore);
        }
        self.check_dim("recall target", v)?;

        let mut best: Option<(&str, f64)> = None;
        for (label, p) in self.patterns.iter() {
            let similarity = v.dot(p) as f64 / self.dim as f64;
            if best.is_none_or(|(_, s)| similarity > s) {
                best = Some((label, similarity));
            }
        }

        let (label, similarity) = best.ok_or(Error::EmptyStore)?;
        if similarity >= threshold {
            Ok(Recall::Match { label: label.to_string(), similarity })
        } else {
            Ok(Recall::Unrecognized { best_similarity: similarity })
        }
    }

    /// Hopfield energy `-½ · vᵀ W v`. Diagnostic only.
    pub fn energy(&self, v: &BipolarVector) -> Result<f64> {
        let weights = self.weights.as_ref().ok_or(Error::EmptyStore)?;
        self.check_dim("energy", v)?;
        let wv = weights.mul_bipolar(v);
        Ok(-0.5 * v.iter().zip(wv).map(|(c, x)| c as f64 * x).sum::<f64>())
    }

    pub fn info(&self) -> MemoryInfo {
        MemoryInfo {
            num_patterns: self.patterns.len(),
            dimension: self.dim,
            capacity_ratio: self.patterns.len() as f64 / (HOPFIELD_CAPACITY_FACTOR * self.dim as f64),
        }
    }
}
