//! Bipolar vectors: the only state representation in the network.
//!
//! Every component is exactly `+1` or `-1`. The activation rule
//! [`sign`] maps an exactly-zero input to `+1`, so every update stays
//! inside the bipolar space.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Threshold activation: `+1` for `x >= 0`, `-1` otherwise.
///
/// A zero input maps to `+1`, never to `0` and never to "keep previous".
#[inline(always)]
pub fn sign(x: f64) -> i8 {
    if x < 0.0 { -1 } else { 1 }
}

/// A vector whose every component is `+1` or `-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i8>", into = "Vec<i8>")]
pub struct BipolarVector(Vec<i8>);

impl BipolarVector {
    /// Build from raw components, rejecting anything other than ±1.
    pub fn new(components: Vec<i8>) -> Result<Self> {
        if let Some((index, &value)) = components
            .iter()
            .enumerate()
            .find(|&(_, &c)| c != 1 && c != -1)
        {
            return Err(Error::NotBipolar { index, value: value as f64 });
        }
        Ok(Self(components))
    }

    /// Apply [`sign`] component-wise to a real-valued input.
    pub fn from_signs(values: &[f64]) -> Self {
        Self(values.iter().map(|&v| sign(v)).collect())
    }

    /// Build from real values that must already be exactly ±1.
    pub fn from_f64(values: &[f64]) -> Result<Self> {
        let mut components = Vec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            if value == 1.0 {
                components.push(1);
            } else if value == -1.0 {
                components.push(-1);
            } else {
                return Err(Error::NotBipolar { index, value });
            }
        }
        Ok(Self(components))
    }

    /// All components `+1`.
    pub fn ones(dim: usize) -> Self {
        Self(vec![1; dim])
    }

    /// Uniformly random components.
    pub fn random<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Self {
        Self((0..dim).map(|_| if rng.gen_bool(0.5) { 1 } else { -1 }).collect())
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }

    #[inline]
    pub fn get(&self, idx: usize) -> i8 {
        self.0[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = i8> + '_ {
        self.0.iter().copied()
    }

    /// Dot product. Lengths must match.
    pub fn dot(&self, other: &BipolarVector) -> i64 {
        debug_assert_eq!(self.dim(), other.dim());
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| (a as i64) * (b as i64))
            .sum()
    }

    /// `‖v‖²`, which for a bipolar vector is always its dimension.
    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.dim() as f64
    }

    /// Normalized overlap `dot / N` in `[-1.0, 1.0]`.
    pub fn similarity(&self, other: &BipolarVector) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.dot(other) as f64 / self.dim() as f64
    }

    /// Count of `+1` components.
    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|&&c| c == 1).count()
    }

    pub fn to_f64(&self) -> Vec<f64> {
        self.0.iter().map(|&c| c as f64).collect()
    }

    /// Flip one component.
    pub fn flip(&mut self, idx: usize) {
        self.0[idx] = -self.0[idx];
    }
}

impl TryFrom<Vec<i8>> for BipolarVector {
    type Error = Error;

    fn try_from(components: Vec<i8>) -> Result<Self> {
        Self::new(components)
    }
}

impl From<BipolarVector> for Vec<i8> {
    fn from(v: BipolarVector) -> Self {
        v.0
    }
}

impl std::fmt::Display for BipolarVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &c in &self.0 {
            f.write_str(if c > 0 { "+" } else { "-" })?;
        }
        Ok(())
    }
}
