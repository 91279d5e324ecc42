//! Network configuration.
//!
//! Everything that would otherwise be ambient process state (random
//! source, relaxation limits, recall threshold) is carried here and
//! passed explicitly into construction.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Iteration cap for synchronous Hopfield relaxation.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Minimum normalized overlap for a settled state to count as a stored pattern.
pub const DEFAULT_RECALL_THRESHOLD: f64 = 0.75;

/// Relaxation and recall parameters for an attractor layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxConfig {
    pub max_iterations: usize,
    pub recall_threshold: f64,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            recall_threshold: DEFAULT_RECALL_THRESHOLD,
        }
    }
}

impl RelaxConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig("max_iterations must be > 0".into()));
        }
        if !(-1.0..=1.0).contains(&self.recall_threshold) {
            return Err(Error::InvalidConfig(format!(
                "recall_threshold must be in [-1, 1], got {}",
                self.recall_threshold
            )));
        }
        Ok(())
    }
}

/// Configuration threaded through network assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Seed for the random source. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub relax: RelaxConfig,
}

impl NetworkConfig {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.relax.validate()
    }

    /// Build the random source described by this configuration.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}
