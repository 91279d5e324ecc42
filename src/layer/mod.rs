//! # Layers
//!
//! A [`Layer`] is a bipolar state vector plus the weights that connect it to
//! an optional *lower* and *upper* neighbor. Its one computation is the
//! synchronous apical update:
//!
//! ```text
//! raw   = W_lower · s_lower + W_upper · s_upper
//! s_new = sign(raw - θ)
//! ```
//!
//! A layer never owns its neighbors. Links are [`LayerId`] handles into the
//! [`LayerArena`] that owns every layer, which lets the minterm and attractor
//! layers reference each other without ownership cycles.
//!
//! Attractor behavior is a capability, not a subtype: a layer whose
//! [`LayerKind`] is `Attractor` additionally carries an [`AttractorMemory`]
//! and supports [`Layer::relax`] and [`Layer::recall`].

pub mod arena;
pub mod attractor;

pub use arena::LayerArena;
pub use attractor::{AttractorMemory, MemoryInfo, Recall, Relaxation, UNRECOGNIZED};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RelaxConfig;
use crate::model::{BipolarVector, Matrix};
use crate::{Error, Result};

/// Handle to a layer inside a [`LayerArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub usize);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// What a layer can do beyond the apical update.
#[derive(Debug, Clone)]
pub enum LayerKind {
    Plain,
    Attractor(AttractorMemory),
}

/// One tier of the network.
#[derive(Debug, Clone)]
pub struct Layer {
    size: usize,
    state: BipolarVector,
    lower: Option<LayerId>,
    upper: Option<LayerId>,
    lower_weights: Matrix,
    upper_weights: Matrix,
    thresholds: Vec<f64>,
    kind: LayerKind,
}

impl Layer {
    /// Plain layer with a random initial state, zero weights and no links.
    pub fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        Self::with_kind(size, LayerKind::Plain, rng)
    }

    /// Attractor layer with an empty pattern store.
    pub fn attractor<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        Self::with_kind(size, LayerKind::Attractor(AttractorMemory::new(size)), rng)
    }

    fn with_kind<R: Rng + ?Sized>(size: usize, kind: LayerKind, rng: &mut R) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig("layer size must be positive".into()));
        }
        Ok(Self {
            size,
            state: BipolarVector::random(size, rng),
            lower: None,
            upper: None,
            lower_weights: Matrix::zeros(size, 0),
            upper_weights: Matrix::zeros(size, 0),
            thresholds: vec![0.0; size],
            kind,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn state(&self) -> &BipolarVector {
        &self.state
    }

    pub fn lower(&self) -> Option<LayerId> {
        self.lower
    }

    pub fn upper(&self) -> Option<LayerId> {
        self.upper
    }

    pub fn lower_weights(&self) -> &Matrix {
        &self.lower_weights
    }

    pub fn upper_weights(&self) -> &Matrix {
        &self.upper_weights
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    pub fn is_attractor(&self) -> bool {
        matches!(self.kind, LayerKind::Attractor(_))
    }

    pub fn memory(&self) -> Option<&AttractorMemory> {
        match &self.kind {
            LayerKind::Attractor(m) => Some(m),
            LayerKind::Plain => None,
        }
    }

    pub fn memory_mut(&mut self) -> Option<&mut AttractorMemory> {
        match &mut self.kind {
            LayerKind::Attractor(m) => Some(m),
            LayerKind::Plain => None,
        }
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn set_state(&mut self, state: BipolarVector) -> Result<()> {
        if state.dim() != self.size {
            return Err(Error::Dimension {
                context: "layer state".into(),
                expected: self.size,
                got: state.dim(),
            });
        }
        self.state = state;
        Ok(())
    }

    // ========================================================================
    // Wiring (driven by the arena, which knows neighbor sizes)
    // ========================================================================

    /// Link the lower side. Resets that side's weights to zeros of the new shape.
    pub(crate) fn link_lower(&mut self, id: LayerId, neighbor_size: usize) {
        self.lower = Some(id);
        self.lower_weights = Matrix::zeros(self.size, neighbor_size);
    }

    pub(crate) fn link_upper(&mut self, id: LayerId, neighbor_size: usize) {
        self.upper = Some(id);
        self.upper_weights = Matrix::zeros(self.size, neighbor_size);
    }

    /// Validate and install weights given the linked neighbors' sizes.
    ///
    /// A side with no neighbor (`None`) accepts only an all-zero matrix.
    pub(crate) fn install_weights(
        &mut self,
        lower: Matrix,
        upper: Matrix,
        thresholds: Vec<f64>,
        lower_size: Option<usize>,
        upper_size: Option<usize>,
    ) -> Result<()> {
        if thresholds.len() != self.size {
            return Err(Error::Dimension {
                context: "thresholds".into(),
                expected: self.size,
                got: thresholds.len(),
            });
        }
        check_side("lower weights", &lower, self.size, lower_size)?;
        check_side("upper weights", &upper, self.size, upper_size)?;
        if !lower.is_finite() {
            return Err(Error::NonFinite { context: "lower weights".into() });
        }
        if !upper.is_finite() {
            return Err(Error::NonFinite { context: "upper weights".into() });
        }
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(Error::NonFinite { context: "thresholds".into() });
        }

        self.lower_weights = lower;
        self.upper_weights = upper;
        self.thresholds = thresholds;
        Ok(())
    }

    // ========================================================================
    // Dynamics
    // ========================================================================

    /// `W_lower · s_lower + W_upper · s_upper - θ`, omitting unlinked terms.
    ///
    /// Neighbor states must match the weight shapes installed for them.
    pub fn net_input(&self, lower: Option<&BipolarVector>, upper: Option<&BipolarVector>) -> Vec<f64> {
        let mut raw = vec![0.0; self.size];
        if let Some(s) = lower {
            for (acc, x) in raw.iter_mut().zip(self.lower_weights.mul_bipolar(s)) {
                *acc += x;
            }
        }
        if let Some(s) = upper {
            for (acc, x) in raw.iter_mut().zip(self.upper_weights.mul_bipolar(s)) {
                *acc += x;
            }
        }
        for (acc, t) in raw.iter_mut().zip(&self.thresholds) {
            *acc -= t;
        }
        raw
    }

    /// One synchronous update from the given neighbor states. Returns the new state.
    pub fn activate(&mut self, lower: Option<&BipolarVector>, upper: Option<&BipolarVector>) -> BipolarVector {
        self.state = BipolarVector::from_signs(&self.net_input(lower, upper));
        self.state.clone()
    }

    /// Hopfield relaxation from the current state. Attractor layers only.
    pub fn relax(&mut self, config: &RelaxConfig) -> Result<Relaxation> {
        let LayerKind::Attractor(memory) = &self.kind else {
            return Err(Error::NotAttractor);
        };
        let relaxation = memory.settle(&self.state, config)?;
        self.state = relaxation.state.clone();
        Ok(relaxation)
    }

    /// Match the current state against the pattern store without relaxing.
    pub fn recall(&self, threshold: f64) -> Result<Recall> {
        match &self.kind {
            LayerKind::Attractor(memory) => memory.closest_pattern(&self.state, threshold),
            LayerKind::Plain => Err(Error::NotAttractor),
        }
    }
}

fn check_side(context: &str, m: &Matrix, rows: usize, neighbor: Option<usize>) -> Result<()> {
    match neighbor {
        Some(cols) if m.shape() != (rows, cols) => Err(Error::Shape {
            context: context.into(),
            expected: (rows, cols),
            got: m.shape(),
        }),
        None if !m.is_zero() => Err(Error::Shape {
            context: format!("{context} (no neighbor linked)"),
            expected: (rows, 0),
            got: m.shape(),
        }),
        _ => Ok(()),
    }
}
