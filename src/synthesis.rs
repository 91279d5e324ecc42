//! # Minterm Synthesis
//!
//! Turns a symbolic transition table into the weights that make
//! `input → minterm → attractor` realize the automaton.
//!
//! One minterm unit per transition. Unit `i` watches the relation code on
//! the input layer and the source-state code on the attractor layer:
//!
//! ```text
//! θ_i = ‖source_i‖² + ‖relation_i‖² - 0.5
//! ```
//!
//! For bipolar codes `‖v‖² = dim`, so the weighted input reaches `θ_i + 0.5`
//! only when both codes match exactly. Any mismatch costs at least 2 and the
//! unit stays at `-1`.
//!
//! The attractor layer reads the minterm layer through columns holding each
//! minterm's target code. Its thresholds cancel, on average, the
//! contribution of the `M - 1` units that are *not* firing:
//!
//! ```text
//! offset_i = -Σ_{j≠i} target_j
//! θ_state  = (1/M) · Σ_i offset_i
//! ```
//!
//! ## Limitations
//!
//! The averaged state threshold is exact only when it happens to equal the
//! offset of the firing minterm. Its accuracy depends on target codes being
//! near-orthogonal; arbitrary codebooks can let the non-firing minterms
//! outweigh the firing one.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{BipolarVector, Codebook, Matrix, RelationSignals, TransitionGroup};
use crate::{Error, Result};

/// One transition compiled to codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minterm {
    pub relation: BipolarVector,
    pub source: BipolarVector,
    pub target: BipolarVector,
}

/// Every weight and threshold the network installs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintermWeights {
    /// `[M × n]` minterm ← input layer. Row `i` is minterm `i`'s relation code.
    pub minterm_lower: Matrix,
    /// `[M × N]` minterm ← attractor layer. Row `i` is minterm `i`'s source code.
    pub minterm_upper: Matrix,
    /// Length `M`.
    pub minterm_thresholds: Vec<f64>,
    /// `[N × M]` attractor ← minterm layer. Column `i` is minterm `i`'s target code.
    pub attractor_lower: Matrix,
    /// Length `N`.
    pub attractor_thresholds: Vec<f64>,
}

impl MintermWeights {
    pub fn num_minterms(&self) -> usize {
        self.minterm_thresholds.len()
    }
}

/// Compile grouped transitions to minterms, group `g` under relation code `g`.
pub fn build_minterms(
    states: &Codebook,
    groups: &[TransitionGroup],
    relations: &RelationSignals,
) -> Result<Vec<Minterm>> {
    if groups.len() != relations.len() {
        return Err(Error::Dimension {
            context: "transition groups vs relation labels".into(),
            expected: relations.len(),
            got: groups.len(),
        });
    }

    let mut minterms = Vec::with_capacity(groups.iter().map(Vec::len).sum());
    for (g, transitions) in groups.iter().enumerate() {
        let relation = relations
            .code_at(g)
            .ok_or_else(|| Error::UnknownLabel(format!("relation #{g}")))?;
        if transitions.is_empty() {
            warn!(relation = g, "relation has no transitions");
        }
        for t in transitions {
            minterms.push(Minterm {
                relation: relation.clone(),
                source: states.require(&t.source)?.clone(),
                target: states.require(&t.target)?.clone(),
            });
        }
    }

    if minterms.is_empty() {
        return Err(Error::EmptyInput("transition table has no transitions".into()));
    }
    Ok(minterms)
}

/// Derive all weights and thresholds from compiled minterms.
pub fn synthesize(minterms: &[Minterm]) -> Result<MintermWeights> {
    let (m, n, state_dim) = validate(minterms)?;

    let mut minterm_lower = Matrix::zeros(m, n);
    let mut minterm_upper = Matrix::zeros(m, state_dim);
    let mut minterm_thresholds = Vec::with_capacity(m);
    let mut attractor_lower = Matrix::zeros(state_dim, m);

    for (i, mt) in minterms.iter().enumerate() {
        minterm_lower.set_row(i, &mt.relation);
        minterm_upper.set_row(i, &mt.source);
        minterm_thresholds.push(mt.source.norm_squared() + mt.relation.norm_squared() - 0.5);
        attractor_lower.set_column(i, &mt.target);
    }

    let attractor_thresholds = state_thresholds(minterms, state_dim);

    debug!(minterms = m, relation_dim = n, state_dim, "synthesized minterm weights");

    Ok(MintermWeights {
        minterm_lower,
        minterm_upper,
        minterm_thresholds,
        attractor_lower,
        attractor_thresholds,
    })
}

/// Average over minterms of `-Σ_{j≠i} target_j`.
fn state_thresholds(minterms: &[Minterm], state_dim: usize) -> Vec<f64> {
    let mut total = vec![0.0; state_dim];
    for mt in minterms {
        for (acc, c) in total.iter_mut().zip(mt.target.iter()) {
            *acc += c as f64;
        }
    }

    let mut thresholds = vec![0.0; state_dim];
    for mt in minterms {
        for ((acc, &sum), c) in thresholds.iter_mut().zip(&total).zip(mt.target.iter()) {
            *acc -= sum - c as f64;
        }
    }
    let m = minterms.len() as f64;
    for t in &mut thresholds {
        *t /= m;
    }
    thresholds
}

/// Returns `(M, n, N)`.
fn validate(minterms: &[Minterm]) -> Result<(usize, usize, usize)> {
    let first = minterms
        .first()
        .ok_or_else(|| Error::EmptyInput("empty minterm list".into()))?;
    let n = first.relation.dim();
    let state_dim = first.source.dim();

    for (i, mt) in minterms.iter().enumerate() {
        if mt.relation.dim() != n {
            return Err(Error::Dimension { context: format!("relation code of minterm {i}"), expected: n, got: mt.relation.dim() });
        }
        if mt.source.dim() != state_dim {
            return Err(Error::Dimension { context: format!("source code of minterm {i}"), expected: state_dim, got: mt.source.dim() });
        }
        if mt.target.dim() != state_dim {
            return Err(Error::Dimension { context: format!("target code of minterm {i}"), expected: state_dim, got: mt.target.dim() });
        }
    }
    Ok((minterms.len(), n, state_dim))
}
