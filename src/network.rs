//! # Automaton Network
//!
//! Three layers, wired once at construction:
//!
//! ```text
//!            ┌──────────── upper ────────────┐
//!            ▼                               │
//!   input ──lower──▶ minterm ──lower──▶ attractor
//!  (n units)        (M units)           (N units, Hopfield)
//! ```
//!
//! One [`step`](AutomatonNetwork::step): load a relation code into the input
//! layer, apical-update the minterm layer, apical-update the attractor layer,
//! relax it, then report the recalled state.
//!
//! Layer state is mutated in place. Callers that share a network across
//! threads must serialize calls to `step`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::NetworkConfig;
use crate::layer::{Layer, LayerArena, LayerId, MemoryInfo, Recall};
use crate::model::{BipolarVector, Codebook, Matrix, RelationSignals, TransitionGroup};
use crate::synthesis::{self, MintermWeights};
use crate::{Error, Result};

/// What one step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Configured spelling of the relation that was applied.
    pub relation: String,
    pub recall: Recall,
    /// Minterm units at `+1` after the minterm update.
    pub active_minterms: usize,
    pub iterations: usize,
    /// `false` when relaxation hit its iteration cap.
    pub converged: bool,
}

/// Size and capacity summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub num_states: usize,
    pub state_dimension: usize,
    pub num_minterms: usize,
    pub num_relations: usize,
    pub memory: MemoryInfo,
    pub relations: Vec<String>,
}

/// A finite-state automaton realized as an associative-memory network.
#[derive(Debug, Clone)]
pub struct AutomatonNetwork {
    config: NetworkConfig,
    states: Codebook,
    relations: RelationSignals,
    transitions: Vec<TransitionGroup>,
    weights: MintermWeights,
    arena: LayerArena,
    input: LayerId,
    minterm: LayerId,
    attractor: LayerId,
}

impl AutomatonNetwork {
    /// Assemble the network.
    ///
    /// `transitions[g]` holds the transitions taken under `relation_labels[g]`.
    pub fn new<S: AsRef<str>>(
        states: Codebook,
        transitions: Vec<TransitionGroup>,
        relation_labels: &[S],
        config: NetworkConfig,
    ) -> Result<Self> {
        config.validate()?;
        if transitions.len() != relation_labels.len() {
            return Err(Error::Dimension {
                context: "transition groups vs relation labels".into(),
                expected: relation_labels.len(),
                got: transitions.len(),
            });
        }
        let (initial_label, initial) = states
            .first()
            .map(|(l, v)| (l.to_string(), v.clone()))
            .ok_or(Error::EmptyStore)?;
        let dim = initial.dim();
        if let Some((label, v)) = states.iter().find(|(_, v)| v.dim() != dim) {
            return Err(Error::Dimension {
                context: format!("state '{label}'"),
                expected: dim,
                got: v.dim(),
            });
        }

        let relations = RelationSignals::anti_identity(relation_labels)?;
        let minterms = synthesis::build_minterms(&states, &transitions, &relations)?;
        let weights = synthesis::synthesize(&minterms)?;

        let mut rng = config.rng();
        let mut arena = LayerArena::new();
        let input = arena.insert(Layer::new(relations.len(), &mut rng)?);
        let minterm = arena.insert(Layer::new(weights.num_minterms(), &mut rng)?);
        let mut attractor_layer = Layer::attractor(dim, &mut rng)?;
        if let Some(memory) = attractor_layer.memory_mut() {
            memory.add_states(states.iter().map(|(l, v)| (l, v.clone())))?;
        }
        let attractor = arena.insert(attractor_layer);

        arena.link_lower(minterm, input)?;
        arena.link_upper(minterm, attractor)?;
        arena.set_weights(
            minterm,
            weights.minterm_lower.clone(),
            weights.minterm_upper.clone(),
            weights.minterm_thresholds.clone(),
        )?;

        arena.link_lower(attractor, minterm)?;
        arena.set_weights(
            attractor,
            weights.attractor_lower.clone(),
            Matrix::empty(),
            weights.attractor_thresholds.clone(),
        )?;
        arena.set_state(attractor, initial)?;

        info!(
            states = states.len(),
            relations = relations.len(),
            minterms = weights.num_minterms(),
            dim,
            initial = %initial_label,
            "automaton network assembled"
        );

        Ok(Self {
            config,
            states,
            relations,
            transitions,
            weights,
            arena,
            input,
            minterm,
            attractor,
        })
    }

    /// Apply one relation and report the state the network settles into.
    ///
    /// The relation label is matched case-insensitively. An unknown label
    /// fails before any layer is touched.
    pub fn step(&mut self, relation: &str) -> Result<StepReport> {
        let (_, stored, code) = self
            .relations
            .resolve(relation)
            .ok_or_else(|| Error::UnknownRelation {
                label: relation.to_string(),
                known: self.relations.labels(),
            })?;
        let stored = stored.to_string();
        let code = code.clone();

        self.arena.set_state(self.input, code)?;
        let minterm_state = self.arena.apical_update(self.minterm)?;
        self.arena.apical_update(self.attractor)?;
        let relaxation = self.arena.relax(self.attractor, &self.config.relax)?;

        let report = StepReport {
            relation: stored,
            active_minterms: minterm_state.active_count(),
            recall: relaxation.recall,
            iterations: relaxation.iterations,
            converged: relaxation.converged,
        };
        debug!(
            relation = %report.relation,
            active_minterms = report.active_minterms,
            iterations = report.iterations,
            converged = report.converged,
            recall = %report.recall,
            "step"
        );
        Ok(report)
    }

    /// Recall the attractor layer's current state without stepping.
    pub fn current(&self) -> Result<Recall> {
        self.arena[self.attractor].recall(self.config.relax.recall_threshold)
    }

    /// Put the attractor layer on a stored state.
    pub fn reset_to(&mut self, label: &str) -> Result<()> {
        let v = self.states.require(label)?.clone();
        self.arena.set_state(self.attractor, v)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn states(&self) -> &Codebook {
        &self.states
    }

    pub fn relations(&self) -> &RelationSignals {
        &self.relations
    }

    pub fn transitions(&self) -> &[TransitionGroup] {
        &self.transitions
    }

    pub fn weights(&self) -> &MintermWeights {
        &self.weights
    }

    pub fn arena(&self) -> &LayerArena {
        &self.arena
    }

    pub fn input_layer(&self) -> &Layer {
        &self.arena[self.input]
    }

    pub fn minterm_layer(&self) -> &Layer {
        &self.arena[self.minterm]
    }

    pub fn attractor_layer(&self) -> &Layer {
        &self.arena[self.attractor]
    }

    /// Current states of the input, minterm and attractor layers.
    pub fn layer_states(&self) -> [BipolarVector; 3] {
        [
            self.input_layer().state().clone(),
            self.minterm_layer().state().clone(),
            self.attractor_layer().state().clone(),
        ]
    }

    pub fn stats(&self) -> NetworkStats {
        let memory = self
            .attractor_layer()
            .memory()
            .map(|m| m.info())
            .unwrap_or_default();
        NetworkStats {
            num_states: self.states.len(),
            state_dimension: self.attractor_layer().size(),
            num_minterms: self.weights.num_minterms(),
            num_relations: self.relations.len(),
            memory,
            relations: self.relations.labels(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::group;
    use pretty_assertions::assert_eq;

    fn v(c: &[i8]) -> BipolarVector {
        BipolarVector::new(c.to_vec()).unwrap()
    }

    fn two_states() -> Codebook {
        Codebook::from_pairs([
            ("A", v(&[1, 1, 1, 1, 1, 1, 1, 1])),
            ("B", v(&[1, 1, 1, 1, -1, -1, -1, -1])),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_empty_states() {
        let err = AutomatonNetwork::new(Codebook::new(), vec![group([("A", "B")])], &["GO"], NetworkConfig::seeded(1))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyStore));
    }

    #[test]
    fn rejects_mismatched_group_count() {
        let err = AutomatonNetwork::new(two_states(), vec![group([("A", "B")])], &["GO", "BACK"], NetworkConfig::seeded(1))
            .unwrap_err();
        assert!(matches!(err, Error::Dimension { expected: 2, got: 1, .. }));
    }

    #[test]
    fn rejects_mixed_state_dimensions_from_deserialized_codebook() {
        let book: Codebook = serde_json::from_str(r#"[["A",[1,1]],["B",[1,-1,1]]]"#).unwrap();
        let err = AutomatonNetwork::new(book, vec![group([("A", "B")])], &["GO"], NetworkConfig::seeded(1))
            .unwrap_err();
        assert!(matches!(err, Error::Dimension { expected: 2, got: 3, .. }));
    }

    #[test]
    fn wiring_matches_topology() {
        let net = AutomatonNetwork::new(
            two_states(),
            vec![group([("A", "B")]), group([("B", "A"), ("A", "A")])],
            &["GO", "BACK"],
            NetworkConfig::seeded(1),
        )
        .unwrap();
        assert_eq!(net.input_layer().size(), 2);
        assert_eq!(net.minterm_layer().size(), 3);
        assert_eq!(net.attractor_layer().size(), 8);
        assert_eq!(net.minterm_layer().lower(), Some(LayerId(0)));
        assert_eq!(net.minterm_layer().upper(), Some(LayerId(2)));
        assert_eq!(net.attractor_layer().lower(), Some(LayerId(1)));
        assert_eq!(net.attractor_layer().upper(), None);
        assert_eq!(net.attractor_layer().state(), two_states().get("A").unwrap());
        assert_eq!(net.current().unwrap().label(), Some("A"));
    }

    #[test]
    fn steps_and_resets() {
        let mut net = AutomatonNetwork::new(
            two_states(),
            vec![group([("A", "B")]), group([("B", "A")])],
            &["GO", "BACK"],
            NetworkConfig::seeded(1),
        )
        .unwrap();

        let report = net.step("go").unwrap();
        assert_eq!(report.relation, "GO");
        assert_eq!(report.recall.label(), Some("B"));
        assert_eq!(report.active_minterms, 1);
        assert!(report.converged);

        assert_eq!(net.step("BACK").unwrap().recall.label(), Some("A"));

        net.reset_to("B").unwrap();
        assert_eq!(net.current().unwrap().label(), Some("B"));
        assert!(matches!(net.reset_to("Z"), Err(Error::UnknownLabel(_))));
    }

    #[test]
    fn stats_summarize_sizes() {
        let net = AutomatonNetwork::new(two_states(), vec![group([("A", "B")])], &["GO"], NetworkConfig::seeded(1))
            .unwrap();
        let stats = net.stats();
        assert_eq!(stats.num_states, 2);
        assert_eq!(stats.state_dimension, 8);
        assert_eq!(stats.num_minterms, 1);
        assert_eq!(stats.num_relations, 1);
        assert_eq!(stats.memory.num_patterns, 2);
        assert_eq!(stats.relations, vec!["GO".to_string()]);
    }
}
