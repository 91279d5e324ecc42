//! JSON snapshot export: dump an assembled network for inspection.
//!
//! ```text
//! AutomatonNetwork → export_snapshot() → JSON document
//!   { config, states, relations, transitions, weights, layer_states }
//! ```
//!
//! The snapshot is diagnostic. There is no import path; rebuild a network
//! from its definition instead.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;
use crate::model::{BipolarVector, Codebook, Transition};
use crate::network::{AutomatonNetwork, NetworkStats};
use crate::synthesis::MintermWeights;
use crate::Result;

/// Transitions of one relation, with the code they were compiled under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub label: String,
    pub code: BipolarVector,
    pub transitions: Vec<Transition>,
}

/// Serializable view of everything an assembled network holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub config: NetworkConfig,
    pub stats: NetworkStats,
    pub states: Codebook,
    pub relations: Vec<RelationRecord>,
    pub weights: MintermWeights,
    /// Current input, minterm and attractor states.
    pub layer_states: Vec<BipolarVector>,
}

impl NetworkSnapshot {
    pub fn capture(network: &AutomatonNetwork) -> Self {
        let relations = network
            .relations()
            .codebook()
            .iter()
            .zip(network.transitions())
            .map(|((label, code), transitions)| RelationRecord {
                label: label.to_string(),
                code: code.clone(),
                transitions: transitions.clone(),
            })
            .collect();

        Self {
            config: network.config().clone(),
            stats: network.stats(),
            states: network.states().clone(),
            relations,
            weights: network.weights().clone(),
            layer_states: network.layer_states().to_vec(),
        }
    }
}

/// Write a pretty-printed JSON snapshot of `network`.
pub fn export_snapshot(network: &AutomatonNetwork, writer: &mut dyn Write) -> Result<()> {
    let snapshot = NetworkSnapshot::capture(network);
    serde_json::to_writer_pretty(&mut *writer, &snapshot)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the transition table as plain text, one relation per block.
pub fn export_transition_table(network: &AutomatonNetwork, writer: &mut dyn Write) -> Result<()> {
    let stats = network.stats();
    writeln!(writer, "# states: {}", network.states().labels().join(", "))?;
    writeln!(writer, "# dimension: {}", stats.state_dimension)?;
    writeln!(writer, "# minterms: {}", stats.num_minterms)?;

    for (label, transitions) in network.relations().labels().iter().zip(network.transitions()) {
        writeln!(writer)?;
        writeln!(writer, "[{label}]")?;
        for t in transitions {
            writeln!(writer, "{t}")?;
        }
    }
    Ok(())
}
