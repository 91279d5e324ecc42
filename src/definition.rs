//! Declarative automaton definitions.
//!
//! A definition names the states and relations and lists the transitions.
//! State codes are not part of it: [`AutomatonDefinition::build`] draws them
//! from a [`CodebookGenerator`], so the same definition can be assembled at
//! any dimension.
//!
//! ```json
//! {
//!   "dimension": 100,
//!   "orthogonality_threshold": 0,
//!   "states": ["idle", "busy"],
//!   "relations": [
//!     { "label": "START", "transitions": [["idle", "busy"]] },
//!     { "label": "STOP",  "transitions": [["busy", "idle"]] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;
use crate::generator::{CodebookGenerator, RejectionSampler};
use crate::model::{Codebook, Transition, TransitionGroup};
use crate::network::AutomatonNetwork;
use crate::{Error, Result};

/// One relation category and the transitions it drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDefinition {
    pub label: String,
    #[serde(with = "pairs")]
    pub transitions: TransitionGroup,
}

/// States, relations and transitions, without codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomatonDefinition {
    /// Dimension `N` of every state code.
    pub dimension: usize,
    /// Bound on `|a · b|` between any two state codes.
    #[serde(default)]
    pub orthogonality_threshold: f64,
    pub states: Vec<String>,
    pub relations: Vec<RelationDefinition>,
}

impl AutomatonDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        let def: Self = serde_json::from_str(json)?;
        def.validate()?;
        Ok(def)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(Error::InvalidConfig("dimension must be positive".into()));
        }
        if self.states.is_empty() {
            return Err(Error::EmptyStore);
        }
        for (i, s) in self.states.iter().enumerate() {
            if self.states[..i].contains(s) {
                return Err(Error::DuplicateLabel(s.clone()));
            }
        }
        for rel in &self.relations {
            for t in &rel.transitions {
                for label in [&t.source, &t.target] {
                    if !self.states.contains(label) {
                        return Err(Error::UnknownLabel(label.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    /// Generate state codes with `generator` and assemble the network.
    pub fn build_with<G: CodebookGenerator>(
        &self,
        generator: &mut G,
        config: NetworkConfig,
    ) -> Result<AutomatonNetwork> {
        self.validate()?;
        let codes = generator.generate(self.dimension, self.states.len(), self.orthogonality_threshold)?;
        let states = Codebook::from_pairs(self.states.iter().cloned().zip(codes))?;
        let labels: Vec<&str> = self.relations.iter().map(|r| r.label.as_str()).collect();
        let groups = self.relations.iter().map(|r| r.transitions.clone()).collect();
        AutomatonNetwork::new(states, groups, &labels, config)
    }

    /// Assemble using rejection sampling over the configuration's random source.
    ///
    /// Codes come from a stream derived from the configured seed, separate
    /// from the one the network uses for initial layer states.
    pub fn build(&self, config: NetworkConfig) -> Result<AutomatonNetwork> {
        let codebook_config = NetworkConfig {
            seed: config.seed.map(|s| s.wrapping_add(CODEBOOK_SEED_OFFSET)),
            ..config.clone()
        };
        let mut sampler = RejectionSampler::new(codebook_config.rng());
        self.build_with(&mut sampler, config)
    }
}

const CODEBOOK_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Transitions as `[source, target]` pairs on the wire.
mod pairs {
    use super::Transition;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(transitions: &[Transition], s: S) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(&str, &str)> = transitions
            .iter()
            .map(|t| (t.source.as_str(), t.target.as_str()))
            .collect();
        pairs.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Transition>, D::Error> {
        let pairs: Vec<(String, String)> = Vec::deserialize(d)?;
        Ok(pairs.into_iter().map(Transition::from).collect())
    }
}
