//! # hopfield-automaton: Finite-State Automata as Associative Memory
//!
//! A finite-state automaton compiled into a three-layer recurrent network.
//! Automaton states are attractors of a Hopfield layer; each transition is a
//! "minterm" unit that fires only when its relation and its source state are
//! both present.
//!
//! ## Design Principles
//!
//! 1. **Synthesis, not training**: every weight is derived in closed form from
//!    the transition table. There is no learning loop.
//! 2. **Bipolar everywhere**: layer states are ±1 vectors; zero input maps to +1.
//! 3. **Arena-owned layers**: layers link to neighbors by [`LayerId`], never by
//!    reference, so the minterm ↔ attractor cycle has no ownership ambiguity.
//! 4. **Explicit configuration**: the random source and relaxation limits come
//!    from [`NetworkConfig`], never from process-global state.
//!
//! ## Quick Start
//!
//! ```rust
//! use hopfield_automaton::{AutomatonNetwork, BipolarVector, Codebook, NetworkConfig, group};
//!
//! # fn main() -> hopfield_automaton::Result<()> {
//! let a = BipolarVector::new(vec![1, 1, 1, 1, 1, 1, 1, 1])?;
//! let b = BipolarVector::new(vec![1, 1, 1, 1, -1, -1, -1, -1])?;
//! let states = Codebook::from_pairs([("A", a), ("B", b)])?;
//!
//! let mut net = AutomatonNetwork::new(
//!     states,
//!     vec![group([("A", "B")]), group([("B", "A")])],
//!     &["GO", "BACK"],
//!     NetworkConfig::seeded(7),
//! )?;
//!
//! assert_eq!(net.step("go")?.recall.label(), Some("B"));
//! assert_eq!(net.step("BACK")?.recall.label(), Some("A"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! | Layer | Size | Lower neighbor | Upper neighbor |
//! |-------|------|----------------|----------------|
//! | input | relations `n` | none | none |
//! | minterm | transitions `M` | input | attractor |
//! | attractor | state dimension `N` | minterm | none |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod generator;
pub mod layer;
pub mod synthesis;
pub mod network;
pub mod definition;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    BipolarVector, Matrix, Codebook, RelationSignals,
    Transition, TransitionGroup, group, sign,
};

// ============================================================================
// Re-exports: Layers
// ============================================================================

pub use layer::{
    Layer, LayerId, LayerKind, LayerArena,
    AttractorMemory, MemoryInfo, Recall, Relaxation, UNRECOGNIZED,
};

// ============================================================================
// Re-exports: Assembly
// ============================================================================

pub use config::{NetworkConfig, RelaxConfig};
pub use generator::{CodebookGenerator, RejectionSampler, are_almost_orthogonal};
pub use synthesis::{Minterm, MintermWeights};
pub use network::{AutomatonNetwork, NetworkStats, StepReport};
pub use definition::{AutomatonDefinition, RelationDefinition};
pub use export::{NetworkSnapshot, export_snapshot, export_transition_table};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Dimension error in {context}: expected {expected}, got {got}")]
    Dimension { context: String, expected: usize, got: usize },

    #[error("Shape error in {context}: expected {expected:?}, got {got:?}")]
    Shape { context: String, expected: (usize, usize), got: (usize, usize) },

    #[error("Type error: {context} must be finite floating-point values")]
    NonFinite { context: String },

    #[error("Component {index} is {value}, expected +1 or -1")]
    NotBipolar { index: usize, value: f64 },

    #[error("Pattern store is empty")]
    EmptyStore,

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerId),

    #[error("Unknown relation '{label}', expected one of {known:?}")]
    UnknownRelation { label: String, known: Vec<String> },

    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("Layer has no attractor memory")]
    NotAttractor,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Codebook generation gave up after {attempts} attempts")]
    GenerationExhausted { attempts: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
