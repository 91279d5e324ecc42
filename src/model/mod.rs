//! # Network Data Model
//!
//! Plain data shared by every layer: bipolar vectors, dense weight
//! matrices, codebooks and the symbolic transition table.
//!
//! Design rule: this module is pure data. No layer wiring, no relaxation,
//! no logging.

pub mod bipolar;
pub mod matrix;
pub mod codebook;
pub mod transition;

pub use bipolar::{BipolarVector, sign};
pub use matrix::Matrix;
pub use codebook::{Codebook, RelationSignals};
pub use transition::{Transition, TransitionGroup, group};
