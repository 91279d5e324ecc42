//! Symbolic transition table entries.

use serde::{Deserialize, Serialize};

/// One `source → target` edge of the automaton, under some relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub source: String,
    pub target: String,
}

impl Transition {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into() }
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for Transition {
    fn from((source, target): (S, T)) -> Self {
        Self::new(source, target)
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// All transitions that share one relation category.
pub type TransitionGroup = Vec<Transition>;

/// Convenience: build a group from `(source, target)` pairs.
pub fn group<S, T>(pairs: impl IntoIterator<Item = (S, T)>) -> TransitionGroup
where
    S: Into<String>,
    T: Into<String>,
{
    pairs.into_iter().map(Transition::from).collect()
}
