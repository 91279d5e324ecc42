//! Codebooks: ordered label → bipolar vector maps.
//!
//! Iteration order is insertion order. Recall ties and the network's
//! initial attractor both depend on it, so it must stay deterministic.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::BipolarVector;
use crate::{Error, Result};

/// Ordered map from label to a bipolar vector of one shared dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, BipolarVector)>", into = "Vec<(String, BipolarVector)>")]
pub struct Codebook {
    entries: Vec<(String, BipolarVector)>,
    index: HashMap<String, usize>,
}

impl Codebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(label, vector)` pairs. Later duplicates replace earlier ones.
    pub fn from_pairs<I, L>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, BipolarVector)>,
        L: Into<String>,
    {
        let mut book = Self::new();
        for (label, v) in pairs {
            book.insert(label, v)?;
        }
        Ok(book)
    }

    /// Dimension shared by every entry, or `None` while empty.
    pub fn dim(&self) -> Option<usize> {
        self.entries.first().map(|(_, v)| v.dim())
    }

    /// Insert or replace. Replacing keeps the original position.
    pub fn insert(&mut self, label: impl Into<String>, v: BipolarVector) -> Result<()> {
        let label = label.into();
        if let Some(dim) = self.dim() {
            if v.dim() != dim {
                return Err(Error::Dimension {
                    context: format!("codebook entry '{label}'"),
                    expected: dim,
                    got: v.dim(),
                });
            }
        }
        match self.index.get(&label) {
            Some(&i) => self.entries[i].1 = v,
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push((label, v));
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, label: &str) -> Result<BipolarVector> {
        let i = self
            .index
            .remove(label)
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))?;
        let (_, v) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Ok(v)
    }

    pub fn get(&self, label: &str) -> Option<&BipolarVector> {
        self.index.get(label).map(|&i| &self.entries[i].1)
    }

    /// Like [`get`](Self::get) but fails with `UnknownLabel`.
    pub fn require(&self, label: &str) -> Result<&BipolarVector> {
        self.get(label).ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }

    /// Case-insensitive lookup returning the entry's position and stored label.
    ///
    /// Labels are compared by their Unicode uppercase forms.
    pub fn find_ignore_case(&self, label: &str) -> Option<(usize, &str)> {
        let folded = label.to_uppercase();
        self.entries
            .iter()
            .position(|(l, _)| l.to_uppercase() == folded)
            .map(|i| (i, self.entries[i].0.as_str()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(l, _)| l.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BipolarVector)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }

    pub fn vectors(&self) -> impl Iterator<Item = &BipolarVector> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn entry_at(&self, i: usize) -> Option<(&str, &BipolarVector)> {
        self.entries.get(i).map(|(l, v)| (l.as_str(), v))
    }

    pub fn first(&self) -> Option<(&str, &BipolarVector)> {
        self.entry_at(0)
    }
}

impl From<Vec<(String, BipolarVector)>> for Codebook {
    fn from(entries: Vec<(String, BipolarVector)>) -> Self {
        // Deserialized input skips the dimension check; assembly re-validates.
        let mut book = Self::new();
        for (label, v) in entries {
            match book.index.get(&label) {
                Some(&i) => book.entries[i].1 = v,
                None => {
                    book.index.insert(label.clone(), book.entries.len());
                    book.entries.push((label, v));
                }
            }
        }
        book
    }
}

impl From<Codebook> for Vec<(String, BipolarVector)> {
    fn from(book: Codebook) -> Self {
        book.entries
    }
}

// ============================================================================
// Relation signals
// ============================================================================

/// Relation-category codes.
///
/// For `n` categories the codes form the "anti-correlated identity":
/// code `i` has `+1` at position `i` and `-1` everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationSignals {
    codes: Codebook,
}

impl RelationSignals {
    /// Assign anti-identity codes to `labels`, in order.
    ///
    /// Labels are matched case-insensitively at lookup, so two labels that
    /// differ only in case are rejected.
    pub fn anti_identity<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let n = labels.len();
        let mut codes = Codebook::new();
        for (i, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            if codes.find_ignore_case(label).is_some() {
                return Err(Error::DuplicateLabel(label.to_string()));
            }
            let components = (0..n).map(|j| if i == j { 1 } else { -1 }).collect();
            codes.insert(label, BipolarVector::new(components)?)?;
        }
        Ok(Self { codes })
    }

    /// Case-insensitive lookup: position, stored label and code.
    pub fn resolve(&self, label: &str) -> Option<(usize, &str, &BipolarVector)> {
        let (i, stored) = self.codes.find_ignore_case(label)?;
        self.codes.entry_at(i).map(|(_, v)| (i, stored, v))
    }

    pub fn code_at(&self, i: usize) -> Option<&BipolarVector> {
        self.codes.entry_at(i).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.codes.labels()
    }

    pub fn codebook(&self) -> &Codebook {
        &self.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(c: &[i8]) -> BipolarVector {
        BipolarVector::new(c.to_vec()).unwrap()
    }

    #[test]
    fn preserves_insertion_order_and_replaces_in_place() {
        let mut book = Codebook::new();
        book.insert("b", v(&[1, 1])).unwrap();
        book.insert("a", v(&[-1, 1])).unwrap();
        book.insert("b", v(&[-1, -1])).unwrap();
        assert_eq!(book.labels(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(book.get("b"), Some(&v(&[-1, -1])));
    }

    #[test]
    fn rejects_mixed_dimensions() {
        let mut book = Codebook::new();
        book.insert("a", v(&[1, 1, 1])).unwrap();
        let err = book.insert("b", v(&[1, 1])).unwrap_err();
        assert!(matches!(err, Error::Dimension { expected: 3, got: 2, .. }));
    }

    #[test]
    fn remove_reindexes() {
        let mut book =
            Codebook::from_pairs([("a", v(&[1, 1])), ("b", v(&[1, -1])), ("c", v(&[-1, 1]))]).unwrap();
        book.remove("a").unwrap();
        assert_eq!(book.get("c"), Some(&v(&[-1, 1])));
        assert_eq!(book.first().map(|(l, _)| l), Some("b"));
        assert!(matches!(book.remove("a"), Err(Error::UnknownLabel(_))));
    }

    #[test]
    fn anti_identity_codes() {
        let signals = RelationSignals::anti_identity(&["FATHER_OF", "LIKES", "BULLIES"]).unwrap();
        assert_eq!(signals.code_at(0), Some(&v(&[1, -1, -1])));
        assert_eq!(signals.code_at(1), Some(&v(&[-1, 1, -1])));
        assert_eq!(signals.code_at(2), Some(&v(&[-1, -1, 1])));
        // Every pair of distinct codes overlaps by n - 4.
        assert_eq!(signals.code_at(0).unwrap().dot(signals.code_at(2).unwrap()), 3 - 4);
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let signals = RelationSignals::anti_identity(&["LIKES", "BULLIES"]).unwrap();
        let (i, stored, _) = signals.resolve("bullies").unwrap();
        assert_eq!((i, stored), (1, "BULLIES"));
        assert!(signals.resolve("hates").is_none());
    }

    #[test]
    fn case_colliding_relations_are_rejected() {
        let err = RelationSignals::anti_identity(&["Likes", "LIKES"]).unwrap_err();
        assert!(matches!(err, Error::DuplicateLabel(_)));
    }

    #[test]
    fn case_folding_covers_non_ascii_labels() {
        let signals = RelationSignals::anti_identity(&["ärger", "Straße"]).unwrap();
        let (i, stored, _) = signals.resolve("ÄRGER").unwrap();
        assert_eq!((i, stored), (0, "ärger"));
        assert_eq!(signals.resolve("STRASSE").map(|(i, _, _)| i), Some(1));

        let err = RelationSignals::anti_identity(&["Ärger", "äRGER"]).unwrap_err();
        assert!(matches!(err, Error::DuplicateLabel(l) if l == "äRGER"));
    }
}
