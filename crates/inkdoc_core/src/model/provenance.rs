//! Append-only provenance facts attached to a document.

use serde::{Deserialize, Serialize};

pub const PREDICATE_CREATED: &str = "created";
pub const PREDICATE_AUTHOR: &str = "author";

/// One (subject, predicate, value) fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub value: String,
}

/// Set of facts in append order. Entries are never removed or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvenanceGraph {
    triples: Vec<Triple>,
}

impl ProvenanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fact. An identical fact already present is not repeated.
    pub fn add(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let triple = Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            value: value.into(),
        };
        if self.triples.contains(&triple) {
            return false;
        }
        self.triples.push(triple);
        true
    }

    /// Values recorded for `subject` + `predicate`, oldest first.
    pub fn values<'a>(&'a self, subject: &'a str, predicate: &'a str) -> impl Iterator<Item = &'a str> {
        self.triples
            .iter()
            .filter(move |t| t.subject == subject && t.predicate == predicate)
            .map(|t| t.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ProvenanceGraph;

    #[test]
    fn add_keeps_append_order_and_skips_exact_repeats() {
        let mut graph = ProvenanceGraph::new();
        assert!(graph.add("root", "author", "inkdoc"));
        assert!(graph.add("root", "created", "1"));
        assert!(!graph.add("root", "author", "inkdoc"));
        assert!(graph.add("root", "author", "other"));

        assert_eq!(graph.len(), 3);
        let authors: Vec<_> = graph.values("root", "author").collect();
        assert_eq!(authors, vec!["inkdoc", "other"]);
    }
}
