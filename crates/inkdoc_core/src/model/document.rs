//! Document aggregate: the unit of encode/decode.
//!
//! # Responsibility
//! - Own one stroke tree, every resource repository, and provenance facts.
//! - Check structural integrity of freshly decoded content.
//!
//! # Invariants
//! - Tree node ids are unique across the whole tree.
//! - No entity is addressed by the nil identifier.
//! - A document is not edited after it is serialized; the next save builds a
//!   new one.

use crate::model::id::{Identifier, NodeId};
use crate::model::provenance::ProvenanceGraph;
use crate::model::tree::StrokeTree;
use crate::repo::brush_repo::BrushRepository;
use crate::repo::input_config::InputConfiguration;
use crate::repo::repository::SensorDataRepository;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted ink document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub tree: StrokeTree,
    #[serde(default)]
    pub brushes: BrushRepository,
    #[serde(default)]
    pub sensor_data: SensorDataRepository,
    #[serde(default)]
    pub input_configuration: InputConfiguration,
    #[serde(default)]
    pub provenance: ProvenanceGraph,
    /// Free-form environment metadata (e.g. capture resolution).
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Structural integrity violations of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Same node id appears twice in the tree.
    DuplicateNodeId(NodeId),
    /// An entity of `kind` is keyed by the nil identifier.
    NilIdentifier { kind: &'static str },
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateNodeId(id) => write!(f, "duplicate tree node id: {id}"),
            Self::NilIdentifier { kind } => write!(f, "{kind} has nil identifier"),
        }
    }
}

impl Error for DocumentError {}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document whose root holds one empty main group.
    pub fn with_main_group() -> Self {
        Self {
            tree: StrokeTree::with_main_group(Identifier::new(), Identifier::new()),
            ..Self::default()
        }
    }

    /// Checks tree and repository keys for duplicates and nil ids.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if let Some(id) = self.tree.first_duplicate_id() {
            return Err(DocumentError::DuplicateNodeId(id));
        }
        let nil_checks: [(&'static str, bool); 7] = [
            ("tree node", self.tree.node_ids().iter().any(Identifier::is_nil)),
            ("sensor data", self.sensor_data.keys().any(Identifier::is_nil)),
            (
                "environment",
                self.input_configuration.environments.keys().any(Identifier::is_nil),
            ),
            (
                "input provider",
                self.input_configuration
                    .input_providers
                    .keys()
                    .any(Identifier::is_nil),
            ),
            (
                "input device",
                self.input_configuration.input_devices.keys().any(Identifier::is_nil),
            ),
            (
                "input context",
                self.input_configuration.input_contexts.keys().any(Identifier::is_nil),
            ),
            (
                "sensor context",
                self.input_configuration
                    .sensor_contexts
                    .keys()
                    .any(Identifier::is_nil),
            ),
        ];
        match nil_checks.into_iter().find(|(_, has_nil)| *has_nil) {
            Some((kind, _)) => Err(DocumentError::NilIdentifier { kind }),
            None => Ok(()),
        }
    }

    /// Number of stroke nodes anywhere in the tree.
    pub fn stroke_count(&self) -> usize {
        self.tree.stroke_nodes().count()
    }
}
