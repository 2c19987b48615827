//! Identifier shared by every addressable document entity.
//!
//! # Responsibility
//! - Wrap a 128-bit UUID behind an opaque, copyable key type.
//! - Provide the canonical string form used in provenance subjects.
//!
//! # Invariants
//! - Freshly generated identifiers are random (v4) and never reused.
//! - The nil UUID is never a valid entity id.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque unique key for strokes, tree nodes, sensor data and input entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(Uuid);

/// Stroke id. A stroke node shares the id of the stroke it holds.
pub type StrokeId = Identifier;
/// Stroke tree node id.
pub type NodeId = Identifier;
/// Sensor data block id.
pub type SensorDataId = Identifier;

impl Identifier {
    /// Generates a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID. Nil values are rejected.
    pub fn from_uuid(value: Uuid) -> Result<Self, IdentifierError> {
        if value.is_nil() {
            return Err(IdentifierError::Nil);
        }
        Ok(Self(value))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Canonical lowercase hyphenated form.
    pub fn to_uuid_string(&self) -> String {
        self.0.hyphenated().to_string()
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = Uuid::parse_str(value.trim())
            .map_err(|_| IdentifierError::Malformed(value.to_string()))?;
        Self::from_uuid(parsed)
    }
}

/// Identifier parse/construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Input is not a UUID string.
    Malformed(String),
    /// Nil UUID cannot address an entity.
    Nil,
}

impl Display for IdentifierError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "malformed identifier: `{value}`"),
            Self::Nil => write!(f, "nil identifier is not allowed"),
        }
    }
}

impl Error for IdentifierError {}
