//! Codec error taxonomy and per-operation reports.
//!
//! # Invariants
//! - `FormatError` and `EncodeError` abort the operation and reach the caller.
//! - `ResolveWarning` and `StrokeSerializationError` are entity-scoped: they
//!   are logged, collected in a report, and never abort the operation.

use crate::model::brush::BrushKind;
use crate::model::document::DocumentError;
use crate::model::id::{Identifier, StrokeId};
use crate::model::stroke::StrokeValidationError;
use crate::repo::repository::RepoError;
use crate::scene::SceneError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FormatResult<T> = Result<T, FormatError>;
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Byte stream cannot be turned into a document.
#[derive(Debug)]
pub enum FormatError {
    /// Fewer bytes than the header or the declared body length.
    Truncated { expected: usize, actual: usize },
    /// Header does not start with the format magic.
    BadMagic([u8; 4]),
    /// Header declares a format version this build cannot read.
    UnsupportedVersion { found: u16, supported: u16 },
    /// Header carries flags this build does not understand.
    UnsupportedFlags(u16),
    /// Declared body length exceeds the configured limit.
    BodyTooLarge { len: usize, max: usize },
    /// Bytes follow the declared body.
    TrailingBytes(usize),
    /// Body checksum does not match the header.
    ChecksumMismatch { expected: u32, actual: u32 },
    /// Body is not a well-formed document.
    Body(serde_json::Error),
    /// Body parsed but violates document integrity.
    Structure(DocumentError),
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated { expected, actual } => {
                write!(f, "document truncated: expected {expected} bytes, got {actual}")
            }
            Self::BadMagic(got) => write!(f, "not an ink document: magic {got:?}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "unsupported document version {found}; supported version is {supported}"
            ),
            Self::UnsupportedFlags(flags) => write!(f, "unsupported header flags {flags:#06x}"),
            Self::BodyTooLarge { len, max } => {
                write!(f, "document body of {len} bytes exceeds limit of {max}")
            }
            Self::TrailingBytes(count) => {
                write!(f, "{count} unexpected bytes after document body")
            }
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "document checksum mismatch: expected {expected:#010x}, got {actual:#010x}"
            ),
            Self::Body(err) => write!(f, "malformed document body: {err}"),
            Self::Structure(err) => write!(f, "invalid document structure: {err}"),
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Body(err) => Some(err),
            Self::Structure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(value: serde_json::Error) -> Self {
        Self::Body(value)
    }
}

impl From<DocumentError> for FormatError {
    fn from(value: DocumentError) -> Self {
        Self::Structure(value)
    }
}

/// Save failed as a whole. Nothing complete was written.
#[derive(Debug)]
pub enum EncodeError {
    /// Sink or temporary-file failure.
    Io(std::io::Error),
    /// Document could not be serialized.
    Serialize(serde_json::Error),
    /// Body exceeds the 32-bit length field.
    BodyTooLarge(usize),
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to write document: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
            Self::BodyTooLarge(len) => write!(f, "document body of {len} bytes is too large"),
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::BodyTooLarge(_) => None,
        }
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// What kind of record a dangling reference pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Brush,
    SensorData,
    InputContext,
    SensorContext,
}

/// Non-fatal problem met while resolving one stroke node.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveWarning {
    /// A cross-repository reference cannot be followed.
    MissingReference {
        stroke_id: StrokeId,
        kind: ReferenceKind,
        /// Missing key: an id, or the brush name.
        key: String,
    },
    /// Brush exists but is not vector kind; stroke skipped.
    UnsupportedBrushKind {
        stroke_id: StrokeId,
        brush: String,
        kind: BrushKind,
    },
    /// Stroke record fails validation; stroke skipped.
    InvalidStroke {
        stroke_id: StrokeId,
        reason: StrokeValidationError,
    },
    /// Scene refused the resolved stroke; stroke skipped.
    Rejected {
        stroke_id: StrokeId,
        reason: SceneError,
    },
}

impl ResolveWarning {
    pub fn missing(stroke_id: StrokeId, kind: ReferenceKind, key: impl Display) -> Self {
        Self::MissingReference {
            stroke_id,
            kind,
            key: key.to_string(),
        }
    }

    pub fn stroke_id(&self) -> StrokeId {
        match self {
            Self::MissingReference { stroke_id, .. }
            | Self::UnsupportedBrushKind { stroke_id, .. }
            | Self::InvalidStroke { stroke_id, .. }
            | Self::Rejected { stroke_id, .. } => *stroke_id,
        }
    }

    /// Whether the stroke was left out of the scene.
    pub fn skips_stroke(&self) -> bool {
        match self {
            Self::MissingReference { kind, .. } => *kind == ReferenceKind::Brush,
            Self::UnsupportedBrushKind { .. }
            | Self::InvalidStroke { .. }
            | Self::Rejected { .. } => true,
        }
    }
}

impl Display for ResolveWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingReference {
                stroke_id,
                kind,
                key,
            } => write!(f, "stroke {stroke_id}: missing {kind:?} `{key}`"),
            Self::UnsupportedBrushKind {
                stroke_id,
                brush,
                kind,
            } => write!(f, "stroke {stroke_id}: brush `{brush}` is {kind:?}, not vector"),
            Self::InvalidStroke { stroke_id, reason } => {
                write!(f, "stroke {stroke_id}: invalid stroke: {reason}")
            }
            Self::Rejected { stroke_id, reason } => {
                write!(f, "stroke {stroke_id}: rejected by scene: {reason}")
            }
        }
    }
}

impl Error for ResolveWarning {}

/// One stroke could not be written and was dropped from the output.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeSerializationError {
    Invalid {
        stroke_id: StrokeId,
        reason: StrokeValidationError,
    },
    /// Stroke brush is missing from the scene arena.
    MissingBrush { stroke_id: StrokeId, brush: String },
    /// Output brush repository refused the stroke's brush.
    InvalidBrush { stroke_id: StrokeId, reason: RepoError },
    /// Persisted form carries another id than the runtime stroke.
    IdMismatch {
        stroke_id: StrokeId,
        persisted_id: Identifier,
    },
}

impl StrokeSerializationError {
    pub fn stroke_id(&self) -> StrokeId {
        match self {
            Self::Invalid { stroke_id, .. }
            | Self::MissingBrush { stroke_id, .. }
            | Self::InvalidBrush { stroke_id, .. }
            | Self::IdMismatch { stroke_id, .. } => *stroke_id,
        }
    }
}

impl Display for StrokeSerializationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { stroke_id, reason } => {
                write!(f, "stroke {stroke_id} cannot be serialized: {reason}")
            }
            Self::MissingBrush { stroke_id, brush } => {
                write!(f, "stroke {stroke_id} references unknown brush `{brush}`")
            }
            Self::InvalidBrush { stroke_id, reason } => {
                write!(f, "stroke {stroke_id} brush rejected: {reason}")
            }
            Self::IdMismatch {
                stroke_id,
                persisted_id,
            } => write!(
                f,
                "stroke {stroke_id} carries persisted form of {persisted_id}"
            ),
        }
    }
}

impl Error for StrokeSerializationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid { reason, .. } => Some(reason),
            Self::InvalidBrush { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Outcome of resolving a decoded document into a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    /// Stroke nodes visited.
    pub stroke_nodes: usize,
    /// Runtime strokes inserted into the scene.
    pub resolved: usize,
    pub warnings: Vec<ResolveWarning>,
}

impl DecodeReport {
    pub fn skipped(&self) -> usize {
        self.stroke_nodes - self.resolved
    }
}

/// Outcome of building a document from a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeReport {
    /// Strokes written to the main group.
    pub written: usize,
    pub dropped: Vec<StrokeSerializationError>,
    /// Input entities carried over from the prior document.
    pub merged_entities: usize,
}
