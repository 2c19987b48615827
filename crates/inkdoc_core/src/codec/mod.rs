//! Ink document codec.
//!
//! # Responsibility
//! - Frame documents as checksummed byte buffers.
//! - Decode buffers and resolve strokes into a scene.
//! - Encode a scene back into a buffer, merging prior input definitions.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod options;

pub use decoder::{decode, resolve_into_scene, ResolvedStroke, Resolver};
pub use encoder::{build_document, encode, encode_to_writer, write_atomic};
pub use error::{
    DecodeReport, EncodeError, EncodeReport, EncodeResult, FormatError, FormatResult,
    ReferenceKind, ResolveWarning, StrokeSerializationError,
};
pub use options::{DecodeOptions, EncodeOptions};
