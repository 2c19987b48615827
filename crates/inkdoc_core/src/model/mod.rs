//! Ink document model.
//!
//! # Responsibility
//! - Define the persisted document shape: stroke tree, resource records,
//!   provenance facts.
//! - Keep records plain data; cross-record links are ids, never references.
//!
//! # Invariants
//! - Every addressable entity is identified by a stable `Identifier`.
//! - Brushes are addressed by name/URI instead of id.

pub mod brush;
pub mod document;
pub mod environment;
pub mod geometry;
pub mod id;
pub mod input;
pub mod provenance;
pub mod sensor;
pub mod stroke;
pub mod style;
pub mod tree;
