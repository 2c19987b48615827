//! Resource repositories shared by strokes.
//!
//! # Responsibility
//! - Store brushes, sensor data and input configuration by stable key.
//! - Implement the add-if-absent contract document merging relies on.
//!
//! # Invariants
//! - Keys are unique per repository; entries are never updated in place.
//! - Enumeration is ordered by key so encoded output is deterministic.

pub mod brush_repo;
pub mod input_config;
pub mod repository;
