//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate codec and scene calls into load/edit/save APIs.
//! - Keep presentation layers decoupled from framing and merge details.

pub mod session;
