//! Ink document core.
//! Persists and reloads freehand-drawing sessions as self-contained documents.

pub mod codec;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scene;
pub mod service;

pub use codec::{
    DecodeOptions, DecodeReport, EncodeError, EncodeOptions, EncodeReport, FormatError,
    ResolveWarning, StrokeSerializationError,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::Document;
pub use model::id::{Identifier, StrokeId};
pub use scene::{NewStroke, RuntimeStroke, Scene, SharedScene, SpatialIndex, StrokePresenter};
pub use service::session::InkSession;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
