//! Load/edit/save session over one shared scene.
//!
//! # Responsibility
//! - Decode a document into the scene and remember it as the merge base.
//! - Route stroke edits to the scene.
//! - Save the scene through a sink or atomically to a file.
//!
//! # Invariants
//! - `load` replaces scene content; draw order restarts at 0.
//! - A failed `load` leaves the scene and the merge base untouched.
//! - Save never mutates the scene.

use crate::codec::decoder::{decode, resolve_into_scene};
use crate::codec::encoder::{build_document, encode_to_writer, write_atomic};
use crate::codec::error::{DecodeReport, EncodeError, EncodeReport, EncodeResult, FormatResult};
use crate::codec::format::document_to_bytes;
use crate::codec::options::{DecodeOptions, EncodeOptions};
use crate::model::document::Document;
use crate::model::id::StrokeId;
use crate::scene::{
    lock_scene, NewStroke, RuntimeStroke, Scene, SceneError, SharedScene, StrokePresenter,
};
use log::{error, info};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Entry point for callers editing one ink document.
pub struct InkSession {
    scene: SharedScene,
    loaded: Option<Document>,
    decode_options: DecodeOptions,
    encode_options: EncodeOptions,
}

impl Default for InkSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InkSession {
    /// Creates a session with an empty scene and default options.
    pub fn new() -> Self {
        Self::with_options(DecodeOptions::default(), EncodeOptions::default())
    }

    pub fn with_options(decode_options: DecodeOptions, encode_options: EncodeOptions) -> Self {
        Self {
            scene: Scene::shared(),
            loaded: None,
            decode_options,
            encode_options,
        }
    }

    /// Handle to the live scene, for presentation and tools.
    pub fn scene(&self) -> SharedScene {
        self.scene.clone()
    }

    /// Document last loaded, used as merge base on save.
    pub fn loaded_document(&self) -> Option<&Document> {
        self.loaded.as_ref()
    }

    /// Decodes `bytes` and resolves its strokes into a cleared scene.
    ///
    /// # Errors
    /// - Returns `FormatError` when the stream is unreadable. Stroke-level
    ///   problems are reported in `DecodeReport` instead.
    pub fn load(
        &mut self,
        bytes: &[u8],
        presenter: &mut dyn StrokePresenter,
    ) -> FormatResult<DecodeReport> {
        let document = decode(bytes, &self.decode_options)?;
        lock_scene(&self.scene).clear();
        let report = resolve_into_scene(&document, &self.scene, presenter);
        self.loaded = Some(document);
        Ok(report)
    }

    /// Adds a freshly drawn stroke at the end of the draw order.
    pub fn add_stroke(&self, stroke: NewStroke) -> Result<StrokeId, SceneError> {
        lock_scene(&self.scene).add_new(stroke)
    }

    pub fn remove_stroke(&self, id: StrokeId) -> Option<RuntimeStroke> {
        lock_scene(&self.scene).remove_stroke(id)
    }

    pub fn stroke_count(&self) -> usize {
        lock_scene(&self.scene).len()
    }

    /// Encodes the scene and writes it to `sink`.
    pub fn save<W: Write>(&self, sink: W) -> EncodeResult<EncodeReport> {
        encode_to_writer(&self.scene, self.loaded.as_ref(), &self.encode_options, sink)
    }

    /// Encodes the scene and atomically replaces the file at `path`.
    ///
    /// # Errors
    /// - Returns `EncodeError::Io` when the temporary file cannot be written
    ///   or renamed; the previous file is then left as it was.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> EncodeResult<EncodeReport> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let (document, report) = {
            let guard = lock_scene(&self.scene);
            build_document(&guard, self.loaded.as_ref(), &self.encode_options)
        };

        let result = document_to_bytes(&document)
            .and_then(|bytes| write_atomic(path, &bytes).map_err(EncodeError::from));
        match result {
            Ok(()) => {
                info!(
                    "event=save_file module=service status=ok duration_ms={} path={} written={} dropped={}",
                    started_at.elapsed().as_millis(),
                    path.display(),
                    report.written,
                    report.dropped.len()
                );
                Ok(report)
            }
            Err(err) => {
                error!(
                    "event=save_file module=service status=error duration_ms={} path={} error={}",
                    started_at.elapsed().as_millis(),
                    path.display(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InkSession;
    use crate::codec::error::FormatError;
    use crate::model::brush::VectorBrush;
    use crate::model::geometry::Spline;
    use crate::scene::NewStroke;

    fn stroke() -> NewStroke {
        NewStroke::new(
            Spline::from_xy(vec![0.0, 0.0, 2.0, 2.0]),
            VectorBrush::new("app://demo/vector-brush/pen", "shape://circle"),
        )
    }

    #[test]
    fn save_then_load_restores_strokes() {
        let session = InkSession::new();
        session.add_stroke(stroke()).unwrap();
        session.add_stroke(stroke()).unwrap();
        let mut bytes = Vec::new();
        session.save(&mut bytes).unwrap();

        let mut reloaded = InkSession::new();
        let report = reloaded.load(&bytes, &mut ()).unwrap();
        assert_eq!(report.resolved, 2);
        assert_eq!(reloaded.stroke_count(), 2);
        assert!(reloaded.loaded_document().is_some());
    }

    #[test]
    fn failed_load_keeps_scene() {
        let mut session = InkSession::new();
        session.add_stroke(stroke()).unwrap();
        let err = session.load(b"nope", &mut ()).unwrap_err();
        assert!(matches!(err, FormatError::BadMagic(_)));
        assert_eq!(session.stroke_count(), 1);
        assert!(session.loaded_document().is_none());
    }

    #[test]
    fn load_restarts_draw_order() {
        let source = InkSession::new();
        source.add_stroke(stroke()).unwrap();
        let mut bytes = Vec::new();
        source.save(&mut bytes).unwrap();

        let mut session = InkSession::new();
        session.add_stroke(stroke()).unwrap();
        session.add_stroke(stroke()).unwrap();
        session.load(&bytes, &mut ()).unwrap();

        let scene = session.scene();
        let guard = scene.lock().unwrap();
        let orders: Vec<_> = guard.iter().map(|s| s.draw_order).collect();
        assert_eq!(orders, vec![0]);
    }
}
