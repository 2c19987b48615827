//! Document encoding from a live scene.
//!
//! # Responsibility
//! - Build a fresh `Document` from scene strokes in draw order.
//! - Carry input definitions over from the previously loaded document.
//! - Write the complete byte buffer to a sink in one step.
//!
//! # Invariants
//! - Main group order equals ascending `draw_order`.
//! - Repositories hold each key once; prior entries are added only if absent.
//! - The live environment is written only when saved sensor data references
//!   its input context.
//! - A stroke that cannot be persisted is dropped with no resources left
//!   behind for it.
//! - Nothing is written until the whole document is serialized.

use crate::codec::error::{EncodeReport, EncodeResult, StrokeSerializationError};
use crate::codec::format::document_to_bytes;
use crate::codec::options::EncodeOptions;
use crate::model::brush::VectorBrush;
use crate::model::document::Document;
use crate::model::id::Identifier;
use crate::model::provenance::{PREDICATE_AUTHOR, PREDICATE_CREATED};
use crate::model::stroke::Stroke;
use crate::model::tree::{GroupNode, Node, StrokeNode, StrokeTree};
use crate::scene::{lock_scene, RuntimeStroke, Scene, SharedScene};
use log::{error, info, warn};
use std::io::Write;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Builds a new document from `scene`, merging input definitions of `prior`.
///
/// Caller must keep the scene unchanged for the duration (hold its lock).
pub fn build_document(
    scene: &Scene,
    prior: Option<&Document>,
    options: &EncodeOptions,
) -> (Document, EncodeReport) {
    let mut document = Document::new();
    let mut report = EncodeReport::default();
    let root_id = Identifier::new();
    let mut main_group = GroupNode::new(Identifier::new());

    let subject = root_id.to_uuid_string();
    document
        .provenance
        .add(subject.as_str(), PREDICATE_CREATED, now_epoch_ms().to_string());
    document
        .provenance
        .add(subject.as_str(), PREDICATE_AUTHOR, options.authoring_tool.as_str());

    if let Some(prior) = prior {
        report.merged_entities = document
            .input_configuration
            .merge_missing(&prior.input_configuration)
            .total();
        for (key, value) in &prior.properties {
            document
                .properties
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    for stroke in scene.iter() {
        let (persisted, brush) = match persistable(scene, stroke) {
            Ok(parts) => parts,
            Err(err) => {
                warn!(
                    "event=stroke_encode module=codec status=skip stroke_id={} draw_order={} reason={}",
                    stroke.id, stroke.draw_order, err
                );
                report.dropped.push(err);
                continue;
            }
        };

        if !document.brushes.contains(brush.name.as_str()) {
            if let Err(reason) = document.brushes.add(brush.clone()) {
                let err = StrokeSerializationError::InvalidBrush {
                    stroke_id: stroke.id,
                    reason,
                };
                warn!(
                    "event=stroke_encode module=codec status=skip stroke_id={} draw_order={} reason={}",
                    stroke.id, stroke.draw_order, err
                );
                report.dropped.push(err);
                continue;
            }
        }
        if let Some(data_id) = stroke.sensor_data_id {
            if !document.sensor_data.contains(&data_id) {
                match scene.sensor_data(data_id) {
                    Some(data) => {
                        document.sensor_data.add(data.clone());
                    }
                    None => warn!(
                        "event=stroke_encode module=codec status=degraded stroke_id={} missing_sensor_data={}",
                        stroke.id, data_id
                    ),
                }
            }
        }

        if main_group.add(Node::Stroke(StrokeNode::new(persisted))) {
            report.written += 1;
        }
    }

    if let Some(environment) = options.environment.as_ref() {
        let context_id = environment.input_context_id();
        if document
            .sensor_data
            .iter()
            .any(|data| data.input_context_id == context_id)
        {
            environment.register_in(&mut document.input_configuration);
        }
    }

    let mut root = GroupNode::new(root_id);
    root.add(Node::Group(main_group));
    document.tree = StrokeTree { root: Some(root) };
    (document, report)
}

fn persistable<'s>(
    scene: &'s Scene,
    stroke: &RuntimeStroke,
) -> Result<(Stroke, &'s VectorBrush), StrokeSerializationError> {
    let persisted = stroke
        .to_persisted()
        .map_err(|reason| StrokeSerializationError::Invalid {
            stroke_id: stroke.id,
            reason,
        })?;
    if persisted.id != stroke.id {
        return Err(StrokeSerializationError::IdMismatch {
            stroke_id: stroke.id,
            persisted_id: persisted.id,
        });
    }
    let brush = scene
        .brush(stroke.brush_name.as_str())
        .ok_or_else(|| StrokeSerializationError::MissingBrush {
            stroke_id: stroke.id,
            brush: stroke.brush_name.clone(),
        })?;
    Ok((persisted, brush))
}

/// Builds and serializes a document from `scene`.
pub fn encode(
    scene: &Scene,
    prior: Option<&Document>,
    options: &EncodeOptions,
) -> EncodeResult<(Vec<u8>, EncodeReport)> {
    let (document, report) = build_document(scene, prior, options);
    let bytes = document_to_bytes(&document)?;
    Ok((bytes, report))
}

/// Encodes a shared scene and writes the result to `sink`.
///
/// The scene lock is held only while the document is built. The sink sees a
/// single write of the complete buffer; serialization failures write nothing.
///
/// # Errors
/// - Returns `EncodeError::Io` when the sink fails.
pub fn encode_to_writer<W: Write>(
    scene: &SharedScene,
    prior: Option<&Document>,
    options: &EncodeOptions,
    mut sink: W,
) -> EncodeResult<EncodeReport> {
    let started_at = Instant::now();
    let (document, report) = {
        let guard = lock_scene(scene);
        build_document(&guard, prior, options)
    };

    let result = document_to_bytes(&document).and_then(|bytes| {
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(bytes.len())
    });
    match result {
        Ok(len) => {
            info!(
                "event=encode module=codec status=ok duration_ms={} bytes={} written={} dropped={} merged={}",
                started_at.elapsed().as_millis(),
                len,
                report.written,
                report.dropped.len(),
                report.merged_entities
            );
            Ok(report)
        }
        Err(err) => {
            error!(
                "event=encode module=codec status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Writes `bytes` to `path` through a sibling temporary file.
///
/// The target is replaced by rename only after every byte is on disk, so a
/// failed save leaves the previous file (or no file) in place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn now_epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}
