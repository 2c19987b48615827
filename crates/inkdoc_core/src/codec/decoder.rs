//! Document decoding and stroke resolution.
//!
//! # Responsibility
//! - Turn a byte stream into a structurally valid `Document`.
//! - Resolve every stroke node into a `RuntimeStroke` and hand it to the
//!   scene and the presentation layer in draw order.
//!
//! # Invariants
//! - Stream-level corruption fails the whole decode.
//! - Node-level problems skip (or degrade) one stroke and never abort.
//! - Draw order advances only for nodes that produce a runtime stroke.
//! - "resolve, insert, notify" for one stroke runs under one scene lock.

use crate::codec::error::{DecodeReport, FormatResult, ReferenceKind, ResolveWarning};
use crate::codec::format::document_from_bytes;
use crate::codec::options::DecodeOptions;
use crate::model::brush::VectorBrush;
use crate::model::document::Document;
use crate::model::id::StrokeId;
use crate::model::input::SensorChannel;
use crate::model::sensor::SensorData;
use crate::model::style::StrokeAttributes;
use crate::model::tree::StrokeNode;
use crate::repo::input_config::ChannelLookupMiss;
use crate::scene::{lock_scene, RuntimeStroke, SharedScene, StrokePresenter};
use log::{debug, error, info, warn};
use std::time::Instant;

/// Parses `bytes` into a document.
///
/// # Errors
/// - Returns `FormatError` for bad magic, unsupported version, truncation,
///   checksum mismatch, malformed body, or broken tree/repository integrity.
pub fn decode(bytes: &[u8], options: &DecodeOptions) -> FormatResult<Document> {
    let started_at = Instant::now();
    debug!("event=decode module=codec status=start bytes={}", bytes.len());

    match document_from_bytes(bytes, options) {
        Ok(document) => {
            info!(
                "event=decode module=codec status=ok duration_ms={} bytes={} stroke_nodes={} brushes={} sensor_data={}",
                started_at.elapsed().as_millis(),
                bytes.len(),
                document.stroke_count(),
                document.brushes.len(),
                document.sensor_data.len()
            );
            Ok(document)
        }
        Err(err) => {
            error!(
                "event=decode module=codec status=error duration_ms={} bytes={} error={}",
                started_at.elapsed().as_millis(),
                bytes.len(),
                err
            );
            Err(err)
        }
    }
}

/// Stroke resolved against one document, before scene insertion.
#[derive(Debug)]
pub struct ResolvedStroke<'doc> {
    pub stroke: RuntimeStroke,
    pub brush: &'doc VectorBrush,
    pub sensor_data: Option<&'doc SensorData>,
    /// Degradations that did not prevent resolution.
    pub warnings: Vec<ResolveWarning>,
}

/// Follows cross-repository references of one document.
pub struct Resolver<'doc> {
    document: &'doc Document,
}

impl<'doc> Resolver<'doc> {
    pub fn new(document: &'doc Document) -> Self {
        Self { document }
    }

    /// Resolves one stroke node.
    ///
    /// Returns `Err` when the node must be skipped: no brush, a non-vector
    /// brush, or an invalid stroke record. Missing sensor data or input
    /// context links degrade to unset data and an empty channel list.
    pub fn resolve(
        &self,
        node: &'doc StrokeNode,
        draw_order: u64,
    ) -> Result<ResolvedStroke<'doc>, ResolveWarning> {
        let stroke = &node.stroke;
        let brush_uri = stroke.brush_uri().unwrap_or_default();
        let brush = self
            .document
            .brushes
            .get(brush_uri)
            .ok_or_else(|| ResolveWarning::missing(stroke.id, ReferenceKind::Brush, brush_uri))?;
        let brush = brush
            .as_vector()
            .ok_or_else(|| ResolveWarning::UnsupportedBrushKind {
                stroke_id: stroke.id,
                brush: brush_uri.to_string(),
                kind: brush.kind(),
            })?;
        stroke
            .validate()
            .map_err(|reason| ResolveWarning::InvalidStroke {
                stroke_id: stroke.id,
                reason,
            })?;

        let props = stroke.style.as_ref().and_then(|style| style.props.as_ref());
        let attributes = StrokeAttributes::from_props(props);

        let mut warnings = Vec::new();
        let sensor_data = stroke.sensor_data_id.and_then(|id| {
            let found = self.document.sensor_data.get(&id);
            if found.is_none() {
                warnings.push(ResolveWarning::missing(
                    stroke.id,
                    ReferenceKind::SensorData,
                    id,
                ));
            }
            found
        });
        let channels = match sensor_data {
            Some(data) => self.channels_for(stroke.id, data, &mut warnings),
            None => Vec::new(),
        };

        Ok(ResolvedStroke {
            stroke: RuntimeStroke {
                id: stroke.id,
                spline: stroke.spline.clone(),
                brush_name: brush.name.clone(),
                attributes,
                sensor_data_id: sensor_data.map(|data| data.id),
                sensor_data_offset: stroke.sensor_data_offset,
                channels,
                draw_order,
                persisted: Some(stroke.clone()),
            },
            brush,
            sensor_data,
            warnings,
        })
    }

    fn channels_for(
        &self,
        stroke_id: StrokeId,
        data: &SensorData,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Vec<SensorChannel> {
        match self
            .document
            .input_configuration
            .channels_for_input_context(data.input_context_id)
        {
            Ok(channels) => channels.to_vec(),
            Err(ChannelLookupMiss::InputContext(id)) => {
                warnings.push(ResolveWarning::missing(
                    stroke_id,
                    ReferenceKind::InputContext,
                    id,
                ));
                Vec::new()
            }
            Err(ChannelLookupMiss::SensorContext(id)) => {
                warnings.push(ResolveWarning::missing(
                    stroke_id,
                    ReferenceKind::SensorContext,
                    id,
                ));
                Vec::new()
            }
        }
    }
}

/// Resolves every stroke node of `document` depth-first into `scene`.
///
/// Each resolved stroke is inserted into the scene and then passed to
/// `presenter`, both under one scene lock.
pub fn resolve_into_scene(
    document: &Document,
    scene: &SharedScene,
    presenter: &mut dyn StrokePresenter,
) -> DecodeReport {
    let started_at = Instant::now();
    let resolver = Resolver::new(document);
    let mut report = DecodeReport::default();

    for node in document.tree.stroke_nodes() {
        report.stroke_nodes += 1;

        let mut guard = lock_scene(scene);
        let resolved = match resolver.resolve(node, guard.next_draw_order()) {
            Ok(resolved) => resolved,
            Err(warning) => {
                warn!(
                    "event=stroke_resolve module=codec status=skip stroke_id={} reason={}",
                    node.id(),
                    warning
                );
                report.warnings.push(warning);
                continue;
            }
        };
        for warning in &resolved.warnings {
            warn!(
                "event=stroke_resolve module=codec status=degraded stroke_id={} reason={}",
                node.id(),
                warning
            );
        }
        report.warnings.extend(resolved.warnings);

        let stroke_id = resolved.stroke.id;
        if let Err(reason) = guard.insert_with_resources(
            resolved.stroke,
            resolved.brush.clone(),
            resolved.sensor_data.cloned(),
        ) {
            let warning = ResolveWarning::Rejected { stroke_id, reason };
            warn!(
                "event=stroke_resolve module=codec status=skip stroke_id={} reason={}",
                stroke_id, warning
            );
            report.warnings.push(warning);
            continue;
        }

        if let Some(stroke) = guard.get(stroke_id) {
            presenter.on_stroke_resolved(stroke, &stroke.channels);
        }
        report.resolved += 1;
    }

    info!(
        "event=resolve module=codec status=ok duration_ms={} stroke_nodes={} resolved={} warnings={}",
        started_at.elapsed().as_millis(),
        report.stroke_nodes,
        report.resolved,
        report.warnings.len()
    );
    report
}
