use inkdoc_core::codec::format::document_to_bytes;
use inkdoc_core::codec::options::EncodeOptions;
use inkdoc_core::codec::{decode, DecodeOptions, StrokeSerializationError};
use inkdoc_core::model::brush::VectorBrush;
use inkdoc_core::model::environment::InkEnvironment;
use inkdoc_core::model::geometry::Spline;
use inkdoc_core::model::input::{InputProviderKind, SensorChannel, SensorMetric};
use inkdoc_core::model::sensor::{ChannelData, SensorData};
use inkdoc_core::model::style::StrokeAttributes;
use inkdoc_core::{EncodeError, Identifier, InkSession, NewStroke, RuntimeStroke, StrokePresenter};
use std::collections::BTreeMap;
use std::io::{self, Write};

const PEN: &str = "app://sketch/vector-brush/pen";
const MARKER: &str = "app://sketch/vector-brush/marker";

fn stroke(brush: &str, x: f32) -> NewStroke {
    NewStroke::new(
        Spline::from_xy(vec![x, 0.0, x + 1.0, 1.0, x + 2.0, 0.5]),
        VectorBrush::new(brush, "shape://circle"),
    )
}

fn save(session: &InkSession) -> Vec<u8> {
    let mut bytes = Vec::new();
    session.save(&mut bytes).unwrap();
    bytes
}

fn pen_environment() -> InkEnvironment {
    InkEnvironment::new(
        InputProviderKind::Pen,
        BTreeMap::from([("os".to_string(), "linux".to_string())]),
        BTreeMap::new(),
        vec![SensorChannel {
            id: Identifier::new(),
            type_uri: "will://input/3.0/channel/Pressure".to_string(),
            metric: SensorMetric::Normalized,
            resolution: 1.0,
            min: 0.0,
            max: 1.0,
            precision: 2,
        }],
    )
}

#[derive(Default)]
struct Recorder {
    seen: Vec<(Identifier, u64, usize)>,
}

impl StrokePresenter for Recorder {
    fn on_stroke_resolved(&mut self, stroke: &RuntimeStroke, channels: &[SensorChannel]) {
        self.seen.push((stroke.id, stroke.draw_order, channels.len()));
    }
}

#[test]
fn round_trip_keeps_draw_order_and_attributes() {
    let session = InkSession::new();
    let mut wide = stroke(MARKER, 5.0);
    wide.attributes = StrokeAttributes {
        size: 3.5,
        rotation: 0.25,
        scale: [1.0, 2.0, 1.0],
        offset: [0.5, 0.0, 0.0],
        color: [0.2, 0.4, 0.6, 0.8],
    };
    let expected_attributes = wide.attributes;
    let first = session.add_stroke(stroke(PEN, 0.0)).unwrap();
    let second = session.add_stroke(wide).unwrap();
    let third = session.add_stroke(stroke(PEN, 10.0)).unwrap();

    let bytes = save(&session);
    let mut reloaded = InkSession::new();
    let mut recorder = Recorder::default();
    let report = reloaded.load(&bytes, &mut recorder).unwrap();
    assert_eq!(report.resolved, 3);
    assert!(report.warnings.is_empty());

    let ids: Vec<_> = recorder.seen.iter().map(|(id, _, _)| *id).collect();
    assert_eq!(ids, vec![first, second, third]);
    let orders: Vec<_> = recorder.seen.iter().map(|(_, order, _)| *order).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    let scene = reloaded.scene();
    let guard = scene.lock().unwrap();
    let restored = guard.get(second).unwrap();
    assert!(restored.attributes.approx_eq(&expected_attributes, 1e-6));
    assert_eq!(restored.brush_name, MARKER);
    assert!(guard
        .get(first)
        .unwrap()
        .attributes
        .approx_eq(&StrokeAttributes::default(), 1e-6));
}

#[test]
fn resave_without_edits_keeps_entity_counts() {
    let environment = pen_environment();
    let context_id = environment.input_context_id();
    let channel_id = environment.channels()[0].id;
    let options = EncodeOptions::default().with_environment(environment);
    let session = InkSession::with_options(DecodeOptions::default(), options.clone());

    let mut sensor = SensorData::new(context_id);
    sensor.channels.push(ChannelData {
        sensor_channel_id: channel_id,
        values: vec![0.1, 0.5, 0.9],
    });
    let mut first = stroke(PEN, 0.0);
    first.sensor_data = Some(sensor);
    session.add_stroke(first).unwrap();
    session.add_stroke(stroke(PEN, 4.0)).unwrap();

    let original = decode(&save(&session), &DecodeOptions::default()).unwrap();

    let mut reloaded = InkSession::with_options(DecodeOptions::default(), options);
    let mut recorder = Recorder::default();
    reloaded.load(&document_to_bytes(&original).unwrap(), &mut recorder).unwrap();
    assert_eq!(recorder.seen[0].2, 1);

    let resaved = decode(&save(&reloaded), &DecodeOptions::default()).unwrap();
    assert_eq!(resaved.input_configuration.input_contexts.len(), 1);
    assert_eq!(
        resaved.input_configuration.entity_count(),
        original.input_configuration.entity_count()
    );
    assert_eq!(resaved.brushes.len(), 1);
    assert_eq!(resaved.sensor_data.len(), 1);
    assert_eq!(resaved.stroke_count(), 2);
    assert_eq!(resaved.sensor_data, original.sensor_data);
}

#[test]
fn resave_from_later_launch_adds_no_second_environment() {
    let environment = pen_environment();
    let mut sensor = SensorData::new(environment.input_context_id());
    sensor.channels.push(ChannelData {
        sensor_channel_id: environment.channels()[0].id,
        values: vec![0.3, 0.6],
    });
    let session = InkSession::with_options(
        DecodeOptions::default(),
        EncodeOptions::default().with_environment(environment),
    );
    let mut captured = stroke(PEN, 0.0);
    captured.sensor_data = Some(sensor);
    session.add_stroke(captured).unwrap();
    let original = decode(&save(&session), &DecodeOptions::default()).unwrap();

    let relaunched = EncodeOptions::default().with_environment(pen_environment());
    let mut reloaded = InkSession::with_options(DecodeOptions::default(), relaunched.clone());
    reloaded
        .load(&document_to_bytes(&original).unwrap(), &mut ())
        .unwrap();
    let resaved = decode(&save(&reloaded), &DecodeOptions::default()).unwrap();
    assert_eq!(resaved.input_configuration.input_contexts.len(), 1);
    assert_eq!(resaved.input_configuration, original.input_configuration);

    let mut again = InkSession::with_options(DecodeOptions::default(), relaunched);
    let mut recorder = Recorder::default();
    again
        .load(&document_to_bytes(&resaved).unwrap(), &mut recorder)
        .unwrap();
    assert_eq!(recorder.seen[0].2, 1);
    let third = decode(&save(&again), &DecodeOptions::default()).unwrap();
    assert_eq!(third.input_configuration.entity_count(), 5);
}

#[test]
fn removed_stroke_is_not_persisted_and_order_is_kept() {
    let session = InkSession::new();
    let a = session.add_stroke(stroke(PEN, 0.0)).unwrap();
    let b = session.add_stroke(stroke(PEN, 1.0)).unwrap();
    let c = session.add_stroke(stroke(PEN, 2.0)).unwrap();
    assert!(session.remove_stroke(c).is_some());
    let d = session.add_stroke(stroke(PEN, 3.0)).unwrap();

    let document = decode(&save(&session), &DecodeOptions::default()).unwrap();
    let persisted: Vec<_> = document.tree.stroke_nodes().map(|node| node.id()).collect();
    assert_eq!(persisted, vec![a, b, d]);
}

#[test]
fn non_finite_stroke_is_dropped_and_rest_saved() {
    let session = InkSession::new();
    let good = session.add_stroke(stroke(PEN, 0.0)).unwrap();
    let bad = session
        .add_stroke(NewStroke::new(
            Spline::from_xy(vec![0.0, f32::NAN]),
            VectorBrush::new(MARKER, "shape://square"),
        ))
        .unwrap();

    let mut bytes = Vec::new();
    let report = session.save(&mut bytes).unwrap();
    assert_eq!(report.written, 1);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].stroke_id(), bad);
    assert!(matches!(
        report.dropped[0],
        StrokeSerializationError::Invalid { .. }
    ));

    let document = decode(&bytes, &DecodeOptions::default()).unwrap();
    let ids: Vec<_> = document.tree.stroke_nodes().map(|node| node.id()).collect();
    assert_eq!(ids, vec![good]);
    assert!(!document.brushes.contains(MARKER));
}

struct BrokenSink {
    accepted: usize,
}

impl Write for BrokenSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.accepted == 0 {
            self.accepted = buf.len().min(8);
            return Ok(self.accepted);
        }
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_failure_is_fatal() {
    let session = InkSession::new();
    session.add_stroke(stroke(PEN, 0.0)).unwrap();
    let err = session.save(BrokenSink { accepted: 0 }).unwrap_err();
    assert!(matches!(err, EncodeError::Io(ref io) if io.kind() == io::ErrorKind::BrokenPipe));
}

#[test]
fn save_to_path_replaces_file_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sketch.inkd");
    std::fs::write(&path, b"stale").unwrap();

    let session = InkSession::new();
    session.add_stroke(stroke(PEN, 0.0)).unwrap();
    let report = session.save_to_path(&path).unwrap();
    assert_eq!(report.written, 1);

    let bytes = std::fs::read(&path).unwrap();
    let mut reloaded = InkSession::new();
    assert_eq!(reloaded.load(&bytes, &mut ()).unwrap().resolved, 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn save_to_missing_directory_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("sketch.inkd");

    let session = InkSession::new();
    let err = session.save_to_path(&path).unwrap_err();
    assert!(matches!(err, EncodeError::Io(_)));
    assert!(!path.exists());
}
