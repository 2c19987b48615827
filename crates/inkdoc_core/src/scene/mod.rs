//! In-memory scene edited between loads and saves.
//!
//! # Responsibility
//! - Hold resolved runtime strokes ordered by draw order.
//! - Own the brush and sensor-data arenas runtime strokes point into.
//! - Define the collaborator seams used by presentation and spatial layers.
//!
//! # Invariants
//! - `draw_order` values are unique and strictly increase with insertion.
//! - Removing a stroke never renumbers survivors.
//! - Every stored stroke's brush is present in the brush arena.

mod runtime;

pub use runtime::{NewStroke, RuntimeStroke};

use crate::model::brush::VectorBrush;
use crate::model::id::{SensorDataId, StrokeId};
use crate::model::input::SensorChannel;
use crate::model::sensor::SensorData;
use crate::repo::brush_repo::BrushRepository;
use crate::repo::repository::{RepoError, SensorDataRepository};
use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

/// Scene shared between decode, encode and the presentation layer.
pub type SharedScene = Arc<Mutex<Scene>>;

/// Locks the shared scene, recovering the guard if a holder panicked.
pub fn lock_scene(scene: &SharedScene) -> MutexGuard<'_, Scene> {
    scene.lock().unwrap_or_else(|poisoned| {
        warn!("event=scene_lock module=scene status=recovered reason=poisoned");
        poisoned.into_inner()
    })
}

/// Receives every stroke resolved during decode, in draw order.
pub trait StrokePresenter {
    fn on_stroke_resolved(&mut self, stroke: &RuntimeStroke, channels: &[SensorChannel]);
}

/// Presenter that ignores notifications.
impl StrokePresenter for () {
    fn on_stroke_resolved(&mut self, _stroke: &RuntimeStroke, _channels: &[SensorChannel]) {}
}

/// Stroke index used by erase/select tools and by the encoder.
pub trait SpatialIndex {
    fn add(&mut self, stroke: RuntimeStroke) -> Result<(), SceneError>;
    fn remove(&mut self, id: StrokeId) -> Option<RuntimeStroke>;
    fn strokes_by_draw_order(&self) -> Vec<&RuntimeStroke>;
}

/// Scene mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A stroke with this id is already in the scene.
    DuplicateStroke(StrokeId),
    /// Draw order does not come after the last assigned one.
    DrawOrderRegression { got: u64, next: u64 },
    /// Stroke references a brush missing from the brush arena.
    UnknownBrush(String),
    /// Brush rejected by the brush arena.
    Brush(RepoError),
}

impl Display for SceneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateStroke(id) => write!(f, "stroke already in scene: {id}"),
            Self::DrawOrderRegression { got, next } => {
                write!(f, "draw order {got} is behind next free order {next}")
            }
            Self::UnknownBrush(name) => write!(f, "brush not registered in scene: {name}"),
            Self::Brush(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SceneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Brush(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SceneError {
    fn from(value: RepoError) -> Self {
        Self::Brush(value)
    }
}

/// Draw-ordered stroke collection plus its resource arenas.
#[derive(Debug, Default)]
pub struct Scene {
    strokes: BTreeMap<u64, RuntimeStroke>,
    draw_order_by_id: HashMap<StrokeId, u64>,
    brushes: BrushRepository,
    sensor_data: SensorDataRepository,
    next_draw_order: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a new empty scene for sharing.
    pub fn shared() -> SharedScene {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Draw order the next inserted stroke receives.
    pub fn next_draw_order(&self) -> u64 {
        self.next_draw_order
    }

    /// Registers a brush in the arena. Existing names keep their definition.
    pub fn register_brush(&mut self, brush: VectorBrush) -> Result<bool, SceneError> {
        Ok(self.brushes.add(brush)?)
    }

    /// Registers a sensor data block. Existing ids keep their samples.
    pub fn register_sensor_data(&mut self, data: SensorData) -> bool {
        self.sensor_data.add(data)
    }

    /// Adds a freshly drawn stroke and returns its id.
    ///
    /// Registers the stroke's brush and sensor data and assigns the next
    /// draw order.
    pub fn add_new(&mut self, new: NewStroke) -> Result<StrokeId, SceneError> {
        let stroke = RuntimeStroke {
            id: new.id,
            spline: new.spline,
            brush_name: new.brush.name.clone(),
            attributes: new.attributes,
            sensor_data_id: new.sensor_data.as_ref().map(|data| data.id),
            sensor_data_offset: new.sensor_data_offset,
            channels: new.channels,
            draw_order: self.next_draw_order,
            persisted: None,
        };
        let id = stroke.id;
        self.insert_with_resources(stroke, new.brush, new.sensor_data)?;
        Ok(id)
    }

    /// Inserts a resolved stroke, checking id uniqueness and draw order.
    pub fn insert(&mut self, stroke: RuntimeStroke) -> Result<(), SceneError> {
        self.check_slot(&stroke)?;
        if !self.brushes.contains(&stroke.brush_name) {
            return Err(SceneError::UnknownBrush(stroke.brush_name.clone()));
        }
        self.commit(stroke);
        Ok(())
    }

    /// Inserts a stroke together with the brush and sensor data it uses.
    ///
    /// Every check runs before the arenas change, so a rejected stroke
    /// registers nothing.
    pub fn insert_with_resources(
        &mut self,
        stroke: RuntimeStroke,
        brush: VectorBrush,
        sensor_data: Option<SensorData>,
    ) -> Result<(), SceneError> {
        self.check_slot(&stroke)?;
        if brush.name != stroke.brush_name {
            return Err(SceneError::UnknownBrush(stroke.brush_name.clone()));
        }
        self.register_brush(brush)?;
        if let Some(data) = sensor_data {
            self.register_sensor_data(data);
        }
        self.commit(stroke);
        Ok(())
    }

    fn check_slot(&self, stroke: &RuntimeStroke) -> Result<(), SceneError> {
        if self.draw_order_by_id.contains_key(&stroke.id) {
            return Err(SceneError::DuplicateStroke(stroke.id));
        }
        if stroke.draw_order < self.next_draw_order {
            return Err(SceneError::DrawOrderRegression {
                got: stroke.draw_order,
                next: self.next_draw_order,
            });
        }
        Ok(())
    }

    fn commit(&mut self, stroke: RuntimeStroke) {
        self.next_draw_order = stroke.draw_order + 1;
        self.draw_order_by_id.insert(stroke.id, stroke.draw_order);
        self.strokes.insert(stroke.draw_order, stroke);
    }

    /// Removes a stroke. Arena entries stay for other strokes sharing them.
    pub fn remove_stroke(&mut self, id: StrokeId) -> Option<RuntimeStroke> {
        let order = self.draw_order_by_id.remove(&id)?;
        self.strokes.remove(&order)
    }

    pub fn get(&self, id: StrokeId) -> Option<&RuntimeStroke> {
        let order = self.draw_order_by_id.get(&id)?;
        self.strokes.get(order)
    }

    /// Strokes in ascending draw order.
    pub fn iter(&self) -> impl Iterator<Item = &RuntimeStroke> {
        self.strokes.values()
    }

    pub fn brush(&self, name: &str) -> Option<&VectorBrush> {
        self.brushes.get_vector(name)
    }

    pub fn sensor_data(&self, id: SensorDataId) -> Option<&SensorData> {
        self.sensor_data.get(&id)
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Drops every stroke and arena entry and restarts draw order at 0.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl SpatialIndex for Scene {
    fn add(&mut self, stroke: RuntimeStroke) -> Result<(), SceneError> {
        self.insert(stroke)
    }

    fn remove(&mut self, id: StrokeId) -> Option<RuntimeStroke> {
        self.remove_stroke(id)
    }

    fn strokes_by_draw_order(&self) -> Vec<&RuntimeStroke> {
        self.iter().collect()
    }
}
