//! Stroke geometry.
//!
//! A spline is stored as a flat control-point buffer described by a layout:
//! each point contributes one value per layout entry, in layout order.

use serde::{Deserialize, Serialize};

/// One per-point channel of a spline control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathPointProperty {
    X,
    Y,
    Z,
    Size,
    Rotation,
    Red,
    Green,
    Blue,
    Alpha,
    ScaleX,
    ScaleY,
    ScaleZ,
    OffsetX,
    OffsetY,
    OffsetZ,
}

/// Parametric stroke path (Catmull-Rom control points plus parameter trims).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    pub layout: Vec<PathPointProperty>,
    pub points: Vec<f32>,
    #[serde(default)]
    pub t_start: f32,
    #[serde(default = "default_t_final")]
    pub t_final: f32,
}

fn default_t_final() -> f32 {
    1.0
}

/// Reasons a spline cannot be persisted or rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum SplineError {
    /// Layout lacks a mandatory X or Y channel.
    MissingAxis(PathPointProperty),
    /// Layout names one channel twice.
    DuplicateProperty(PathPointProperty),
    /// Point buffer is not a whole number of points.
    RaggedPoints { len: usize, stride: usize },
    /// A control value or trim is NaN or infinite.
    NonFinite { index: usize },
    /// Trims are outside [0,1].
    TrimOutOfRange { t_start: f32, t_final: f32 },
}

impl std::fmt::Display for SplineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAxis(axis) => write!(f, "spline layout is missing {axis:?}"),
            Self::DuplicateProperty(prop) => write!(f, "spline layout repeats {prop:?}"),
            Self::RaggedPoints { len, stride } => write!(
                f,
                "spline point buffer length {len} is not a multiple of stride {stride}"
            ),
            Self::NonFinite { index } => write!(f, "spline value at index {index} is not finite"),
            Self::TrimOutOfRange { t_start, t_final } => {
                write!(f, "spline trims out of range: t_start={t_start} t_final={t_final}")
            }
        }
    }
}

impl std::error::Error for SplineError {}

impl Spline {
    /// Creates an XY spline from interleaved coordinates.
    pub fn from_xy(points: Vec<f32>) -> Self {
        Self {
            layout: vec![PathPointProperty::X, PathPointProperty::Y],
            points,
            t_start: 0.0,
            t_final: 1.0,
        }
    }

    /// Number of values per control point.
    pub fn stride(&self) -> usize {
        self.layout.len()
    }

    /// Number of complete control points.
    pub fn point_count(&self) -> usize {
        match self.stride() {
            0 => 0,
            stride => self.points.len() / stride,
        }
    }

    /// Returns the value of `property` for point `index`, if the layout has it.
    pub fn value(&self, index: usize, property: PathPointProperty) -> Option<f32> {
        let column = self.layout.iter().position(|p| *p == property)?;
        self.points.get(index * self.stride() + column).copied()
    }

    pub fn validate(&self) -> Result<(), SplineError> {
        for axis in [PathPointProperty::X, PathPointProperty::Y] {
            if !self.layout.contains(&axis) {
                return Err(SplineError::MissingAxis(axis));
            }
        }
        for (i, prop) in self.layout.iter().enumerate() {
            if self.layout[..i].contains(prop) {
                return Err(SplineError::DuplicateProperty(*prop));
            }
        }
        let stride = self.stride();
        if self.points.len() % stride != 0 {
            return Err(SplineError::RaggedPoints {
                len: self.points.len(),
                stride,
            });
        }
        if let Some(index) = self.points.iter().position(|v| !v.is_finite()) {
            return Err(SplineError::NonFinite { index });
        }
        let trims_ok = self.t_start.is_finite()
            && self.t_final.is_finite()
            && (0.0..=1.0).contains(&self.t_start)
            && (0.0..=1.0).contains(&self.t_final);
        if !trims_ok {
            return Err(SplineError::TrimOutOfRange {
                t_start: self.t_start,
                t_final: self.t_final,
            });
        }
        Ok(())
    }
}
