//! Persisted stroke record.
//!
//! # Invariants
//! - `sensor_data_id`, when set, should name an entry of the owning
//!   document's sensor data repository. Readers must tolerate dangling ids.
//! - A stroke is only written or resolved after `validate()` passes.

use crate::model::geometry::{Spline, SplineError};
use crate::model::id::{SensorDataId, StrokeId};
use crate::model::style::StyleRef;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Stroke as stored inside a stroke node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: StrokeId,
    pub spline: Spline,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_data_id: Option<SensorDataId>,
    /// Offset of the first control point into the sensor sample stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_data_offset: Option<Duration>,
}

/// Reasons a stroke cannot be persisted or resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeValidationError {
    Geometry(SplineError),
    NonFiniteStyle { property: &'static str },
    ColorOutOfRange { channel: &'static str, value: f32 },
    BlankBrushUri,
}

impl Display for StrokeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geometry(err) => write!(f, "{err}"),
            Self::NonFiniteStyle { property } => {
                write!(f, "style property `{property}` is not finite")
            }
            Self::ColorOutOfRange { channel, value } => {
                write!(f, "color channel `{channel}` out of [0,1]: {value}")
            }
            Self::BlankBrushUri => write!(f, "style brush uri is blank"),
        }
    }
}

impl Error for StrokeValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Geometry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SplineError> for StrokeValidationError {
    fn from(value: SplineError) -> Self {
        Self::Geometry(value)
    }
}

impl Stroke {
    /// Creates a stroke with no style and no sensor binding.
    pub fn new(id: StrokeId, spline: Spline) -> Self {
        Self {
            id,
            spline,
            style: None,
            sensor_data_id: None,
            sensor_data_offset: None,
        }
    }

    /// Brush name referenced by the style, if any.
    pub fn brush_uri(&self) -> Option<&str> {
        self.style.as_ref().map(|style| style.brush_uri.as_str())
    }

    pub fn validate(&self) -> Result<(), StrokeValidationError> {
        self.spline.validate()?;

        let Some(style) = self.style.as_ref() else {
            return Ok(());
        };
        if style.brush_uri.trim().is_empty() {
            return Err(StrokeValidationError::BlankBrushUri);
        }
        let Some(props) = style.props.as_ref() else {
            return Ok(());
        };
        if let Some((property, _)) = props.present().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(StrokeValidationError::NonFiniteStyle { property });
        }
        if let Some((channel, value)) = props
            .color_components()
            .into_iter()
            .find(|(_, v)| !(0.0..=1.0).contains(v))
        {
            return Err(StrokeValidationError::ColorOutOfRange { channel, value });
        }
        Ok(())
    }
}
