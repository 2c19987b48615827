use crate::model::brush::VectorBrush;
use crate::model::geometry::Spline;
use crate::model::id::{Identifier, SensorDataId, StrokeId};
use crate::model::input::SensorChannel;
use crate::model::sensor::SensorData;
use crate::model::stroke::{Stroke, StrokeValidationError};
use crate::model::style::{StrokeAttributes, StyleRef};
use std::time::Duration;

/// Resolved stroke living in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeStroke {
    pub id: StrokeId,
    pub spline: Spline,
    /// Key into the scene brush arena.
    pub brush_name: String,
    pub attributes: StrokeAttributes,
    /// Set only when the sensor data block was found.
    pub sensor_data_id: Option<SensorDataId>,
    pub sensor_data_offset: Option<Duration>,
    /// Channel layout of the stroke's input context; empty if unresolvable.
    pub channels: Vec<SensorChannel>,
    /// Paint order. Unique and increasing within a session.
    pub draw_order: u64,
    /// Form this stroke was loaded from. `None` until first saved.
    pub persisted: Option<Stroke>,
}

impl RuntimeStroke {
    /// Style written for strokes that have no persisted form yet.
    pub fn create_style(&self) -> StyleRef {
        self.attributes.to_style(self.brush_name.as_str())
    }

    /// Persisted form to write: the loaded one when present, otherwise one
    /// built from current geometry and style. Either way it is validated.
    pub fn to_persisted(&self) -> Result<Stroke, StrokeValidationError> {
        let stroke = match self.persisted.as_ref() {
            Some(stroke) => stroke.clone(),
            None => Stroke {
                id: self.id,
                spline: self.spline.clone(),
                style: Some(self.create_style()),
                sensor_data_id: self.sensor_data_id,
                sensor_data_offset: self.sensor_data_offset,
            },
        };
        stroke.validate()?;
        Ok(stroke)
    }
}

/// Input for a stroke drawn in the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStroke {
    pub id: StrokeId,
    pub spline: Spline,
    pub brush: VectorBrush,
    pub attributes: StrokeAttributes,
    pub sensor_data: Option<SensorData>,
    pub sensor_data_offset: Option<Duration>,
    pub channels: Vec<SensorChannel>,
}

impl NewStroke {
    /// New stroke with default attributes and no sensor samples.
    pub fn new(spline: Spline, brush: VectorBrush) -> Self {
        Self {
            id: Identifier::new(),
            spline,
            brush,
            attributes: StrokeAttributes::default(),
            sensor_data: None,
            sensor_data_offset: None,
            channels: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RuntimeStroke;
    use crate::model::geometry::Spline;
    use crate::model::id::Identifier;
    use crate::model::stroke::{Stroke, StrokeValidationError};
    use crate::model::style::StrokeAttributes;

    fn runtime(spline: Spline) -> RuntimeStroke {
        RuntimeStroke {
            id: Identifier::new(),
            spline,
            brush_name: "app://demo/vector-brush/pen".to_string(),
            attributes: StrokeAttributes::default(),
            sensor_data_id: None,
            sensor_data_offset: None,
            channels: Vec::new(),
            draw_order: 0,
            persisted: None,
        }
    }

    #[test]
    fn builds_persisted_form_for_new_stroke() {
        let stroke = runtime(Spline::from_xy(vec![1.0, 2.0]));
        let persisted = stroke.to_persisted().unwrap();
        assert_eq!(persisted.id, stroke.id);
        assert_eq!(persisted.brush_uri(), Some("app://demo/vector-brush/pen"));
    }

    #[test]
    fn reuses_loaded_persisted_form() {
        let mut stroke = runtime(Spline::from_xy(vec![1.0, 2.0]));
        let loaded = Stroke::new(stroke.id, Spline::from_xy(vec![5.0, 6.0]));
        stroke.persisted = Some(loaded.clone());
        assert_eq!(stroke.to_persisted().unwrap(), loaded);
    }

    #[test]
    fn invalid_geometry_cannot_be_persisted() {
        let stroke = runtime(Spline::from_xy(vec![1.0, f32::NAN]));
        assert!(matches!(
            stroke.to_persisted(),
            Err(StrokeValidationError::Geometry(_))
        ));
    }
}
