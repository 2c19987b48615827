//! Stroke style reference and resolved style attributes.
//!
//! # Responsibility
//! - Persist the sparse style record exactly as found in a document.
//! - Resolve sparse records into a dense `StrokeAttributes` with defaults.
//!
//! # Invariants
//! - Absent properties resolve to: size=10, rotation=0, scale=(1,1,1),
//!   offset=(0,0,0), color=(0,0,0,1).
//! - Color components are expected in [0,1].

use serde::{Deserialize, Serialize};

pub const DEFAULT_SIZE: f32 = 10.0;
pub const DEFAULT_ROTATION: f32 = 0.0;
pub const DEFAULT_SCALE: f32 = 1.0;
pub const DEFAULT_OFFSET: f32 = 0.0;
pub const DEFAULT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Sparse set of named numeric style properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_z: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_z: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
}

impl StyleProps {
    /// All present values, tagged by property name.
    pub fn present(&self) -> Vec<(&'static str, f32)> {
        [
            ("size", self.size),
            ("rotation", self.rotation),
            ("scale_x", self.scale_x),
            ("scale_y", self.scale_y),
            ("scale_z", self.scale_z),
            ("offset_x", self.offset_x),
            ("offset_y", self.offset_y),
            ("offset_z", self.offset_z),
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    /// Present color components, tagged by channel name.
    pub fn color_components(&self) -> Vec<(&'static str, f32)> {
        [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

/// Style reference persisted with a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRef {
    /// Brush name/URI, resolved against the brush repository.
    pub brush_uri: String,
    /// Absent when the document carries no property record at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<StyleProps>,
}

/// Dense style attributes of a resolved stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeAttributes {
    pub size: f32,
    pub rotation: f32,
    pub scale: [f32; 3],
    pub offset: [f32; 3],
    /// RGBA.
    pub color: [f32; 4],
}

impl Default for StrokeAttributes {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            rotation: DEFAULT_ROTATION,
            scale: [DEFAULT_SCALE; 3],
            offset: [DEFAULT_OFFSET; 3],
            color: DEFAULT_COLOR,
        }
    }
}

impl StrokeAttributes {
    /// Resolves sparse props, filling every absent field with its default.
    pub fn from_props(props: Option<&StyleProps>) -> Self {
        let Some(props) = props else {
            return Self::default();
        };
        Self {
            size: props.size.unwrap_or(DEFAULT_SIZE),
            rotation: props.rotation.unwrap_or(DEFAULT_ROTATION),
            scale: [
                props.scale_x.unwrap_or(DEFAULT_SCALE),
                props.scale_y.unwrap_or(DEFAULT_SCALE),
                props.scale_z.unwrap_or(DEFAULT_SCALE),
            ],
            offset: [
                props.offset_x.unwrap_or(DEFAULT_OFFSET),
                props.offset_y.unwrap_or(DEFAULT_OFFSET),
                props.offset_z.unwrap_or(DEFAULT_OFFSET),
            ],
            color: [
                props.red.unwrap_or(DEFAULT_COLOR[0]),
                props.green.unwrap_or(DEFAULT_COLOR[1]),
                props.blue.unwrap_or(DEFAULT_COLOR[2]),
                props.alpha.unwrap_or(DEFAULT_COLOR[3]),
            ],
        }
    }

    /// Builds the fully-populated style record written for new strokes.
    pub fn to_style(&self, brush_uri: impl Into<String>) -> StyleRef {
        StyleRef {
            brush_uri: brush_uri.into(),
            props: Some(StyleProps {
                size: Some(self.size),
                rotation: Some(self.rotation),
                scale_x: Some(self.scale[0]),
                scale_y: Some(self.scale[1]),
                scale_z: Some(self.scale[2]),
                offset_x: Some(self.offset[0]),
                offset_y: Some(self.offset[1]),
                offset_z: Some(self.offset[2]),
                red: Some(self.color[0]),
                green: Some(self.color[1]),
                blue: Some(self.color[2]),
                alpha: Some(self.color[3]),
            }),
        }
    }

    /// Whether every component of `other` is within `tolerance` of `self`.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        let lhs = self.flatten();
        let rhs = other.flatten();
        lhs.iter()
            .zip(rhs.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    fn flatten(&self) -> [f32; 12] {
        [
            self.size,
            self.rotation,
            self.scale[0],
            self.scale[1],
            self.scale[2],
            self.offset[0],
            self.offset[1],
            self.offset[2],
            self.color[0],
            self.color[1],
            self.color[2],
            self.color[3],
        ]
    }
}
