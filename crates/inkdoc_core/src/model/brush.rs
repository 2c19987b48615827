//! Brush definitions shared by strokes.
//!
//! Only vector brushes produce runtime strokes. Raster brushes are parsed so
//! their strokes can be reported as unsupported at decode; they never enter
//! a scene, so a re-save drops them together with the strokes that use them.

use serde::{Deserialize, Serialize};

/// Brush shape sampled at a given stroke size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushPrototype {
    /// Shape URI, e.g. `will://brush/3.0/shape/Circle?precision=20`.
    pub shape_uri: String,
    /// Stroke size at which this prototype applies.
    #[serde(default = "default_prototype_size")]
    pub size: f32,
}

fn default_prototype_size() -> f32 {
    1.0
}

/// Brush whose stroke outline is built from polygon prototypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorBrush {
    pub name: String,
    #[serde(default)]
    pub prototypes: Vec<BrushPrototype>,
    #[serde(default = "default_spacing")]
    pub spacing: f32,
}

/// Brush that stamps particle textures along the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterBrush {
    pub name: String,
    #[serde(default)]
    pub shape_texture_uris: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_texture_uri: Option<String>,
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    #[serde(default)]
    pub scattering: f32,
}

fn default_spacing() -> f32 {
    1.0
}

/// Kind-tagged brush record stored in the brush repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Brush {
    Vector(VectorBrush),
    Raster(RasterBrush),
}

/// Discriminant used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushKind {
    Vector,
    Raster,
}

impl Brush {
    /// Repository key.
    pub fn name(&self) -> &str {
        match self {
            Self::Vector(brush) => brush.name.as_str(),
            Self::Raster(brush) => brush.name.as_str(),
        }
    }

    pub fn kind(&self) -> BrushKind {
        match self {
            Self::Vector(_) => BrushKind::Vector,
            Self::Raster(_) => BrushKind::Raster,
        }
    }

    /// Returns the vector brush when this brush can be drawn as vector ink.
    pub fn as_vector(&self) -> Option<&VectorBrush> {
        match self {
            Self::Vector(brush) => Some(brush),
            Self::Raster(_) => None,
        }
    }
}

impl VectorBrush {
    /// Creates a single-prototype vector brush.
    pub fn new(name: impl Into<String>, shape_uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prototypes: vec![BrushPrototype {
                shape_uri: shape_uri.into(),
                size: 1.0,
            }],
            spacing: 1.0,
        }
    }
}

impl From<VectorBrush> for Brush {
    fn from(value: VectorBrush) -> Self {
        Self::Vector(value)
    }
}

impl From<RasterBrush> for Brush {
    fn from(value: RasterBrush) -> Self {
        Self::Raster(value)
    }
}
