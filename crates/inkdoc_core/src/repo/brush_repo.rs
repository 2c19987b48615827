//! Brush repository keyed by brush name.
//!
//! # Invariants
//! - Names added through `add` are non-empty, start with a non-space and
//!   hold no control characters. Both `Pencil` and `will://brush/3.0/Pencil`
//!   qualify.
//! - Deserialized names are taken as stored; a bad name only fails the
//!   strokes that use it, when they enter a scene.
//! - Names are unique; re-adding a name keeps the first definition.

use crate::model::brush::{Brush, VectorBrush};
use crate::repo::repository::{Keyed, RepoError, RepoResult, Repository};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static BRUSH_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\p{Cc}\s][^\p{Cc}]*$").expect("valid brush name regex")
});

impl Keyed for Brush {
    type Key = String;

    fn key(&self) -> String {
        self.name().to_string()
    }
}

/// Returns whether `name` can be used as a brush key.
pub fn is_valid_brush_name(name: &str) -> bool {
    BRUSH_NAME_RE.is_match(name)
}

/// Add-if-absent brush store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrushRepository {
    inner: Repository<Brush>,
}

impl BrushRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `brush` unless its name is already present.
    ///
    /// Returns `Ok(true)` when inserted, `Ok(false)` when the name existed.
    pub fn add(&mut self, brush: impl Into<Brush>) -> RepoResult<bool> {
        let brush = brush.into();
        if !is_valid_brush_name(brush.name()) {
            return Err(RepoError::InvalidBrushName(brush.name().to_string()));
        }
        Ok(self.inner.add(brush))
    }

    pub fn get(&self, name: &str) -> Option<&Brush> {
        self.inner.get(&name.to_string())
    }

    /// Vector brush registered under `name`, if the brush is vector kind.
    pub fn get_vector(&self, name: &str) -> Option<&VectorBrush> {
        self.get(name).and_then(Brush::as_vector)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(&name.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brush> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Serialize for BrushRepository {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BrushRepository {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Repository::<Brush>::deserialize(deserializer).map(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_brush_name, BrushRepository};
    use crate::model::brush::{Brush, RasterBrush, VectorBrush};
    use crate::repo::repository::RepoError;

    const PEN: &str = "app://demo/vector-brush/pen";

    #[test]
    fn validates_brush_names() {
        assert!(is_valid_brush_name(PEN));
        assert!(is_valid_brush_name("will://brush/3.0/Pencil"));
        assert!(is_valid_brush_name("Pencil"));
        assert!(is_valid_brush_name("Soft pencil"));
        assert!(!is_valid_brush_name(""));
        assert!(!is_valid_brush_name(" pen"));
        assert!(!is_valid_brush_name("pen\nmarker"));
    }

    #[test]
    fn add_is_add_if_absent() {
        let mut repo = BrushRepository::new();
        assert_eq!(repo.add(VectorBrush::new(PEN, "shape://circle")), Ok(true));
        assert_eq!(repo.add(VectorBrush::new(PEN, "shape://square")), Ok(false));

        let stored = repo.get_vector(PEN).expect("vector brush");
        assert_eq!(stored.prototypes[0].shape_uri, "shape://circle");
    }

    #[test]
    fn add_rejects_malformed_name() {
        let mut repo = BrushRepository::new();
        let err = repo.add(VectorBrush::new("", "shape://circle")).unwrap_err();
        assert_eq!(err, RepoError::InvalidBrushName(String::new()));
        assert!(repo.is_empty());
    }

    #[test]
    fn get_vector_ignores_raster_brushes() {
        let mut repo = BrushRepository::new();
        let raster = RasterBrush {
            name: "app://demo/raster-brush/pencil".to_string(),
            shape_texture_uris: vec![],
            fill_texture_uri: None,
            spacing: 0.15,
            scattering: 0.05,
        };
        repo.add(Brush::Raster(raster)).unwrap();
        assert!(repo.contains("app://demo/raster-brush/pencil"));
        assert!(repo.get_vector("app://demo/raster-brush/pencil").is_none());
    }

    #[test]
    fn deserialize_keeps_names_as_stored() {
        let json = serde_json::json!([
            { "kind": "vector", "name": "Pencil" },
            { "kind": "vector", "name": "bad\u{7}name" },
        ]);
        let repo = serde_json::from_value::<BrushRepository>(json).unwrap();
        assert_eq!(repo.len(), 2);
        assert!(repo.get_vector("Pencil").is_some());
        assert!(repo.contains("bad\u{7}name"));
    }
}
