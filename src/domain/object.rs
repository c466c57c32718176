use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::error::{SceneError, SceneResult};

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// A renderable as handed over by the asset loader.
///
/// `size` is the axis-aligned bounding box size of the mesh after scaling.
/// `rotation` is an `[x, y, z, w]` quaternion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub name: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    pub size: [f32; 3],
}

/// Resolved output of the asset loading phase.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedScene {
    #[serde(default)]
    pub objects: Vec<ObjectDescriptor>,
    /// Object pinned to the top-left viewport corner (the logo).
    #[serde(default)]
    pub anchor: Option<ObjectDescriptor>,
}

impl LoadedScene {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        serde_json::from_str(json).map_err(|e| SceneError::config(e.to_string()))
    }
}

/// Visual transform of a mesh. Position and orientation are written by the
/// registry after every step and read by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderableObject {
    pub name: String,
    pub position: Vec3,
    pub orientation: Quat,
    /// Bounding box size
    pub size: Vec3,
}

impl RenderableObject {
    pub fn new(name: impl Into<String>, position: Vec3, orientation: Quat, size: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            orientation,
            size,
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    /// True when the bounding box encloses no volume.
    pub fn is_degenerate(&self) -> bool {
        !(self.size.is_finite() && self.size.min_element() > 0.0)
    }
}

impl From<&ObjectDescriptor> for RenderableObject {
    fn from(desc: &ObjectDescriptor) -> Self {
        let rotation = Quat::from_array(desc.rotation);
        let orientation = if rotation.is_finite() && rotation.length_squared() > 0.0 {
            rotation.normalize()
        } else {
            Quat::IDENTITY
        };
        Self {
            name: desc.name.clone(),
            position: Vec3::from_array(desc.position),
            orientation,
            size: Vec3::from_array(desc.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_defaults_to_identity_rotation() {
        let scene = LoadedScene::from_json(
            r#"{ "objects": [ { "name": "T", "size": [1, 2, 0.5] } ] }"#,
        )
        .unwrap();
        let object = RenderableObject::from(&scene.objects[0]);
        assert_eq!(object.orientation, Quat::IDENTITY);
        assert_eq!(object.position, Vec3::ZERO);
        assert_eq!(object.half_extents(), Vec3::new(0.5, 1.0, 0.25));
        assert!(scene.anchor.is_none());
    }

    #[test]
    fn zero_quaternion_falls_back_to_identity() {
        let desc = ObjectDescriptor {
            name: "broken".into(),
            position: [0.0; 3],
            rotation: [0.0; 4],
            size: [1.0; 3],
        };
        assert_eq!(RenderableObject::from(&desc).orientation, Quat::IDENTITY);
    }

    #[test]
    fn flat_box_is_degenerate() {
        let flat = RenderableObject::new("flat", Vec3::ZERO, Quat::IDENTITY, Vec3::new(1.0, 1.0, 0.0));
        assert!(flat.is_degenerate());
        let cube = RenderableObject::new("cube", Vec3::ZERO, Quat::IDENTITY, Vec3::splat(10.0));
        assert!(!cube.is_degenerate());
    }
}
