use glam::Vec3;
use tracing::debug;

use crate::core::error::{SceneError, SceneResult};
use crate::walls::{clamp_extent, half_extents};

use super::SceneCore;

const CAMERA_NEAR: f32 = -1000.0;
const CAMERA_FAR: f32 = 1000.0;

/// Orthographic camera frustum in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthoBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoBounds {
    pub fn from_viewport(width: f32, height: f32, scale_factor: f32) -> Self {
        let (hw, hh) = half_extents(width, height, scale_factor);
        Self {
            left: -hw,
            right: hw,
            top: hh,
            bottom: -hh,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeOutcome {
    pub walls: usize,
    pub camera: OrthoBounds,
    /// New position of the anchored object, if there is one.
    pub anchor_position: Option<Vec3>,
}

/// Walls first, then the camera, then the anchored object.
pub(super) fn resize(core: &mut SceneCore, width: f32, height: f32) -> SceneResult<ResizeOutcome> {
    if core.torn_down {
        return Err(SceneError::TornDown);
    }
    let width = clamp_extent(width);
    let height = clamp_extent(height);
    core.viewport = (width, height);

    let walls = core.walls.rebuild(
        width,
        height,
        &core.config,
        core.scene.as_deref_mut(),
        core.world.as_mut(),
    );
    let camera = OrthoBounds::from_viewport(width, height, core.config.scale_factor);
    let anchor_position = place_anchor(core, width, height);

    debug!(width, height, walls, "viewport resized");
    Ok(ResizeOutcome {
        walls,
        camera,
        anchor_position,
    })
}

/// `(-w/F + inset, h/F - inset, 0)`, applied to the visual and its static body.
pub(super) fn place_anchor(core: &mut SceneCore, width: f32, height: f32) -> Option<Vec3> {
    let anchor = core.anchor.as_mut()?;
    let (hw, hh) = half_extents(width, height, core.config.scale_factor);
    let inset = core.config.anchor_inset;
    let position = Vec3::new(-hw + inset, hh - inset, 0.0);

    anchor.object.position = position;
    if let (Some(world), Some(handle)) = (core.world.as_mut(), anchor.body) {
        world.set_position(handle, position);
    }
    Some(position)
}
