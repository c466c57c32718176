//! Pure wall geometry derived from viewport size.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};

use crate::domain::config::SceneConfig;

/// Smallest viewport extent (pixels) used for geometry; keeps zero-size
/// windows from producing NaN or inverted walls.
pub const MIN_VIEWPORT_EXTENT: f32 = 1.0e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallSide {
    Bottom,
    Left,
    Right,
    Top,
    Back,
    Front,
}

/// Where one wall goes. `size` is (width, height, thickness) of the wall box
/// before rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallPlacement {
    pub side: WallSide,
    pub size: Vec3,
    pub position: Vec3,
    pub orientation: Quat,
}

impl WallPlacement {
    /// Collision normal, pointing into the room.
    pub fn normal(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }
}

/// Viewport half extents in world units.
pub fn half_extents(width: f32, height: f32, scale_factor: f32) -> (f32, f32) {
    (
        clamp_extent(width) / scale_factor,
        clamp_extent(height) / scale_factor,
    )
}

pub fn clamp_extent(value: f32) -> f32 {
    if value.is_finite() { value.max(MIN_VIEWPORT_EXTENT) } else { MIN_VIEWPORT_EXTENT }
}

/// Bottom, left, right, top, back and (optionally) front walls enclosing the
/// visible area plus `room_depth` along Z.
pub fn compute_layout(width: f32, height: f32, config: &SceneConfig) -> Vec<WallPlacement> {
    let (hw, hh) = half_extents(width, height, config.scale_factor);
    let depth = config.room_depth;
    let t = config.wall_thickness;

    let mut walls = vec![
        WallPlacement {
            side: WallSide::Bottom,
            size: Vec3::new(hw * 2.0, depth, t),
            position: Vec3::new(0.0, -hh + t / 2.0, 0.0),
            orientation: Quat::from_rotation_x(-FRAC_PI_2),
        },
        WallPlacement {
            side: WallSide::Left,
            size: Vec3::new(hh * 2.0, depth, t),
            position: Vec3::new(-hw + t / 2.0, 0.0, 0.0),
            orientation: Quat::from_rotation_z(FRAC_PI_2) * Quat::from_rotation_x(FRAC_PI_2),
        },
        WallPlacement {
            side: WallSide::Right,
            size: Vec3::new(hh * 2.0, depth, t),
            position: Vec3::new(hw - t / 2.0, 0.0, 0.0),
            orientation: Quat::from_rotation_z(-FRAC_PI_2) * Quat::from_rotation_x(FRAC_PI_2),
        },
        WallPlacement {
            side: WallSide::Top,
            size: Vec3::new(hw * 2.0, depth, t),
            position: Vec3::new(0.0, hh - t / 2.0, 0.0),
            orientation: Quat::from_rotation_x(FRAC_PI_2),
        },
        WallPlacement {
            side: WallSide::Back,
            size: Vec3::new(hw * 2.0, hh * 2.0, t),
            position: Vec3::new(0.0, 0.0, -depth / 2.0),
            orientation: Quat::IDENTITY,
        },
    ];

    if config.front_wall {
        walls.push(WallPlacement {
            side: WallSide::Front,
            size: Vec3::new(hw * 2.0, hh * 2.0, t),
            position: Vec3::new(0.0, 0.0, depth / 2.0),
            orientation: Quat::from_rotation_x(PI),
        });
    }

    walls
}
