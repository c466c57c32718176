use serde::{Deserialize, Serialize};

use crate::core::error::{SceneError, SceneResult};

/// What to do with a renderable whose bounding box has zero volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Log and leave the object out of the simulation.
    #[default]
    Skip,
    /// Clamp every extent to `min_extent` and register anyway.
    Substitute,
}

/// Scene constants and runtime toggles.
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Pixels per world unit. Viewport half-width in world units is `width / scale_factor`.
    pub scale_factor: f32,
    /// Distance between the back and front walls.
    pub room_depth: f32,
    pub wall_thickness: f32,
    /// Fixed simulation increment in seconds.
    pub time_step: f32,
    pub solver_iterations: u32,
    /// Gravity magnitude at full pointer deflection.
    pub gravity_coeff: f32,
    pub angular_velocity_coeff: f32,
    pub velocity_coeff: f32,
    pub angular_damping: f32,
    pub restitution: f32,
    /// Mass of every registered dynamic object.
    pub body_mass: f32,
    /// Idle time after the last pointer move before gravity resets.
    pub decay_ms: f64,
    pub front_wall: bool,
    /// Give bodies a random velocity when the decay timer resets gravity.
    pub fling_on_decay: bool,
    /// Distance of the anchored object from the top-left viewport corner.
    pub anchor_inset: f32,
    pub degenerate_policy: DegeneratePolicy,
    pub min_extent: f32,
    pub rng_seed: u32,

    pub follow_mouse: bool,
    pub update_physics: bool,
    /// Show wall visuals.
    pub debug: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scale_factor: 70.0,
            room_depth: 20.0,
            wall_thickness: 0.01,
            time_step: 1.0 / 60.0,
            solver_iterations: 10,
            gravity_coeff: 100.0,
            angular_velocity_coeff: 30.0,
            velocity_coeff: 60.0,
            angular_damping: 0.5,
            restitution: 0.3,
            body_mass: 100.0,
            decay_ms: 5000.0,
            front_wall: true,
            fling_on_decay: true,
            anchor_inset: 1.5,
            degenerate_policy: DegeneratePolicy::Skip,
            min_extent: 0.01,
            rng_seed: 12345,
            follow_mouse: true,
            update_physics: true,
            debug: false,
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let config: SceneConfig =
            serde_json::from_str(json).map_err(|e| SceneError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Reject values that would produce NaN geometry or a frozen world.
    pub fn validate(&self) -> SceneResult<()> {
        let positive = [
            ("scale_factor", self.scale_factor),
            ("room_depth", self.room_depth),
            ("wall_thickness", self.wall_thickness),
            ("time_step", self.time_step),
            ("min_extent", self.min_extent),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::config(format!("{name} must be positive, got {value}")));
            }
        }
        if self.body_mass < 0.0 {
            return Err(SceneError::config("body_mass must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.angular_damping) {
            return Err(SceneError::config("angular_damping must be within [0, 1]"));
        }
        if !(self.decay_ms >= 0.0) {
            return Err(SceneError::config("decay_ms must not be negative"));
        }
        Ok(())
    }
}
