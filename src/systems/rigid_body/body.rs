use glam::{Quat, Vec3};

/// Stable identifier of a body inside a [`RigidBodySystem`](crate::rigid_body_system::RigidBodySystem).
///
/// Handles are never reused, so a stale handle simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

impl BodyHandle {
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Collision shape
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Oriented box given by half extents in local space.
    Box { half_extents: Vec3 },
    /// Infinite plane through the body position; the solid side is behind local +Z.
    Plane,
}

/// Rigid Body - moves as a single unit
///
/// Passed to [`RigidBodySystem::add_body`](crate::rigid_body_system::RigidBodySystem::add_body)
/// as a description, and returned by `body()` as a snapshot of the
/// simulated state. Editing a snapshot does not touch the world; use the
/// system's setters for that.
#[derive(Clone, Debug)]
pub struct RigidBody {
    // === Physics State ===
    pub position: Vec3,
    pub orientation: Quat,
    /// Linear velocity (units per second)
    pub velocity: Vec3,
    /// Angular velocity (radians per second, world axes)
    pub angular_velocity: Vec3,
    /// Fraction of linear velocity lost per second
    pub linear_damping: f32,
    /// Fraction of angular velocity lost per second
    pub angular_damping: f32,
    /// 0 = static
    pub mass: f32,
    pub shape: Shape,

    // === Material properties ===
    /// Bounciness (0.0 = no bounce, 1.0 = full elastic)
    pub restitution: f32,
    pub friction: f32,
}

impl RigidBody {
    /// Create a box body. `mass == 0` makes it static.
    pub fn new_box(position: Vec3, orientation: Quat, half_extents: Vec3, mass: f32) -> Self {
        Self {
            position,
            orientation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            linear_damping: 0.01,
            angular_damping: 0.01,
            mass: mass.max(0.0),
            shape: Shape::Box { half_extents },
            restitution: 0.3,
            friction: 0.3,
        }
    }

    /// Create a static plane whose normal is the rotated local +Z axis.
    pub fn new_plane(position: Vec3, orientation: Quat) -> Self {
        Self {
            shape: Shape::Plane,
            ..Self::new_box(position, orientation, Vec3::ZERO, 0.0)
        }
    }

    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    pub fn is_dynamic(&self) -> bool {
        !self.is_static()
    }

    /// Plane normal (local +Z in world space).
    pub fn normal(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// Set restitution (bounciness)
    pub fn set_restitution(&mut self, r: f32) {
        self.restitution = r.clamp(0.0, 1.0);
    }

    /// Set angular damping, clamped to [0, 1]
    pub fn set_angular_damping(&mut self, d: f32) {
        self.angular_damping = clamp_damping(d);
    }
}

pub(crate) fn clamp_damping(d: f32) -> f32 {
    d.clamp(0.0, 1.0)
}

/// Per-second loss fraction to the solver's `v / (1 + dt * c)` coefficient.
///
/// Both forms agree on small steps; a full loss (1.0) is capped so the
/// coefficient stays finite.
pub(crate) fn damping_coefficient(fraction: f32) -> f32 {
    -(1.0 - clamp_damping(fraction).min(0.999)).ln()
}
