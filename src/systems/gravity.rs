//! Pointer-Gravity Controller
//!
//! Two states. **Tracking** while the pointer keeps moving: the normalized
//! pointer position steers gravity. **Idle** after `decay_ms` without a
//! move: gravity is zero again. At most one decay timer is armed; arming a
//! new one supersedes the previous, and a superseded id has no effect when
//! it fires.

use glam::{Vec2, Vec3};
use tracing::trace;

use crate::core::random::next_unit;
use crate::rigid_body::BodyHandle;
use crate::rigid_body_system::RigidBodySystem;
use crate::walls::clamp_extent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GravityPhase {
    Idle,
    Tracking,
}

/// Identifier of one armed decay timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u32);

impl TimerId {
    pub fn id(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmedDecay {
    pub id: TimerId,
    pub deadline_ms: f64,
}

/// Result of a pointer move: the timer to schedule and the one to cancel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayArm {
    pub armed: TimerId,
    pub cancelled: Option<TimerId>,
    pub delay_ms: f64,
}

pub struct PointerGravity {
    pointer: Vec2,
    phase: GravityPhase,
    armed: Option<ArmedDecay>,
    next_timer: u32,
    decay_ms: f64,
}

impl PointerGravity {
    pub fn new(decay_ms: f64) -> Self {
        Self {
            pointer: Vec2::ZERO,
            phase: GravityPhase::Idle,
            armed: None,
            next_timer: 1,
            decay_ms,
        }
    }

    /// Client coordinates → [-1, 1] on both axes, Y pointing up.
    pub fn normalize(client_x: f32, client_y: f32, width: f32, height: f32) -> Vec2 {
        let x = (client_x / clamp_extent(width)) * 2.0 - 1.0;
        let y = (client_y / clamp_extent(height)) * 2.0 - 1.0;
        Vec2::new(x, -y)
    }

    /// Store the new pointer sample and re-arm the decay timer.
    pub fn pointer_moved(
        &mut self,
        client_x: f32,
        client_y: f32,
        width: f32,
        height: f32,
        now_ms: f64,
    ) -> DecayArm {
        self.pointer = Self::normalize(client_x, client_y, width, height);
        self.phase = GravityPhase::Tracking;

        let cancelled = self.armed.take().map(|a| a.id);
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1).max(1);
        self.armed = Some(ArmedDecay {
            id,
            deadline_ms: now_ms + self.decay_ms,
        });
        trace!(mx = self.pointer.x, my = self.pointer.y, timer = id.0, "pointer moved");

        DecayArm {
            armed: id,
            cancelled,
            delay_ms: self.decay_ms,
        }
    }

    /// The armed timer, if its deadline has passed.
    pub fn due(&self, now_ms: f64) -> Option<TimerId> {
        self.armed
            .filter(|a| a.deadline_ms <= now_ms)
            .map(|a| a.id)
    }

    /// Fire timer `id`. Only the currently armed id resets gravity.
    pub fn fire(&mut self, id: TimerId) -> bool {
        match self.armed {
            Some(armed) if armed.id == id => {
                self.armed = None;
                self.reset();
                true
            }
            _ => {
                trace!(timer = id.0, "ignoring superseded decay timer");
                false
            }
        }
    }

    /// Back to Idle without touching the armed timer. Returns the vector
    /// that was in effect.
    pub fn reset(&mut self) -> Vec2 {
        let previous = self.pointer;
        self.pointer = Vec2::ZERO;
        self.phase = GravityPhase::Idle;
        previous
    }

    /// Disarm without effect (teardown).
    pub fn cancel(&mut self) -> Option<TimerId> {
        self.armed.take().map(|a| a.id)
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn phase(&self) -> GravityPhase {
        self.phase
    }

    pub fn armed(&self) -> Option<ArmedDecay> {
        self.armed
    }

    pub fn decay_ms(&self) -> f64 {
        self.decay_ms
    }

    /// World gravity for the current pointer sample.
    pub fn gravity(&self, coeff: f32) -> Vec3 {
        Vec3::new(coeff * self.pointer.x, coeff * self.pointer.y, 0.0)
    }
}

/// `Math.sign`: zero maps to zero.
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// "Let go" velocity after a decay reset.
///
/// `pointer` is the vector *after* the reset. It is zero in practice, so
/// only the Z component moves bodies.
pub fn apply_fling(
    world: &mut RigidBodySystem,
    bodies: impl Iterator<Item = BodyHandle>,
    pointer: Vec2,
    velocity_coeff: f32,
    rng: &mut u32,
) -> usize {
    let mut flung = 0;
    for handle in bodies {
        match world.body(handle) {
            Some(body) if body.is_dynamic() => {}
            _ => continue,
        }
        let velocity = Vec3::new(
            next_unit(rng) * sign(-pointer.x) * velocity_coeff,
            next_unit(rng) * sign(-pointer.y) * velocity_coeff,
            next_unit(rng) * velocity_coeff,
        );
        world.set_velocity(handle, velocity);
        flung += 1;
    }
    flung
}
