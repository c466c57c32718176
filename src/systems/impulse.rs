//! Impulse Dispatcher
//!
//! A click spins every dynamic body and throws it away from the pointer
//! side, then drops pointer gravity. The impulse reads the pointer vector
//! before the reset clears it.

use glam::Vec3;
use tracing::debug;

use crate::core::random::next_unit;
use crate::gravity::PointerGravity;
use crate::rigid_body::BodyHandle;
use crate::rigid_body_system::RigidBodySystem;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpulseParams {
    pub angular_velocity_coeff: f32,
    pub velocity_coeff: f32,
    pub angular_damping: f32,
}

/// Apply the click impulse to `bodies`, then reset `gravity` to Idle.
///
/// Returns the number of bodies that received an impulse.
pub fn activate(
    world: &mut RigidBodySystem,
    bodies: impl Iterator<Item = BodyHandle>,
    gravity: &mut PointerGravity,
    params: ImpulseParams,
    rng: &mut u32,
) -> usize {
    let pointer = gravity.pointer();
    let mut count = 0;

    for handle in bodies {
        match world.body(handle) {
            Some(body) if body.is_dynamic() => {}
            _ => continue,
        }
        let k_ang = params.angular_velocity_coeff;
        let spin = Vec3::new(
            next_unit(rng) * k_ang,
            next_unit(rng) * k_ang,
            next_unit(rng) * k_ang,
        );
        world.set_angular_velocity(handle, spin);
        world.set_angular_damping(handle, params.angular_damping);
        let velocity = Vec3::new(
            next_unit(rng) * -pointer.x * params.velocity_coeff,
            next_unit(rng) * -pointer.y * params.velocity_coeff,
            next_unit(rng) * k_ang,
        );
        world.set_velocity(handle, velocity);
        count += 1;
    }

    gravity.reset();
    debug!(bodies = count, mx = pointer.x, my = pointer.y, "dispatched click impulse");
    count
}
