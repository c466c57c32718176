use tracing::{debug, trace};

use crate::gravity::{apply_fling, DecayArm, TimerId};
use crate::impulse::{self, ImpulseParams};

use super::SceneCore;

pub(super) fn pointer_move(core: &mut SceneCore, client_x: f32, client_y: f32, now_ms: f64) -> Option<DecayArm> {
    if core.torn_down || !core.config.follow_mouse {
        return None;
    }
    let (width, height) = core.viewport;
    if width <= 0.0 || height <= 0.0 {
        trace!("pointer move before first resize");
        return None;
    }
    Some(core.gravity.pointer_moved(client_x, client_y, width, height, now_ms))
}

/// The armed decay timer keeps running; a click does not cancel it.
pub(super) fn click(core: &mut SceneCore) -> usize {
    if core.torn_down {
        return 0;
    }
    let Some(world) = core.world.as_mut() else {
        core.gravity.reset();
        return 0;
    };
    let params = ImpulseParams {
        angular_velocity_coeff: core.config.angular_velocity_coeff,
        velocity_coeff: core.config.velocity_coeff,
        angular_damping: core.config.angular_damping,
    };
    impulse::activate(
        world,
        core.registry.body_handles(),
        &mut core.gravity,
        params,
        &mut core.rng_state,
    )
}

pub(super) fn fire_decay(core: &mut SceneCore, id: TimerId) -> bool {
    if !core.gravity.fire(id) {
        return false;
    }
    if core.config.fling_on_decay {
        if let Some(world) = core.world.as_mut() {
            let flung = apply_fling(
                world,
                core.registry.body_handles(),
                core.gravity.pointer(),
                core.config.velocity_coeff,
                &mut core.rng_state,
            );
            debug!(timer = id.id(), flung, "gravity decayed");
        }
    }
    true
}

pub(super) fn poll_decay(core: &mut SceneCore, now_ms: f64) -> bool {
    match core.gravity.due(now_ms) {
        Some(id) => fire_decay(core, id),
        None => false,
    }
}
