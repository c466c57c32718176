use tracing::info;

use crate::gravity::TimerId;

use super::SceneCore;

/// Dispose wall visuals, drop every body, disarm the decay timer.
///
/// Safe to call more than once; later calls do nothing.
pub(super) fn teardown(core: &mut SceneCore) -> Option<TimerId> {
    if core.torn_down {
        return None;
    }
    let cancelled = core.gravity.cancel();

    core.walls.teardown(core.scene.as_deref_mut(), core.world.as_mut());
    match core.world.as_mut() {
        Some(world) => core.registry.clear(world),
        None => core.registry.forget_all(),
    }
    core.anchor = None;
    core.world = None;
    core.scene = None;
    core.torn_down = true;

    info!(frames = core.frame, "scene torn down");
    cancelled
}
