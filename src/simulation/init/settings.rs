use tracing::debug;

use super::perf_stats::StepStats;
use super::SceneCore;

pub(super) fn set_follow_mouse(core: &mut SceneCore, enabled: bool) {
    core.config.follow_mouse = enabled;
}

pub(super) fn set_update_physics(core: &mut SceneCore, enabled: bool) {
    core.config.update_physics = enabled;
}

pub(super) fn set_debug(core: &mut SceneCore, enabled: bool) {
    core.config.debug = enabled;
    core.walls.set_visible(enabled, core.scene.as_deref_mut());
    debug!(enabled, "wall visuals toggled");
}

pub(super) fn enable_perf_metrics(core: &mut SceneCore, enabled: bool) {
    core.perf_enabled = enabled;
    if !enabled {
        core.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(core: &SceneCore) -> StepStats {
    core.perf_stats.clone()
}
